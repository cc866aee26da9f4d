//! Small helpers.

use chrono::NaiveDate;

pub fn sanitize_symbol(sym: &str) -> String {
    sym.trim().to_uppercase()
}

/// Round half toward +infinity, so `-2.5` becomes `-2` rather than `-3`.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Lenient decimal parse: blank or garbage yields `None`.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let t = s.trim().trim_start_matches('$');
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Render an optional number the way the input would show it: blank when unset.
pub fn fmt_opt_num(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

pub fn fmt_opt_date(d: Option<NaiveDate>) -> String {
    d.map(|x| x.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
