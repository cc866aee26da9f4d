//! Spreadsheet export: one CSV row per filled-in position.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{fs, path::Path, path::PathBuf};
use tracing::info;

use crate::analyzer::analyze;
use crate::state::PriceBoard;
use crate::types::Position;
use crate::utils::{fmt_opt_date, fmt_opt_num};

pub const HEADERS: [&str; 15] = [
    "Position #",
    "Stock",
    "Strategy",
    "Position Type (Current)",
    "Position Type (Recommended)",
    "Strike Price (Current)",
    "Strike Price (Recommended)",
    "Expiration Date (Current)",
    "Expiration Date (Recommended)",
    "Current Price",
    "Premium",
    "Tax Reserve",
    "Safety Reserve",
    "Status",
    "Recommendation",
];

/// Quote a field only when it holds a comma, quote or newline.
pub fn escape_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Cells for every exportable position, keyed by its 1-based number.
pub fn rows(
    positions: &[Position],
    board: &PriceBoard,
    now: DateTime<Utc>,
) -> Vec<Vec<String>> {
    positions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_filled_in())
        .map(|(i, p)| {
            let a = analyze(p, now);
            let r = &a.recommended_action;
            vec![
                (i + 1).to_string(),
                board.name_of(&p.stock).to_string(),
                p.strategy.label().to_string(),
                p.position_type.label().to_string(),
                r.position_type.label().to_string(),
                p.strike_price_display(),
                fmt_opt_num(r.strike_price),
                fmt_opt_date(p.expiration_date),
                fmt_opt_date(r.expiration_date),
                p.current_price_display(),
                a.premium.to_string(),
                a.tax_reserve.to_string(),
                a.safety_reserve.to_string(),
                a.status.as_str().to_uppercase(),
                a.message,
            ]
        })
        .collect()
}

pub fn to_csv(positions: &[Position], board: &PriceBoard, now: DateTime<Utc>) -> String {
    let mut out = join_row(&HEADERS);
    for row in rows(positions, board, now) {
        out.push_str(&join_row(&row));
    }
    out
}

pub fn file_name(now: DateTime<Utc>) -> String {
    format!("tradfi-family-positions-{}.csv", now.format("%Y-%m-%d"))
}

/// Where exports land when neither the command nor the config names a dir.
pub fn default_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|d| d.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write the CSV into `dir`, creating it if needed. Returns the file path
/// and the number of position rows written.
pub fn write_export(
    dir: &Path,
    positions: &[Position],
    board: &PriceBoard,
    now: DateTime<Utc>,
) -> Result<(PathBuf, usize)> {
    fs::create_dir_all(dir).with_context(|| format!("create export dir {}", dir.display()))?;
    let path = dir.join(file_name(now));
    let count = positions.iter().filter(|p| p.is_filled_in()).count();
    fs::write(&path, to_csv(positions, board, now))
        .with_context(|| format!("write export {}", path.display()))?;
    info!("Exported {} positions to {}", count, path.display());
    Ok((path, count))
}
