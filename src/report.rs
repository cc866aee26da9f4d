//! Plain-text rendering of position cards and the price board.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::analyzer::analyze;
use crate::state::PriceBoard;
use crate::types::{Position, Status};
use crate::utils::{fmt_opt_date, fmt_opt_num};

pub fn render_position(
    number: usize,
    p: &Position,
    board: &PriceBoard,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let stock = if p.stock.is_empty() {
        "-".to_string()
    } else {
        format!("{} ({})", board.name_of(&p.stock), p.stock)
    };
    let _ = writeln!(out, "== Position {} ==", number);
    let _ = writeln!(out, "  Stock:       {}", stock);
    let _ = writeln!(out, "  Strategy:    {}", p.strategy.label());
    let _ = writeln!(out, "  Type:        {}", p.position_type.label());
    let _ = writeln!(out, "  Current:     {}", p.current_price_display());
    let _ = writeln!(out, "  Strike:      {}", p.strike_price_display());
    let _ = writeln!(out, "  Expiration:  {}", fmt_opt_date(p.expiration_date));

    // Analysis only once the form is filled in.
    if !p.is_filled_in() {
        return out;
    }
    let a = analyze(p, now);
    let _ = writeln!(out, "  -- TradFi Family Analysis [{}] --", a.status.as_str().to_uppercase());
    let _ = writeln!(out, "  {}", a.message);
    let _ = writeln!(out, "  Contract Premium: ${}", a.premium);
    let _ = writeln!(out, "  Tax Reserve:      ${} (25%)", a.tax_reserve);
    let _ = writeln!(
        out,
        "  Safety Reserve:   ${} ({})",
        a.safety_reserve,
        p.strategy.pct_label()
    );
    if a.status != Status::Incomplete {
        let r = &a.recommended_action;
        let _ = writeln!(
            out,
            "  Next: {} @ {} exp {} (+{} days)",
            r.position_type.label(),
            fmt_opt_num(r.strike_price),
            fmt_opt_date(r.expiration_date),
            r.days_to_add
        );
    }
    out
}

pub fn render_positions(positions: &[Position], board: &PriceBoard, now: DateTime<Utc>) -> String {
    positions
        .iter()
        .map(|p| render_position(p.id as usize, p, board, now))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_board(board: &PriceBoard) -> String {
    let mut out = String::new();
    for p in board.prices() {
        let _ = writeln!(out, "  {:<6} {:<12} ${:.2}", p.symbol, p.name, p.price);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PositionType, ReferencePrice, Strategy};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn board() -> PriceBoard {
        PriceBoard::new(vec![ReferencePrice {
            symbol: "TSLA".into(),
            name: "Tesla".into(),
            price: 210.0,
        }])
    }

    #[test]
    fn empty_position_has_no_analysis() {
        let s = render_position(1, &Position::new(1), &board(), now());
        assert!(s.starts_with("== Position 1 =="));
        assert!(s.contains("Stock:       -"));
        assert!(!s.contains("Analysis"));
    }

    #[test]
    fn filled_position_shows_analysis_and_next_step() {
        let p = Position {
            id: 1,
            stock: "TSLA".into(),
            position_type: PositionType::ShortCall,
            current_price: Some(210.0),
            strike_price: Some(200.0),
            expiration_date: Some(now().date_naive() + Duration::days(5)),
            strategy: Strategy::Hare,
            ..Default::default()
        };
        let s = render_position(2, &p, &board(), now());
        assert!(s.contains("Tesla (TSLA)"));
        assert!(s.contains("[ASSIGN]"));
        assert!(s.contains("Contract Premium: $1400"));
        assert!(s.contains("Tax Reserve:      $350 (25%)"));
        assert!(s.contains("Safety Reserve:   $175 (12.5%)"));
        assert!(s.contains("Next: Short Put @ 189 exp 2026-11-22 (+35 days)"));
    }

    #[test]
    fn board_lists_each_symbol() {
        let s = render_board(&board());
        assert!(s.contains("TSLA"));
        assert!(s.contains("$210.00"));
    }
}
