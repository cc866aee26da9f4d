//! Rule-based position analysis: classify a short option into
//! incomplete / roll / assign / hold and derive premium and reserves.
//!
//! Pure over its inputs. The current instant is passed in so results are
//! reproducible.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::types::{AnalysisResult, Position, PositionType, RecommendedAction, Status};
use crate::utils::round_half_up;

/// Days-to-expiration at or under which a position needs attention.
pub const ACTION_WINDOW_DAYS: i64 = 15;
/// In-the-money percentage at which rolling beats taking assignment.
pub const ROLL_THRESHOLD_PCT: f64 = 12.0;

pub const PREMIUM_RATE: f64 = 0.07;
pub const CONTRACT_MULTIPLIER: f64 = 100.0;
pub const TAX_RESERVE_PCT: f64 = 0.25;

pub const ROLL_DAYS: i64 = 30;
pub const ASSIGN_DAYS: i64 = 35;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Whole days until `expiration` (taken at 00:00 UTC), rounded up.
pub fn days_to_expiration(expiration: Option<NaiveDate>, now: DateTime<Utc>) -> Option<i64> {
    let expiry = expiration?.and_hms_opt(0, 0, 0)?.and_utc();
    let diff_ms = (expiry - now).num_milliseconds() as f64;
    Some((diff_ms / MS_PER_DAY).ceil() as i64)
}

/// Flat 7%-of-strike premium for one contract. Ignores spot, vol and time.
pub fn estimated_premium(strike: f64) -> f64 {
    round_half_up(strike * PREMIUM_RATE * CONTRACT_MULTIPLIER)
}

/// How far in the money the position is, as a percent of strike.
pub fn percentage_move(position_type: PositionType, strike: f64, current: f64) -> f64 {
    match position_type {
        PositionType::ShortPut => (strike - current) / strike * 100.0,
        PositionType::ShortCall => (current - strike) / strike * 100.0,
    }
}

fn usable(v: Option<f64>) -> Option<f64> {
    v.filter(|x| *x != 0.0 && !x.is_nan())
}

pub fn analyze(position: &Position, now: DateTime<Utc>) -> AnalysisResult {
    let days = days_to_expiration(position.expiration_date, now).filter(|d| *d != 0);
    let premium_estimate = position.strike_price.map(estimated_premium);
    let safety_pct = position.strategy.safety_pct();

    let (Some(days), Some(current), Some(strike)) = (
        days,
        usable(position.current_price),
        usable(position.strike_price),
    ) else {
        // Incomplete path keeps the safety reserve unrounded.
        return AnalysisResult {
            status: Status::Incomplete,
            message: "Please fill in all fields".to_string(),
            premium: 0.0,
            tax_reserve: 0.0,
            safety_reserve: premium_estimate.map(|p| p * safety_pct).unwrap_or(0.0),
            recommended_action: unchanged(position),
        };
    };

    let premium = estimated_premium(strike);
    let tax_reserve = round_half_up(premium * TAX_RESERVE_PCT);
    let safety_reserve = round_half_up(premium * safety_pct);
    let pct = percentage_move(position.position_type, strike, current);

    let (status, message, recommended_action) = if days <= ACTION_WINDOW_DAYS
        && pct >= ROLL_THRESHOLD_PCT
    {
        let message = format!(
            "The TradFi Family Would: ROLL this position. With {} days left and {:.1}% ITM, roll to same strike ({}) {} days out.",
            days,
            pct,
            strike,
            days + ROLL_DAYS
        );
        let action = RecommendedAction {
            position_type: position.position_type,
            strike_price: Some(strike),
            expiration_date: position
                .expiration_date
                .map(|d| d + Duration::days(ROLL_DAYS)),
            days_to_add: ROLL_DAYS,
        };
        (Status::Roll, message, action)
    } else if days <= ACTION_WINDOW_DAYS && pct > 0.0 && pct < ROLL_THRESHOLD_PCT {
        let (sell, factor) = match position.position_type {
            PositionType::ShortPut => ("calls", 1.1),
            PositionType::ShortCall => ("puts", 0.9),
        };
        let message = format!(
            "The TradFi Family Would: PREPARE FOR ASSIGNMENT. Within 3 days of assignment, sell {} at 45-50 Delta, targeting 30-40 DTE.",
            sell
        );
        let action = RecommendedAction {
            position_type: position.position_type.flipped(),
            strike_price: Some(round_half_up(current * factor)),
            expiration_date: Some((now + Duration::days(ASSIGN_DAYS)).date_naive()),
            days_to_add: ASSIGN_DAYS,
        };
        (Status::Assign, message, action)
    } else {
        (
            Status::Hold,
            "The TradFi Family Would: HOLD this position. No action needed at this time."
                .to_string(),
            unchanged(position),
        )
    };

    AnalysisResult {
        status,
        message,
        premium,
        tax_reserve,
        safety_reserve,
        recommended_action,
    }
}

fn unchanged(position: &Position) -> RecommendedAction {
    RecommendedAction {
        position_type: position.position_type,
        strike_price: position.strike_price,
        expiration_date: position.expiration_date,
        days_to_add: 0,
    }
}
