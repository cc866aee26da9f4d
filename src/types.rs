//! Core domain types for positions, reference prices and analysis results.

use chrono::NaiveDate;
use serde::Deserialize;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PositionType {
    #[default]
    ShortPut,
    ShortCall,
}

impl PositionType {
    pub fn flipped(self) -> Self {
        match self {
            PositionType::ShortPut => PositionType::ShortCall,
            PositionType::ShortCall => PositionType::ShortPut,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionType::ShortPut => "Short Put",
            PositionType::ShortCall => "Short Call",
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PositionType::ShortPut => "short_put",
            PositionType::ShortCall => "short_call",
        })
    }
}

impl FromStr for PositionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short_put" | "put" | "p" => Ok(PositionType::ShortPut),
            "short_call" | "call" | "c" => Ok(PositionType::ShortCall),
            _ => Err(()),
        }
    }
}

/// Aggressiveness of the safety reserve set aside per contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Tortoise,
    Hare,
}

impl Strategy {
    /// Fraction of the premium kept as safety reserve.
    pub fn safety_pct(self) -> f64 {
        match self {
            Strategy::Tortoise => 0.05,
            Strategy::Hare => 0.125,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Tortoise => "Tortoise",
            Strategy::Hare => "Hare",
        }
    }

    pub fn pct_label(self) -> &'static str {
        match self {
            Strategy::Tortoise => "5%",
            Strategy::Hare => "12.5%",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Tortoise => "tortoise",
            Strategy::Hare => "hare",
        })
    }
}

impl FromStr for Strategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tortoise" => Ok(Strategy::Tortoise),
            "hare" => Ok(Strategy::Hare),
            _ => Err(()),
        }
    }
}

/// One user-managed short option position. Every field except `id` may be
/// left unset while the user is still filling it in.
///
/// Prices keep the text they were entered or seeded with next to the parsed
/// value; exports show the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    pub id: u32,
    pub stock: String,
    pub position_type: PositionType,
    pub current_price: Option<f64>,
    pub current_price_text: String,
    pub strike_price: Option<f64>,
    pub strike_price_text: String,
    pub expiration_date: Option<NaiveDate>,
    pub strategy: Strategy,
}

impl Position {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// All four user inputs present. Gates the analysis card and export rows.
    pub fn is_filled_in(&self) -> bool {
        !self.stock.is_empty()
            && self.current_price.is_some()
            && self.strike_price.is_some()
            && self.expiration_date.is_some()
    }

    pub fn current_price_display(&self) -> String {
        text_or_number(&self.current_price_text, self.current_price)
    }

    pub fn strike_price_display(&self) -> String {
        text_or_number(&self.strike_price_text, self.strike_price)
    }
}

fn text_or_number(text: &str, value: Option<f64>) -> String {
    if text.is_empty() {
        crate::utils::fmt_opt_num(value)
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionField {
    Stock,
    Type,
    CurrentPrice,
    StrikePrice,
    ExpirationDate,
    Strategy,
}

impl PositionField {
    pub fn name(self) -> &'static str {
        match self {
            PositionField::Stock => "stock",
            PositionField::Type => "type",
            PositionField::CurrentPrice => "current_price",
            PositionField::StrikePrice => "strike_price",
            PositionField::ExpirationDate => "expiration_date",
            PositionField::Strategy => "strategy",
        }
    }
}

impl FromStr for PositionField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" | "symbol" => Ok(PositionField::Stock),
            "type" => Ok(PositionField::Type),
            "current" | "price" | "current_price" => Ok(PositionField::CurrentPrice),
            "strike" | "strike_price" => Ok(PositionField::StrikePrice),
            "expiration" | "exp" | "expiry" | "expiration_date" => {
                Ok(PositionField::ExpirationDate)
            }
            "strategy" => Ok(PositionField::Strategy),
            _ => Err(()),
        }
    }
}

/// Watch-list entry refreshed from the quote provider.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReferencePrice {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Incomplete,
    Roll,
    Assign,
    Hold,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Incomplete => "incomplete",
            Status::Roll => "roll",
            Status::Assign => "assign",
            Status::Hold => "hold",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the follow-up position the advisor suggests.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedAction {
    pub position_type: PositionType,
    pub strike_price: Option<f64>,
    pub expiration_date: Option<NaiveDate>,
    pub days_to_add: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub status: Status,
    pub message: String,
    pub premium: f64,
    pub tax_reserve: f64,
    pub safety_reserve: f64,
    pub recommended_action: RecommendedAction,
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add,
    /// 1-based position number, field and raw value (may be empty).
    Set {
        number: usize,
        field: PositionField,
        value: String,
    },
    Show(Option<usize>),
    Prices,
    Export(Option<String>),
    Help,
    Quit,
}
