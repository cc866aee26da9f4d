//! In-memory session state: the user's positions and the reference price board.
//! Nothing here is persisted; both live for the lifetime of the process.

use thiserror::Error;

use crate::types::{Position, PositionField, ReferencePrice};
use crate::utils::{parse_date, parse_decimal, sanitize_symbol};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("position index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },
}

/// Watch-list prices, replaced wholesale on every completed refresh.
#[derive(Debug, Clone, Default)]
pub struct PriceBoard {
    prices: Vec<ReferencePrice>,
}

impl PriceBoard {
    pub fn new(prices: Vec<ReferencePrice>) -> Self {
        Self { prices }
    }

    pub fn find(&self, symbol: &str) -> Option<&ReferencePrice> {
        self.prices.iter().find(|p| p.symbol == symbol)
    }

    /// Display name for a symbol, falling back to the symbol itself.
    pub fn name_of<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.find(symbol).map(|p| p.name.as_str()).unwrap_or(symbol)
    }

    pub fn replace(&mut self, prices: Vec<ReferencePrice>) {
        self.prices = prices;
    }

    pub fn prices(&self) -> &[ReferencePrice] {
        &self.prices
    }
}

/// Ordered, grow-only list of positions. Indexes are 0-based.
#[derive(Debug, Default)]
pub struct PositionStore {
    positions: Vec<Position>,
}

impl PositionStore {
    /// Starts with one empty position, like a fresh form.
    pub fn new() -> Self {
        let mut store = Self::default();
        store.add();
        store
    }

    /// Append an empty position and return its index.
    pub fn add(&mut self) -> usize {
        let id = self.positions.len() as u32 + 1;
        self.positions.push(Position::new(id));
        self.positions.len() - 1
    }

    /// Apply one field edit. Selecting a stock re-seeds `current_price`
    /// from the board (or clears it) before the stock itself is written.
    pub fn update(
        &mut self,
        index: usize,
        field: PositionField,
        value: &str,
        board: &PriceBoard,
    ) -> Result<&Position, StoreError> {
        let len = self.positions.len();
        let position = self
            .positions
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;

        let invalid = || StoreError::InvalidValue {
            field: field.name(),
            value: value.to_string(),
        };

        match field {
            PositionField::Stock => {
                let symbol = sanitize_symbol(value);
                match board.find(&symbol) {
                    Some(p) => {
                        position.current_price = Some(p.price);
                        position.current_price_text = format!("{:.2}", p.price);
                    }
                    None => {
                        position.current_price = None;
                        position.current_price_text.clear();
                    }
                }
                position.stock = symbol;
            }
            PositionField::Type => {
                position.position_type = value.parse().map_err(|_| invalid())?;
            }
            PositionField::Strategy => {
                position.strategy = value.parse().map_err(|_| invalid())?;
            }
            PositionField::CurrentPrice => {
                (position.current_price, position.current_price_text) = price_with_text(value);
            }
            PositionField::StrikePrice => {
                (position.strike_price, position.strike_price_text) = price_with_text(value);
            }
            PositionField::ExpirationDate => position.expiration_date = parse_date(value),
        }
        Ok(position)
    }

    pub fn get(&self, index: usize) -> Option<&Position> {
        self.positions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Parsed price plus the text to show for it; unparsable input clears both.
fn price_with_text(value: &str) -> (Option<f64>, String) {
    match parse_decimal(value) {
        Some(v) => (Some(v), value.trim().trim_start_matches('$').to_string()),
        None => (None, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PositionType, Strategy};
    use chrono::NaiveDate;

    fn board() -> PriceBoard {
        PriceBoard::new(vec![
            ReferencePrice {
                symbol: "AAPL".into(),
                name: "Apple".into(),
                price: 173.5,
            },
            ReferencePrice {
                symbol: "TSLA".into(),
                name: "Tesla".into(),
                price: 175.75,
            },
        ])
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let mut s = PositionStore::new();
        assert_eq!(s.len(), 1);
        assert_eq!(s.add(), 1);
        assert_eq!(s.add(), 2);
        let ids: Vec<u32> = s.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let p = s.get(2).unwrap();
        assert!(p.stock.is_empty());
        assert_eq!(p.position_type, PositionType::ShortPut);
        assert_eq!(p.strategy, Strategy::Tortoise);
        assert_eq!(p.current_price, None);
    }

    #[test]
    fn selecting_stock_seeds_current_price() {
        let mut s = PositionStore::new();
        let b = board();
        let p = s.update(0, PositionField::Stock, "aapl", &b).unwrap();
        assert_eq!(p.stock, "AAPL");
        assert_eq!(p.current_price, Some(173.5));
        assert_eq!(p.current_price_display(), "173.50");
    }

    #[test]
    fn selecting_stock_overwrites_manual_price() {
        let mut s = PositionStore::new();
        let b = board();
        s.update(0, PositionField::CurrentPrice, "180", &b).unwrap();
        let p = s.update(0, PositionField::Stock, "TSLA", &b).unwrap();
        assert_eq!(p.current_price, Some(175.75));

        // unknown symbol clears it
        s.update(0, PositionField::CurrentPrice, "180", &b).unwrap();
        let p = s.update(0, PositionField::Stock, "IBM", &b).unwrap();
        assert_eq!(p.stock, "IBM");
        assert_eq!(p.current_price, None);
        assert_eq!(p.current_price_display(), "");
    }

    #[test]
    fn price_can_be_edited_after_stock() {
        let mut s = PositionStore::new();
        let b = board();
        s.update(0, PositionField::Stock, "AAPL", &b).unwrap();
        let p = s.update(0, PositionField::CurrentPrice, " 150.50 ", &b).unwrap();
        assert_eq!(p.stock, "AAPL");
        assert_eq!(p.current_price, Some(150.5));
        assert_eq!(p.current_price_display(), "150.50");
    }

    #[test]
    fn numeric_and_date_fields_degrade_to_unset() {
        let mut s = PositionStore::new();
        let b = board();
        s.update(0, PositionField::StrikePrice, "100", &b).unwrap();
        let p = s.update(0, PositionField::StrikePrice, "abc", &b).unwrap();
        assert_eq!(p.strike_price, None);
        assert_eq!(p.strike_price_display(), "");
        let p = s.update(0, PositionField::StrikePrice, "$95.10", &b).unwrap();
        assert_eq!(p.strike_price, Some(95.1));
        assert_eq!(p.strike_price_display(), "95.10");

        let p = s.update(0, PositionField::ExpirationDate, "2026-11-20", &b).unwrap();
        assert_eq!(p.expiration_date, NaiveDate::from_ymd_opt(2026, 11, 20));
        let p = s.update(0, PositionField::ExpirationDate, "", &b).unwrap();
        assert_eq!(p.expiration_date, None);
    }

    #[test]
    fn enum_fields_reject_unknown_values() {
        let mut s = PositionStore::new();
        let b = board();
        let p = s.update(0, PositionField::Type, "call", &b).unwrap();
        assert_eq!(p.position_type, PositionType::ShortCall);
        let p = s.update(0, PositionField::Strategy, "Hare", &b).unwrap();
        assert_eq!(p.strategy, Strategy::Hare);

        let err = s.update(0, PositionField::Type, "straddle", &b).unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidValue {
                field: "type",
                value: "straddle".into()
            }
        );
        assert_eq!(s.get(0).unwrap().position_type, PositionType::ShortCall);
    }

    #[test]
    fn out_of_range_index_fails_fast() {
        let mut s = PositionStore::new();
        let err = s
            .update(3, PositionField::Stock, "AAPL", &board())
            .unwrap_err();
        assert_eq!(err, StoreError::IndexOutOfRange { index: 3, len: 1 });
    }

    #[test]
    fn board_replace_and_names() {
        let mut b = board();
        assert_eq!(b.name_of("AAPL"), "Apple");
        assert_eq!(b.name_of("IBM"), "IBM");
        b.replace(vec![]);
        assert!(b.prices().is_empty());
        assert_eq!(b.name_of("AAPL"), "AAPL");
    }
}
