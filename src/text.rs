//! The parsing/formatting boundary. The full unit-expression grammar lives
//! in a collaborating crate; this module defines the contract the core
//! consumes plus a minimal symbol-table implementation over the named-units
//! table, enough to resolve "km" or "°C" and to print any unit's symbol.

use std::fmt;

use crate::types::Unknown;
use crate::units::{Unit, systems};

/// Error types for textual unit and measurement input
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown unit symbol: '{0}'")]
    UnknownUnit(String),

    #[error("Malformed numeric value: '{0}'")]
    InvalidNumber(String),
}

/// Contract of the formatting collaborator. Parsing an empty symbol yields
/// the dimensionless unit; anything unresolvable is a `ParseError`.
pub trait UnitFormat {
    fn parse(&self, symbol: &str) -> Result<Unit<Unknown>, ParseError>;

    fn format(&self, unit: &Unit<Unknown>, out: &mut dyn fmt::Write) -> fmt::Result;

    fn format_to_string(&self, unit: &Unit<Unknown>) -> String {
        let mut s = String::new();
        // writing into a String cannot fail
        let _ = self.format(unit, &mut s);
        s
    }
}

/// Symbol-for-symbol lookup against a fixed unit table
pub struct SymbolTable {
    units: Vec<Unit<Unknown>>,
}

impl SymbolTable {
    /// Table over the crate's named units
    pub fn new() -> Self {
        Self {
            units: systems::common_units(),
        }
    }

    /// Table over a caller-supplied unit list
    pub fn with_units(units: Vec<Unit<Unknown>>) -> Self {
        Self { units }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitFormat for SymbolTable {
    fn parse(&self, symbol: &str) -> Result<Unit<Unknown>, ParseError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Ok(systems::one().erase());
        }
        self.units
            .iter()
            .find(|u| u.symbol() == trimmed)
            .cloned()
            .ok_or_else(|| ParseError::UnknownUnit(trimmed.to_string()))
    }

    fn format(&self, unit: &Unit<Unknown>, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{}", unit.symbol())
    }
}
