mod measurement;
mod precision;
mod value;

pub use measurement::Measurement;
pub use precision::DecimalContext;
pub use value::MeasureValue;

use crate::text::ParseError;
use crate::units::UnitError;

/// Error types for measurement construction, arithmetic and narrowing
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("Numeric overflow: {0}")]
    Overflow(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Value {0} has no exact decimal representation")]
    Unrepresentable(f64),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
