use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::MeasureError;

/// The numeric backing of a measurement: one of four representations behind
/// a single arithmetic capability surface.
///
/// Equality is strict per variant: `Int32(3)` and `Float64(3.0)` are NOT
/// equal. Cross-backing comparison goes through `Measurement::compare_to`
/// or `approx_eq`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeasureValue {
    Int32(i32),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
}

/// Promotion rank for mixed-backing arithmetic; the wider operand wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    Int32,
    Float32,
    Float64,
    Decimal,
}

/// Both operands lifted to their common backing
enum Pair {
    Int32(i32, i32),
    Float32(f32, f32),
    Float64(f64, f64),
    Decimal(Decimal, Decimal),
}

impl MeasureValue {
    fn kind(&self) -> Kind {
        match self {
            MeasureValue::Int32(_) => Kind::Int32,
            MeasureValue::Float32(_) => Kind::Float32,
            MeasureValue::Float64(_) => Kind::Float64,
            MeasureValue::Decimal(_) => Kind::Decimal,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            MeasureValue::Int32(_) => "i32",
            MeasureValue::Float32(_) => "f32",
            MeasureValue::Float64(_) => "f64",
            MeasureValue::Decimal(_) => "decimal",
        }
    }

    /// True for the arbitrary-precision backing
    pub fn is_big(&self) -> bool {
        matches!(self, MeasureValue::Decimal(_))
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            MeasureValue::Int32(v) => *v as f64,
            MeasureValue::Float32(v) => *v as f64,
            MeasureValue::Float64(v) => *v,
            MeasureValue::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
        }
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            MeasureValue::Int32(v) => *v as f32,
            MeasureValue::Float32(v) => *v,
            MeasureValue::Float64(v) => *v as f32,
            MeasureValue::Decimal(v) => v.to_f32().unwrap_or(f32::NAN),
        }
    }

    /// Lift to the decimal backing. Fails for floats without a decimal
    /// representation (NaN, infinities, out of range).
    pub fn to_decimal(&self) -> Result<Decimal, MeasureError> {
        match self {
            MeasureValue::Int32(v) => Ok(Decimal::from(*v)),
            MeasureValue::Float32(v) => {
                Decimal::from_f32(*v).ok_or(MeasureError::Unrepresentable(*v as f64))
            }
            MeasureValue::Float64(v) => {
                Decimal::from_f64(*v).ok_or(MeasureError::Unrepresentable(*v))
            }
            MeasureValue::Decimal(v) => Ok(*v),
        }
    }

    /// The single promotion point for mixed-backing arithmetic:
    /// Int32 < Float32 < Float64 < Decimal.
    fn promote(&self, other: &Self) -> Result<Pair, MeasureError> {
        match self.kind().max(other.kind()) {
            Kind::Int32 => match (self, other) {
                (MeasureValue::Int32(a), MeasureValue::Int32(b)) => Ok(Pair::Int32(*a, *b)),
                _ => unreachable!("Int32 is the lowest rank"),
            },
            Kind::Float32 => Ok(Pair::Float32(self.as_f32(), other.as_f32())),
            Kind::Float64 => Ok(Pair::Float64(self.as_f64(), other.as_f64())),
            Kind::Decimal => Ok(Pair::Decimal(self.to_decimal()?, other.to_decimal()?)),
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, MeasureError> {
        match self.promote(other)? {
            Pair::Int32(a, b) => a
                .checked_add(b)
                .map(MeasureValue::Int32)
                .ok_or_else(|| MeasureError::Overflow(format!("{} + {}", a, b))),
            Pair::Float32(a, b) => Ok(MeasureValue::Float32(a + b)),
            Pair::Float64(a, b) => Ok(MeasureValue::Float64(a + b)),
            Pair::Decimal(a, b) => a
                .checked_add(b)
                .map(MeasureValue::Decimal)
                .ok_or_else(|| MeasureError::Overflow(format!("{} + {}", a, b))),
        }
    }

    pub fn sub(&self, other: &Self) -> Result<Self, MeasureError> {
        match self.promote(other)? {
            Pair::Int32(a, b) => a
                .checked_sub(b)
                .map(MeasureValue::Int32)
                .ok_or_else(|| MeasureError::Overflow(format!("{} - {}", a, b))),
            Pair::Float32(a, b) => Ok(MeasureValue::Float32(a - b)),
            Pair::Float64(a, b) => Ok(MeasureValue::Float64(a - b)),
            Pair::Decimal(a, b) => a
                .checked_sub(b)
                .map(MeasureValue::Decimal)
                .ok_or_else(|| MeasureError::Overflow(format!("{} - {}", a, b))),
        }
    }

    pub fn mul(&self, other: &Self) -> Result<Self, MeasureError> {
        match self.promote(other)? {
            Pair::Int32(a, b) => a
                .checked_mul(b)
                .map(MeasureValue::Int32)
                .ok_or_else(|| MeasureError::Overflow(format!("{} * {}", a, b))),
            Pair::Float32(a, b) => Ok(MeasureValue::Float32(a * b)),
            Pair::Float64(a, b) => Ok(MeasureValue::Float64(a * b)),
            Pair::Decimal(a, b) => a
                .checked_mul(b)
                .map(MeasureValue::Decimal)
                .ok_or_else(|| MeasureError::Overflow(format!("{} * {}", a, b))),
        }
    }

    /// Integer division truncates; float division keeps IEEE semantics
    /// (zero divisors yield infinities); decimal division is checked.
    pub fn div(&self, other: &Self) -> Result<Self, MeasureError> {
        match self.promote(other)? {
            Pair::Int32(a, b) => {
                if b == 0 {
                    return Err(MeasureError::DivisionByZero);
                }
                a.checked_div(b)
                    .map(MeasureValue::Int32)
                    .ok_or_else(|| MeasureError::Overflow(format!("{} / {}", a, b)))
            }
            Pair::Float32(a, b) => Ok(MeasureValue::Float32(a / b)),
            Pair::Float64(a, b) => Ok(MeasureValue::Float64(a / b)),
            Pair::Decimal(a, b) => {
                if b == Decimal::ZERO {
                    return Err(MeasureError::DivisionByZero);
                }
                a.checked_div(b)
                    .map(MeasureValue::Decimal)
                    .ok_or_else(|| MeasureError::Overflow(format!("{} / {}", a, b)))
            }
        }
    }

    /// Additive inverse, backing preserved
    pub fn neg(&self) -> Result<Self, MeasureError> {
        match self {
            MeasureValue::Int32(v) => v
                .checked_neg()
                .map(MeasureValue::Int32)
                .ok_or_else(|| MeasureError::Overflow(format!("-({})", v))),
            MeasureValue::Float32(v) => Ok(MeasureValue::Float32(-v)),
            MeasureValue::Float64(v) => Ok(MeasureValue::Float64(-v)),
            MeasureValue::Decimal(v) => Ok(MeasureValue::Decimal(-v)),
        }
    }

    /// Multiplicative reciprocal. Integer backings promote to f64: the
    /// reciprocal of an integer is not an integer.
    pub fn recip(&self) -> Result<Self, MeasureError> {
        match self {
            MeasureValue::Int32(v) => {
                if *v == 0 {
                    return Err(MeasureError::DivisionByZero);
                }
                Ok(MeasureValue::Float64(1.0 / *v as f64))
            }
            MeasureValue::Float32(v) => Ok(MeasureValue::Float32(1.0 / v)),
            MeasureValue::Float64(v) => Ok(MeasureValue::Float64(1.0 / v)),
            MeasureValue::Decimal(v) => {
                if *v == Decimal::ZERO {
                    return Err(MeasureError::DivisionByZero);
                }
                Decimal::ONE
                    .checked_div(*v)
                    .map(MeasureValue::Decimal)
                    .ok_or_else(|| MeasureError::Overflow(format!("1/{}", v)))
            }
        }
    }
}

impl From<i32> for MeasureValue {
    fn from(v: i32) -> Self {
        MeasureValue::Int32(v)
    }
}

impl From<f32> for MeasureValue {
    fn from(v: f32) -> Self {
        MeasureValue::Float32(v)
    }
}

impl From<f64> for MeasureValue {
    fn from(v: f64) -> Self {
        MeasureValue::Float64(v)
    }
}

impl From<Decimal> for MeasureValue {
    fn from(v: Decimal) -> Self {
        MeasureValue::Decimal(v)
    }
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureValue::Int32(v) => write!(f, "{}", v),
            MeasureValue::Float32(v) => write!(f, "{}", v),
            MeasureValue::Float64(v) => write!(f, "{}", v),
            MeasureValue::Decimal(v) => write!(f, "{}", v),
        }
    }
}
