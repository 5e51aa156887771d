use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::unit::UnitError;
use crate::measure::DecimalContext;

/// A pure conversion function between the scales of two compatible units.
///
/// Converters are stateless and freely shareable. Every converter can be
/// evaluated on the fast f64 path or on the arbitrary-precision decimal path
/// with a caller-supplied [`DecimalContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitConverter {
    Identity,

    /// y = factor · x
    Linear { factor: Decimal },

    /// y = scale · x + offset
    Affine { scale: Decimal, offset: Decimal },

    /// inner first, then outer
    Compound {
        inner: Box<UnitConverter>,
        outer: Box<UnitConverter>,
    },
}

impl UnitConverter {
    /// Purely multiplicative converter; a factor of one collapses to Identity
    pub fn linear(factor: Decimal) -> UnitConverter {
        if factor == Decimal::ONE {
            UnitConverter::Identity
        } else {
            UnitConverter::Linear { factor }
        }
    }

    /// Affine converter; a zero offset collapses to the linear form
    pub fn affine(scale: Decimal, offset: Decimal) -> UnitConverter {
        if offset == Decimal::ZERO {
            Self::linear(scale)
        } else {
            UnitConverter::Affine { scale, offset }
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            UnitConverter::Identity => true,
            UnitConverter::Compound { inner, outer } => inner.is_identity() && outer.is_identity(),
            _ => false,
        }
    }

    /// View as (scale, offset) when the chain collapses to an affine map
    fn as_affine(&self) -> Option<(Decimal, Decimal)> {
        match self {
            UnitConverter::Identity => Some((Decimal::ONE, Decimal::ZERO)),
            UnitConverter::Linear { factor } => Some((*factor, Decimal::ZERO)),
            UnitConverter::Affine { scale, offset } => Some((*scale, *offset)),
            UnitConverter::Compound { inner, outer } => {
                let (a1, b1) = inner.as_affine()?;
                let (a2, b2) = outer.as_affine()?;
                // outer(inner(x)) = a2·a1·x + a2·b1 + b2
                let scale = a2.checked_mul(a1)?;
                let offset = a2.checked_mul(b1)?.checked_add(b2)?;
                Some((scale, offset))
            }
        }
    }

    /// Compose this converter with `outer`, applying `self` first.
    ///
    /// Chains of linear/affine legs are collapsed analytically; the compound
    /// form survives only when collapsing would overflow the decimal range.
    pub fn then(&self, outer: &UnitConverter) -> UnitConverter {
        if self.is_identity() {
            return outer.clone();
        }
        if outer.is_identity() {
            return self.clone();
        }
        let composed = UnitConverter::Compound {
            inner: Box::new(self.clone()),
            outer: Box::new(outer.clone()),
        };
        match composed.as_affine() {
            Some((scale, offset)) => Self::affine(scale, offset),
            None => composed,
        }
    }

    /// Analytic inverse: Linear(a) → Linear(1/a), Affine(a, b) → Affine(1/a, -b/a).
    pub fn inverse(&self) -> Result<UnitConverter, UnitError> {
        match self {
            UnitConverter::Identity => Ok(UnitConverter::Identity),
            UnitConverter::Linear { factor } => {
                let inv = Decimal::ONE
                    .checked_div(*factor)
                    .ok_or(UnitError::NumericOverflow)?;
                Ok(Self::linear(inv))
            }
            UnitConverter::Affine { scale, offset } => {
                let inv_scale = Decimal::ONE
                    .checked_div(*scale)
                    .ok_or(UnitError::NumericOverflow)?;
                let inv_offset = offset
                    .checked_div(*scale)
                    .and_then(|d| d.checked_mul(Decimal::NEGATIVE_ONE))
                    .ok_or(UnitError::NumericOverflow)?;
                Ok(Self::affine(inv_scale, inv_offset))
            }
            UnitConverter::Compound { inner, outer } => Ok(UnitConverter::Compound {
                inner: Box::new(outer.inverse()?),
                outer: Box::new(inner.inverse()?),
            }),
        }
    }

    /// Fast floating-point evaluation
    pub fn convert_f64(&self, value: f64) -> f64 {
        match self {
            UnitConverter::Identity => value,
            UnitConverter::Linear { factor } => value * factor.to_f64().unwrap_or(f64::NAN),
            UnitConverter::Affine { scale, offset } => {
                value * scale.to_f64().unwrap_or(f64::NAN) + offset.to_f64().unwrap_or(f64::NAN)
            }
            UnitConverter::Compound { inner, outer } => outer.convert_f64(inner.convert_f64(value)),
        }
    }

    /// Arbitrary-precision evaluation. The context is applied after each
    /// conversion step, mirroring per-operation rounding semantics.
    pub fn convert_decimal(
        &self,
        value: Decimal,
        ctx: &DecimalContext,
    ) -> Result<Decimal, UnitError> {
        match self {
            UnitConverter::Identity => Ok(ctx.apply(value)),
            UnitConverter::Linear { factor } => {
                let out = value
                    .checked_mul(*factor)
                    .ok_or(UnitError::NumericOverflow)?;
                Ok(ctx.apply(out))
            }
            UnitConverter::Affine { scale, offset } => {
                let out = value
                    .checked_mul(*scale)
                    .and_then(|v| v.checked_add(*offset))
                    .ok_or(UnitError::NumericOverflow)?;
                Ok(ctx.apply(out))
            }
            UnitConverter::Compound { inner, outer } => {
                let mid = inner.convert_decimal(value, ctx)?;
                outer.convert_decimal(mid, ctx)
            }
        }
    }
}
