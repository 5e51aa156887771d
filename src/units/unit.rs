use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, MathematicalOps, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use super::converter::UnitConverter;
use crate::registry;
use crate::types::{Dimension, DimensionError, Quantity, Unknown};

/// Error types for unit algebra and conversion
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("Incompatible dimensions: {from} vs {to}")]
    Incommensurable { from: Dimension, to: Dimension },

    #[error("No converter from '{from}' to '{to}': dimensions differ")]
    Unconvertible { from: String, to: String },

    #[error("Unit '{unit}' is not a {quantity} unit")]
    TypeMismatch {
        unit: String,
        quantity: &'static str,
    },

    #[error("Quantity '{0}' has no registered system unit")]
    UnregisteredQuantity(&'static str),

    #[error("Unit '{unit}' has no real root of degree {degree}")]
    NoRealRoot { unit: String, degree: i32 },

    #[error("Numeric overflow in unit arithmetic")]
    NumericOverflow,

    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

/// A unit of measurement: a symbol, a multiplicative factor relative to the
/// reference (system) unit of its dimension, an affine offset (zero for
/// purely multiplicative units) and the dimension itself.
///
/// A value `x` stated in this unit equals `factor · x + offset` in the
/// system unit. Units are immutable; derived units are freshly constructed
/// by the algebra below and compared structurally, never by identity.
#[derive(Serialize, Deserialize)]
pub struct Unit<Q: Quantity = Unknown> {
    symbol: String,
    factor: Decimal,
    offset: Decimal,
    dimension: Dimension,
    #[serde(skip)]
    _tag: PhantomData<Q>,
}

impl<Q: Quantity> Unit<Q> {
    /// A purely multiplicative unit scaled against its dimension's reference
    pub fn new(symbol: impl Into<String>, factor: Decimal, dimension: Dimension) -> Self {
        Self {
            symbol: symbol.into(),
            factor,
            offset: Decimal::ZERO,
            dimension,
            _tag: PhantomData,
        }
    }

    /// The reference unit of a dimension: factor one, canonical symbol
    pub fn reference(dimension: Dimension) -> Self {
        Self {
            symbol: dimension.reference_symbol(),
            factor: Decimal::ONE,
            offset: Decimal::ZERO,
            dimension,
            _tag: PhantomData,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Scale factor to the reference unit of this unit's dimension
    pub fn mult_factor(&self) -> Decimal {
        self.factor
    }

    /// Affine offset toward the reference unit (zero for scale-only units)
    pub fn offset(&self) -> Decimal {
        self.offset
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    /// Replace the synthesized symbol with a conventional one
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// The canonical reference unit for this unit's dimension. Idempotent:
    /// the system unit of a system unit is itself.
    pub fn system_unit(&self) -> Unit<Q> {
        Unit::reference(self.dimension.clone())
    }

    /// True iff the dimensions are structurally equal. Compatibility says
    /// nothing about scale: kilometres and inches are compatible.
    pub fn is_compatible<R: Quantity>(&self, other: &Unit<R>) -> bool {
        self.dimension == other.dimension
    }

    /// Converter from this unit to another unit of the same quantity kind
    pub fn converter_to(&self, other: &Unit<Q>) -> Result<UnitConverter, UnitError> {
        self.converter_to_any(other)
    }

    /// Converter to any compatible unit, regardless of its tag
    pub fn converter_to_any<R: Quantity>(
        &self,
        other: &Unit<R>,
    ) -> Result<UnitConverter, UnitError> {
        if !self.is_compatible(other) {
            return Err(UnitError::Unconvertible {
                from: self.symbol.clone(),
                to: other.symbol.clone(),
            });
        }
        let to_system = UnitConverter::affine(self.factor, self.offset);
        let from_system = UnitConverter::affine(other.factor, other.offset).inverse()?;
        Ok(to_system.then(&from_system))
    }

    /// Derived unit scaled by a constant, e.g. kilometre = metre scaled by 1000
    pub fn scaled(&self, factor: Decimal) -> Unit<Q> {
        Unit {
            symbol: format!("{}·{}", factor, self.symbol),
            factor: self.factor * factor,
            offset: Decimal::ZERO,
            dimension: self.dimension.clone(),
            _tag: PhantomData,
        }
    }

    /// Affine derivation: a unit whose zero sits `offset` of this unit above
    /// this unit's zero, e.g. celsius = kelvin shifted by 273.15
    pub fn shift(&self, offset: Decimal) -> Unit<Q> {
        let shifted = self.factor * offset + self.offset;
        Unit {
            symbol: if shifted >= Decimal::ZERO {
                format!("({}+{})", self.symbol, shifted)
            } else {
                format!("({}{})", self.symbol, shifted)
            },
            factor: self.factor,
            offset: shifted,
            dimension: self.dimension.clone(),
            _tag: PhantomData,
        }
    }

    /// Product unit: factors multiply, dimensions combine pointwise. The
    /// affine offset of either operand does not survive composition.
    pub fn multiply<R: Quantity>(&self, other: &Unit<R>) -> Unit<Unknown> {
        Unit {
            symbol: format!("{}·{}", self.symbol, other.symbol),
            factor: self.factor * other.factor,
            offset: Decimal::ZERO,
            dimension: self.dimension.multiply(&other.dimension),
            _tag: PhantomData,
        }
    }

    /// Quotient unit
    pub fn divide<R: Quantity>(&self, other: &Unit<R>) -> Unit<Unknown> {
        Unit {
            symbol: format!("{}/{}", self.symbol, paren(&other.symbol)),
            factor: self.factor / other.factor,
            offset: Decimal::ZERO,
            dimension: self.dimension.divide(&other.dimension),
            _tag: PhantomData,
        }
    }

    /// Power unit: factor and every dimension exponent raised to n
    pub fn pow(&self, n: i32) -> Result<Unit<Unknown>, UnitError> {
        let factor = if n >= 0 {
            self.factor
                .checked_powi(n as i64)
                .ok_or(UnitError::NumericOverflow)?
        } else {
            let positive = self
                .factor
                .checked_powi(-(n as i64))
                .ok_or(UnitError::NumericOverflow)?;
            Decimal::ONE
                .checked_div(positive)
                .ok_or(UnitError::NumericOverflow)?
        };
        Ok(Unit {
            symbol: format!("{}^{}", paren(&self.symbol), n),
            factor,
            offset: Decimal::ZERO,
            dimension: self.dimension.pow(n),
            _tag: PhantomData,
        })
    }

    /// Root unit. Fails when a dimension exponent is not divisible by n or
    /// the factor has no real n-th root.
    pub fn root(&self, n: i32) -> Result<Unit<Unknown>, UnitError> {
        let dimension = self.dimension.root(n)?;
        let factor = self.root_factor(n)?;
        Ok(Unit {
            symbol: format!("{}^(1/{})", paren(&self.symbol), n),
            factor,
            offset: Decimal::ZERO,
            dimension,
            _tag: PhantomData,
        })
    }

    fn root_factor(&self, n: i32) -> Result<Decimal, UnitError> {
        if self.factor == Decimal::ONE {
            return Ok(Decimal::ONE);
        }
        if n == 1 {
            return Ok(self.factor);
        }
        if self.factor < Decimal::ZERO && n % 2 == 0 {
            return Err(UnitError::NoRealRoot {
                unit: self.symbol.clone(),
                degree: n,
            });
        }
        let rooted = if n == 2 {
            self.factor.sqrt().ok_or(UnitError::NoRealRoot {
                unit: self.symbol.clone(),
                degree: n,
            })?
        } else {
            let f = self.factor.to_f64().unwrap_or(f64::NAN);
            let magnitude = f.abs().powf(1.0 / n as f64);
            let signed = if f < 0.0 { -magnitude } else { magnitude };
            if !signed.is_finite() {
                return Err(UnitError::NoRealRoot {
                    unit: self.symbol.clone(),
                    degree: n,
                });
            }
            Decimal::from_f64(signed).ok_or(UnitError::NumericOverflow)?
        };
        // snap to the exact root when one exists; the float estimate can
        // land an ulp away from it
        if n > 0 {
            let snapped = rooted.round_dp(12);
            if snapped.checked_powi(n as i64) == Some(self.factor) {
                return Ok(snapped.normalize());
            }
        }
        Ok(rooted)
    }

    /// Reciprocal unit: dimension negated, factor inverted
    pub fn inverse(&self) -> Result<Unit<Unknown>, UnitError> {
        let factor = Decimal::ONE
            .checked_div(self.factor)
            .ok_or(UnitError::NumericOverflow)?;
        Ok(Unit {
            symbol: format!("1/{}", paren(&self.symbol)),
            factor,
            offset: Decimal::ZERO,
            dimension: self.dimension.pow(-1),
            _tag: PhantomData,
        })
    }

    /// Checked cast to another quantity kind: succeeds iff this unit's
    /// dimension equals the canonical dimension registered for R.
    pub fn as_type<R: Quantity>(&self) -> Result<Unit<R>, UnitError> {
        let expected = registry::dimension_of::<R>()?;
        if self.dimension != *expected {
            return Err(UnitError::TypeMismatch {
                unit: self.symbol.clone(),
                quantity: R::NAME,
            });
        }
        Ok(self.retag())
    }

    /// Drop the quantity tag
    pub fn erase(&self) -> Unit<Unknown> {
        self.retag()
    }

    pub(crate) fn retag<R: Quantity>(&self) -> Unit<R> {
        Unit {
            symbol: self.symbol.clone(),
            factor: self.factor,
            offset: self.offset,
            dimension: self.dimension.clone(),
            _tag: PhantomData,
        }
    }
}

/// Wrap composite symbols before attaching an exponent or divisor
fn paren(symbol: &str) -> String {
    if symbol.contains(['·', '/', '^']) {
        format!("({})", symbol)
    } else {
        symbol.to_string()
    }
}

impl<Q: Quantity> Clone for Unit<Q> {
    fn clone(&self) -> Self {
        self.retag()
    }
}

impl<Q: Quantity> PartialEq for Unit<Q> {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.factor == other.factor
            && self.offset == other.offset
            && self.dimension == other.dimension
    }
}

impl<Q: Quantity> Eq for Unit<Q> {}

impl<Q: Quantity> fmt::Debug for Unit<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("symbol", &self.symbol)
            .field("factor", &self.factor)
            .field("offset", &self.offset)
            .field("dimension", &self.dimension)
            .field("quantity", &Q::NAME)
            .finish()
    }
}

impl<Q: Quantity> fmt::Display for Unit<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::DecimalContext;
    use crate::types::{Length, Mass, Temperature};
    use crate::units::systems::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_system_unit_is_idempotent() {
        let m = meter();
        assert_eq!(m.system_unit(), m);
        assert_eq!(kilometer().system_unit(), m);
        assert_eq!(m.system_unit().system_unit(), m);
    }

    #[test]
    fn test_compatibility_ignores_scale() {
        assert!(kilometer().is_compatible(&inch()));
        assert!(!kilometer().is_compatible(&kilogram()));
    }

    #[test]
    fn test_converter_to_self_is_identity() {
        let km = kilometer();
        assert!(km.converter_to(&km).unwrap().is_identity());
    }

    #[test]
    fn test_converter_between_scaled_units() {
        let c = kilometer().converter_to(&meter()).unwrap();
        assert_relative_eq!(c.convert_f64(5.0), 5000.0);
        assert_eq!(
            c.convert_decimal(dec!(5), &DecimalContext::UNLIMITED)
                .unwrap(),
            dec!(5000)
        );
    }

    #[test]
    fn test_converter_rejects_dimension_mismatch() {
        let err = meter().converter_to_any(&second()).unwrap_err();
        assert!(matches!(err, UnitError::Unconvertible { .. }));
    }

    #[test]
    fn test_affine_temperature_conversion() {
        let c = celsius().converter_to(&kelvin()).unwrap();
        assert_eq!(
            c.convert_decimal(dec!(25), &DecimalContext::UNLIMITED)
                .unwrap(),
            dec!(298.15)
        );

        let back = kelvin().converter_to(&celsius()).unwrap();
        assert_eq!(
            back.convert_decimal(dec!(273.15), &DecimalContext::UNLIMITED)
                .unwrap(),
            dec!(0)
        );
    }

    #[test]
    fn test_fahrenheit_round_trip() {
        let f_to_c = fahrenheit().converter_to(&celsius()).unwrap();
        assert_relative_eq!(f_to_c.convert_f64(212.0), 100.0, epsilon = 1e-9);
        assert_relative_eq!(f_to_c.convert_f64(32.0), 0.0, epsilon = 1e-9);

        let c_to_f = celsius().converter_to(&fahrenheit()).unwrap();
        assert_relative_eq!(c_to_f.convert_f64(f_to_c.convert_f64(-40.0)), -40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_multiply_combines_dimensions() {
        let mps = meter().divide(&second());
        assert_eq!(
            *mps.dimension(),
            meter().dimension().divide(second().dimension())
        );

        let area = meter().multiply(&meter());
        assert_eq!(
            *area.dimension(),
            meter().dimension().multiply(meter().dimension())
        );
    }

    #[test]
    fn test_derived_factor_is_product_of_factors() {
        let kmh = kilometer().divide(&hour());
        assert_eq!(kmh.mult_factor(), dec!(1000) / dec!(3600));

        let sq_km = kilometer().multiply(&kilometer());
        assert_eq!(sq_km.mult_factor(), dec!(1000000));
    }

    #[test]
    fn test_pow_and_root_round_trip() {
        let km = kilometer();
        let cubed = km.pow(3).unwrap();
        assert_eq!(cubed.mult_factor(), dec!(1000000000));
        let back = cubed.root(3).unwrap();
        assert_eq!(back.mult_factor(), km.mult_factor());
        assert_eq!(*back.dimension(), *km.dimension());
    }

    #[test]
    fn test_root_requires_divisible_exponents() {
        let err = meter().root(2).unwrap_err();
        assert!(matches!(
            err,
            UnitError::Dimension(DimensionError::NonIntegralRoot { .. })
        ));
    }

    #[test]
    fn test_root_of_negative_factor_fails() {
        let weird = Unit::<Unknown>::new("neg", dec!(-4), Dimension::none());
        assert!(matches!(
            weird.root(2),
            Err(UnitError::NoRealRoot { .. })
        ));
    }

    #[test]
    fn test_inverse_unit() {
        let hz = second().inverse().unwrap();
        assert_eq!(hz.dimension().exponent(crate::types::BaseDimension::Time), -1);
        let per_min = minute().inverse().unwrap();
        assert_eq!(per_min.mult_factor(), dec!(1) / dec!(60));
    }

    #[test]
    fn test_as_type_checked_cast() {
        let pound = pound().erase();
        assert!(pound.as_type::<Mass>().is_ok());
        let err = pound.as_type::<Temperature>().unwrap_err();
        assert!(matches!(err, UnitError::TypeMismatch { .. }));
    }

    #[test]
    fn test_structural_equality_includes_symbol() {
        let liter = liter();
        let cubic_dm = Unit::<crate::types::Volume>::new(
            "dm^3",
            dec!(0.001),
            liter.dimension().clone(),
        );
        assert_ne!(liter, cubic_dm);
        assert!(liter.converter_to(&cubic_dm).unwrap().is_identity());
    }

    #[test]
    fn test_scaled_and_renamed() {
        let km = meter().scaled(dec!(1000)).with_symbol("km");
        assert_eq!(km, kilometer());
    }

    #[test]
    fn test_serde_round_trip() {
        let km = kilometer();
        let json = serde_json::to_string(&km).unwrap();
        let back: Unit<Length> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, km);
    }
}
