use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::{DecimalContext, MeasureError, MeasureValue};
use crate::text::UnitFormat;
use crate::types::{Quantity, Unknown};
use crate::units::{Unit, UnitError};

/// The immutable result of a scalar measurement stated in a known unit.
///
/// Measurements never mutate: every operation returns a new instance. To
/// avoid precision loss, known exact values (physical constants) should be
/// constructed from a decimal rather than a float backing; conversions of a
/// decimal-backed measurement run on the arbitrary-precision path.
///
/// Equality is strict: same unit, same backing kind, same numeric
/// representation. `Measurement::of(3, m)` and `Measurement::of(3.0, m)`
/// are not equal; use [`Measurement::compare_to`] or
/// [`Measurement::approx_eq`] for cross-backing comparison.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Measurement<Q: Quantity = Unknown> {
    value: MeasureValue,
    unit: Unit<Q>,
}

impl<Q: Quantity> Measurement<Q> {
    /// A measurement of `value` stated in `unit`
    pub fn of(value: impl Into<MeasureValue>, unit: Unit<Q>) -> Self {
        Self {
            value: value.into(),
            unit,
        }
    }

    pub fn value(&self) -> &MeasureValue {
        &self.value
    }

    pub fn unit(&self) -> &Unit<Q> {
        &self.unit
    }

    /// True when backed by the arbitrary-precision decimal representation
    pub fn is_big(&self) -> bool {
        self.value.is_big()
    }

    /// Numeric value stated in `unit`, evaluated on the f64 path
    pub fn f64_value(&self, unit: &Unit<Q>) -> Result<f64, UnitError> {
        if self.unit == *unit {
            Ok(self.value.as_f64())
        } else {
            let converter = self.unit.converter_to(unit)?;
            Ok(converter.convert_f64(self.value.as_f64()))
        }
    }

    pub fn f32_value(&self, unit: &Unit<Q>) -> Result<f32, UnitError> {
        Ok(self.f64_value(unit)? as f32)
    }

    /// Numeric value stated in `unit` on the arbitrary-precision path, under
    /// the caller's precision policy
    pub fn decimal_value(
        &self,
        unit: &Unit<Q>,
        ctx: &DecimalContext,
    ) -> Result<Decimal, MeasureError> {
        let decimal = self.value.to_decimal()?;
        if self.unit == *unit {
            Ok(decimal)
        } else {
            let converter = self.unit.converter_to(unit)?;
            Ok(converter.convert_decimal(decimal, ctx)?)
        }
    }

    /// Value stated in `unit`, narrowed to i64. Fails when the converted
    /// magnitude falls outside the representable range.
    pub fn i64_value(&self, unit: &Unit<Q>) -> Result<i64, MeasureError> {
        let converted = self.f64_value(unit)?;
        if !(converted >= i64::MIN as f64 && converted <= i64::MAX as f64) {
            return Err(MeasureError::Overflow(format!("{} to i64", converted)));
        }
        Ok(converted as i64)
    }

    /// Value stated in `unit`, narrowed to i32
    pub fn i32_value(&self, unit: &Unit<Q>) -> Result<i32, MeasureError> {
        let wide = self.i64_value(unit)?;
        i32::try_from(wide).map_err(|_| MeasureError::Overflow(format!("{} to i32", wide)))
    }

    /// This measurement restated in `target`.
    ///
    /// When `target` structurally equals the current unit the value comes
    /// back unchanged, representation included. Otherwise decimal-backed
    /// measurements convert losslessly on the unlimited-precision decimal
    /// path; primitive backings use f64 evaluation.
    pub fn to(&self, target: &Unit<Q>) -> Result<Measurement<Q>, MeasureError> {
        if self.unit == *target {
            return Ok(self.clone());
        }
        match self.value {
            MeasureValue::Decimal(_) => {
                let converted = self.decimal_value(target, &DecimalContext::UNLIMITED)?;
                Ok(Measurement::of(converted, target.clone()))
            }
            MeasureValue::Float32(_) => {
                Ok(Measurement::of(self.f64_value(target)? as f32, target.clone()))
            }
            _ => Ok(Measurement::of(self.f64_value(target)?, target.clone())),
        }
    }

    /// Conversion with an explicit precision policy; always produces a
    /// decimal-backed result
    pub fn to_with(
        &self,
        target: &Unit<Q>,
        ctx: &DecimalContext,
    ) -> Result<Measurement<Q>, MeasureError> {
        if self.unit == *target {
            return Ok(self.clone());
        }
        let converted = self.decimal_value(target, ctx)?;
        Ok(Measurement::of(converted, target.clone()))
    }

    /// This measurement restated in the reference unit of its dimension
    pub fn to_system_unit(&self) -> Result<Measurement<Q>, MeasureError> {
        self.to(&self.unit.system_unit())
    }

    fn incommensurable<R: Quantity>(&self, other: &Measurement<R>) -> MeasureError {
        UnitError::Incommensurable {
            from: self.unit.dimension().clone(),
            to: other.unit.dimension().clone(),
        }
        .into()
    }

    /// Sum of two measurements. Equal units stay put; differing compatible
    /// units are both normalized to the common system unit, so neither
    /// operand's unit arbitrarily wins.
    pub fn add(&self, other: &Measurement<Q>) -> Result<Measurement<Q>, MeasureError> {
        if self.unit == other.unit {
            return Ok(Measurement {
                value: self.value.add(&other.value)?,
                unit: self.unit.clone(),
            });
        }
        if !self.unit.is_compatible(&other.unit) {
            return Err(self.incommensurable(other));
        }
        let system = self.unit.system_unit();
        let a = self.to(&system)?;
        let b = other.to(&system)?;
        Ok(Measurement {
            value: a.value.add(&b.value)?,
            unit: system,
        })
    }

    /// Difference, with the same unit policy as [`Measurement::add`]
    pub fn sub(&self, other: &Measurement<Q>) -> Result<Measurement<Q>, MeasureError> {
        if self.unit == other.unit {
            return Ok(Measurement {
                value: self.value.sub(&other.value)?,
                unit: self.unit.clone(),
            });
        }
        if !self.unit.is_compatible(&other.unit) {
            return Err(self.incommensurable(other));
        }
        let system = self.unit.system_unit();
        let a = self.to(&system)?;
        let b = other.to(&system)?;
        Ok(Measurement {
            value: a.value.sub(&b.value)?,
            unit: system,
        })
    }

    /// Product: values combine per the backing promotion table, units per
    /// the unit algebra. The result's quantity kind is no longer known
    /// statically; recover it with [`Measurement::as_type`].
    pub fn mul<R: Quantity>(
        &self,
        other: &Measurement<R>,
    ) -> Result<Measurement<Unknown>, MeasureError> {
        Ok(Measurement {
            value: self.value.mul(&other.value)?,
            unit: self.unit.multiply(&other.unit),
        })
    }

    /// Quotient of two measurements
    pub fn div<R: Quantity>(
        &self,
        other: &Measurement<R>,
    ) -> Result<Measurement<Unknown>, MeasureError> {
        Ok(Measurement {
            value: self.value.div(&other.value)?,
            unit: self.unit.divide(&other.unit),
        })
    }

    /// Scale by a bare number; the unit is unchanged
    pub fn mul_scalar(&self, scalar: impl Into<MeasureValue>) -> Result<Measurement<Q>, MeasureError> {
        Ok(Measurement {
            value: self.value.mul(&scalar.into())?,
            unit: self.unit.clone(),
        })
    }

    pub fn div_scalar(&self, scalar: impl Into<MeasureValue>) -> Result<Measurement<Q>, MeasureError> {
        Ok(Measurement {
            value: self.value.div(&scalar.into())?,
            unit: self.unit.clone(),
        })
    }

    /// Multiplicative reciprocal: 1/value in the reciprocal unit
    pub fn inverse(&self) -> Result<Measurement<Unknown>, MeasureError> {
        Ok(Measurement {
            value: self.value.recip()?,
            unit: self.unit.inverse()?,
        })
    }

    /// Additive inverse, unit and backing preserved
    pub fn neg(&self) -> Result<Measurement<Q>, MeasureError> {
        Ok(Measurement {
            value: self.value.neg()?,
            unit: self.unit.clone(),
        })
    }

    /// Ordering of two measurements, the other converted into this
    /// measurement's unit first. Not defined across incompatible dimensions.
    pub fn compare_to(&self, other: &Measurement<Q>) -> Result<Ordering, MeasureError> {
        if !self.unit.is_compatible(&other.unit) {
            return Err(self.incommensurable(other));
        }
        let here = self.value.as_f64();
        let there = other.f64_value(&self.unit)?;
        Ok(here.total_cmp(&there))
    }

    /// Approximate equality: absolute difference, stated in `epsilon_unit`,
    /// within `epsilon`
    pub fn approx_eq(
        &self,
        other: &Measurement<Q>,
        epsilon: f64,
        epsilon_unit: &Unit<Q>,
    ) -> Result<bool, MeasureError> {
        if !self.unit.is_compatible(&other.unit) {
            return Err(self.incommensurable(other));
        }
        let a = self.f64_value(epsilon_unit)?;
        let b = other.f64_value(epsilon_unit)?;
        Ok((a - b).abs() <= epsilon)
    }

    /// Checked cast to another quantity kind, validated against the
    /// registered canonical dimension for R
    pub fn as_type<R: Quantity>(&self) -> Result<Measurement<R>, UnitError> {
        Ok(Measurement {
            value: self.value,
            unit: self.unit.as_type::<R>()?,
        })
    }

    /// Drop the quantity tag
    pub fn erase(&self) -> Measurement<Unknown> {
        Measurement {
            value: self.value,
            unit: self.unit.erase(),
        }
    }
}

impl Measurement<Unknown> {
    /// Parse "value [unit]" text, delegating unit resolution to the
    /// formatting collaborator. A missing unit token yields a dimensionless
    /// measurement; the numeric part is kept exact on the decimal backing.
    pub fn parse(text: &str, format: &impl UnitFormat) -> Result<Self, MeasureError> {
        let trimmed = text.trim();
        let (number, symbol) = match trimmed.split_once(char::is_whitespace) {
            Some((n, s)) => (n, s.trim()),
            None => (trimmed, ""),
        };
        let value: Decimal = number
            .parse()
            .map_err(|_| crate::text::ParseError::InvalidNumber(number.to_string()))?;
        let unit = format.parse(symbol)?;
        Ok(Measurement::of(value, unit))
    }
}

impl<Q: Quantity> Clone for Measurement<Q> {
    fn clone(&self) -> Self {
        Self {
            value: self.value,
            unit: self.unit.clone(),
        }
    }
}

impl<Q: Quantity> PartialEq for Measurement<Q> {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.value == other.value
    }
}

impl<Q: Quantity> fmt::Debug for Measurement<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Measurement")
            .field("value", &self.value)
            .field("unit", &self.unit)
            .finish()
    }
}

impl<Q: Quantity> fmt::Display for Measurement<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::SymbolTable;
    use crate::types::{Mass, Temperature, Velocity};
    use crate::units::systems::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kilometers_to_meters() {
        let m = Measurement::of(5.0, kilometer()).to(&meter()).unwrap();
        assert_eq!(m.unit(), &meter());
        assert_relative_eq!(m.value().as_f64(), 5000.0);
    }

    #[test]
    fn test_decimal_conversion_is_exact() {
        let m = Measurement::of(dec!(5), kilometer()).to(&meter()).unwrap();
        assert_eq!(m.value(), &MeasureValue::Decimal(dec!(5000)));
        assert!(m.is_big());
    }

    #[test]
    fn test_to_same_unit_keeps_representation() {
        let m = Measurement::of(3, meter());
        let same = m.to(&meter()).unwrap();
        assert_eq!(same, m);
        assert_eq!(same.value(), &MeasureValue::Int32(3));
    }

    #[test]
    fn test_to_with_bounded_precision() {
        let m = Measurement::of(dec!(1), meter());
        let feet = m.to_with(&foot(), &DecimalContext::with_digits(4)).unwrap();
        assert_eq!(feet.value(), &MeasureValue::Decimal(dec!(3.2808)));
    }

    #[test]
    fn test_round_trip_preserves_decimal_value() {
        let m = Measurement::of(dec!(12.5), meter());
        let back = m.to(&kilometer()).unwrap().to(&meter()).unwrap();
        assert_eq!(
            back.decimal_value(&meter(), &DecimalContext::UNLIMITED).unwrap(),
            dec!(12.5)
        );
    }

    #[test]
    fn test_add_same_unit_stays_in_unit() {
        let sum = Measurement::of(3.0, meter())
            .add(&Measurement::of(4.0, meter()))
            .unwrap();
        assert_eq!(sum.unit(), &meter());
        assert_relative_eq!(sum.value().as_f64(), 7.0);
    }

    #[test]
    fn test_add_differing_units_normalizes_to_system_unit() {
        let sum = Measurement::of(1.0, kilometer())
            .add(&Measurement::of(200.0, meter()))
            .unwrap();
        assert_eq!(sum.unit(), &meter());
        assert_relative_eq!(sum.value().as_f64(), 1200.0);
    }

    #[test]
    fn test_sub_in_customary_units() {
        let diff = Measurement::of(1.0, yard())
            .sub(&Measurement::of(2.0, foot()))
            .unwrap();
        assert_eq!(diff.unit().symbol(), "m");
        assert_relative_eq!(diff.value().as_f64(), 0.3048, epsilon = 1e-12);
    }

    #[test]
    fn test_add_incompatible_dimensions_fails() {
        let err = Measurement::of(1.0, meter())
            .erase()
            .add(&Measurement::of(1.0, kilogram()).erase())
            .unwrap_err();
        assert!(matches!(
            err,
            MeasureError::Unit(UnitError::Incommensurable { .. })
        ));
    }

    #[test]
    fn test_mul_derives_unit_and_dimension() {
        let area = Measurement::of(2.0, meter())
            .mul(&Measurement::of(3.0, meter()))
            .unwrap();
        assert_relative_eq!(area.value().as_f64(), 6.0);
        assert_eq!(
            *area.unit().dimension(),
            meter().dimension().multiply(meter().dimension())
        );
        assert!(area.unit().erase().as_type::<crate::types::Area>().is_ok());
    }

    #[test]
    fn test_div_derives_velocity() {
        let v = Measurement::of(100.0, meter())
            .div(&Measurement::of(9.58, second()))
            .unwrap();
        let v = v.as_type::<Velocity>().unwrap();
        let mps = v.f64_value(&meter_per_second()).unwrap();
        assert_relative_eq!(mps, 100.0 / 9.58, epsilon = 1e-12);
    }

    #[test]
    fn test_scalar_ops_keep_unit() {
        let m = Measurement::of(6.0, foot()).mul_scalar(2.0).unwrap();
        assert_eq!(m.unit(), &foot());
        assert_relative_eq!(m.value().as_f64(), 12.0);

        let m = m.div_scalar(4).unwrap();
        assert_relative_eq!(m.value().as_f64(), 3.0);
    }

    #[test]
    fn test_inverse_is_reciprocal() {
        let period = Measurement::of(4.0, second());
        let frequency = period.inverse().unwrap();
        assert_relative_eq!(frequency.value().as_f64(), 0.25);
        assert_eq!(
            frequency.unit().dimension().exponent(crate::types::BaseDimension::Time),
            -1
        );
    }

    #[test]
    fn test_neg_keeps_unit_and_backing() {
        let m = Measurement::of(7, celsius()).neg().unwrap();
        assert_eq!(m.value(), &MeasureValue::Int32(-7));
        assert_eq!(m.unit(), &celsius());
    }

    #[test]
    fn test_compare_across_units() {
        let a = Measurement::of(1.0, kilometer());
        let b = Measurement::of(999.0, meter());
        assert_eq!(a.compare_to(&b).unwrap(), Ordering::Greater);
        assert_eq!(b.compare_to(&a).unwrap(), Ordering::Less);
        assert_eq!(
            a.compare_to(&Measurement::of(1000.0, meter())).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_incompatible_fails() {
        let a = Measurement::of(1.0, meter()).erase();
        let b = Measurement::of(1.0, second()).erase();
        assert!(matches!(
            a.compare_to(&b),
            Err(MeasureError::Unit(UnitError::Incommensurable { .. }))
        ));
    }

    #[test]
    fn test_strict_equality() {
        assert_eq!(Measurement::of(3, meter()), Measurement::of(3, meter()));
        // same number, different backing kind
        assert_ne!(Measurement::of(3, meter()), Measurement::of(3.0, meter()));
        // same number, different unit
        assert_ne!(
            Measurement::of(1.0, kilometer()).erase(),
            Measurement::of(1000.0, meter()).erase()
        );
    }

    #[test]
    fn test_approx_eq_bridges_units_and_backings() {
        let a = Measurement::of(1.0, kilometer());
        let b = Measurement::of(dec!(1000.0001), meter());
        assert!(a.approx_eq(&b, 0.001, &meter()).unwrap());
        assert!(a.approx_eq(&b, 0.001, &kilometer()).unwrap());
        assert!(!a.approx_eq(&Measurement::of(1001.0, meter()), 0.5, &meter()).unwrap());
    }

    #[test]
    fn test_as_type_scenario() {
        let weight = Measurement::of(180.0, pound()).erase();
        assert!(weight.as_type::<Mass>().is_ok());
        let err = weight.as_type::<Temperature>().unwrap_err();
        assert!(matches!(err, UnitError::TypeMismatch { .. }));
    }

    #[test]
    fn test_narrowing_overflow() {
        let huge = Measurement::of(1.0e19, meter());
        assert!(matches!(
            huge.i64_value(&meter()),
            Err(MeasureError::Overflow(_))
        ));

        let wide = Measurement::of(3.0e9, meter());
        assert_eq!(wide.i64_value(&meter()).unwrap(), 3_000_000_000);
        assert!(matches!(
            wide.i32_value(&meter()),
            Err(MeasureError::Overflow(_))
        ));
    }

    #[test]
    fn test_narrowing_converts_first() {
        let m = Measurement::of(2.5, kilometer());
        assert_eq!(m.i64_value(&meter()).unwrap(), 2500);
    }

    #[test]
    fn test_temperature_measurement_conversion() {
        let body = Measurement::of(dec!(37), celsius());
        assert_eq!(
            body.decimal_value(&kelvin(), &DecimalContext::UNLIMITED).unwrap(),
            dec!(310.15)
        );
        let f = body.f64_value(&fahrenheit()).unwrap();
        assert_relative_eq!(f, 98.6, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_with_symbol_table() {
        let table = SymbolTable::new();
        let m = Measurement::parse("3.5 km", &table).unwrap();
        assert_eq!(m.value(), &MeasureValue::Decimal(dec!(3.5)));
        assert_eq!(m.unit().symbol(), "km");

        // no unit token parses as dimensionless
        let plain = Measurement::parse("0.234", &table).unwrap();
        assert_eq!(plain.unit().symbol(), "1");

        assert!(matches!(
            Measurement::parse("3.5 parsecs", &table),
            Err(MeasureError::Parse(_))
        ));
        assert!(matches!(
            Measurement::parse("abc km", &table),
            Err(MeasureError::Parse(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Measurement::of(5, kilometer()).to_string(), "5 km");
        assert_eq!(
            Measurement::of(dec!(2.25), pound()).to_string(),
            "2.25 lb"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let m = Measurement::of(dec!(9.81), meter_per_second_squared());
        let json = serde_json::to_string(&m).unwrap();
        let back: Measurement<crate::types::Acceleration> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_to_system_unit() {
        let mph = Measurement::of(60.0, mile_per_hour());
        let si = mph.to_system_unit().unwrap();
        assert_eq!(si.unit().symbol(), "m/s");
        assert_relative_eq!(si.value().as_f64(), 26.8224, epsilon = 1e-9);
    }
}
