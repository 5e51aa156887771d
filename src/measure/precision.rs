use rust_decimal::{Decimal, RoundingStrategy};

/// Precision policy for the arbitrary-precision conversion path.
///
/// `digits` bounds the number of fractional digits kept after each conversion
/// step, rounded with `rounding`; `None` keeps the backing's full 96-bit
/// precision (the unlimited mode used by lossless conversions).
#[derive(Debug, Clone, Copy)]
pub struct DecimalContext {
    pub digits: Option<u32>,
    pub rounding: RoundingStrategy,
}

impl DecimalContext {
    /// Full-precision mode: no rounding beyond the decimal backing itself
    pub const UNLIMITED: DecimalContext = DecimalContext {
        digits: None,
        rounding: RoundingStrategy::MidpointNearestEven,
    };

    pub fn new(digits: u32, rounding: RoundingStrategy) -> Self {
        Self {
            digits: Some(digits),
            rounding,
        }
    }

    /// Bounded context with banker's rounding
    pub fn with_digits(digits: u32) -> Self {
        Self::new(digits, RoundingStrategy::MidpointNearestEven)
    }

    pub(crate) fn apply(&self, value: Decimal) -> Decimal {
        match self.digits {
            Some(digits) => value.round_dp_with_strategy(digits, self.rounding),
            None => value,
        }
    }
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unlimited_leaves_value_untouched() {
        let v = dec!(1.23456789012345678901234567);
        assert_eq!(DecimalContext::UNLIMITED.apply(v), v);
    }

    #[test]
    fn test_bounded_context_rounds() {
        let ctx = DecimalContext::with_digits(2);
        assert_eq!(ctx.apply(dec!(2.675)), dec!(2.68));
        // banker's rounding at the midpoint
        assert_eq!(ctx.apply(dec!(2.665)), dec!(2.66));
    }

    #[test]
    fn test_explicit_strategy() {
        let ctx = DecimalContext::new(1, RoundingStrategy::ToZero);
        assert_eq!(ctx.apply(dec!(9.99)), dec!(9.9));
    }
}
