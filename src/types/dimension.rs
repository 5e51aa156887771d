use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The seven SI base dimensions. These are a unit's "type": conversion is
/// only possible between units whose dimensions are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseDimension {
    // declaration order fixes the canonical symbol order: M·L/T²
    Mass,
    Length,
    Time,
    ElectricCurrent,
    Temperature,
    AmountOfSubstance,
    LuminousIntensity,
}

impl BaseDimension {
    /// Conventional dimension symbol (M, L, T, I, Th, N, J)
    pub fn symbol(&self) -> &'static str {
        match self {
            BaseDimension::Mass => "M",
            BaseDimension::Length => "L",
            BaseDimension::Time => "T",
            BaseDimension::ElectricCurrent => "I",
            BaseDimension::Temperature => "Th",
            BaseDimension::AmountOfSubstance => "N",
            BaseDimension::LuminousIntensity => "J",
        }
    }

    /// Symbol of the reference (system) unit of this base dimension
    pub fn reference_symbol(&self) -> &'static str {
        match self {
            BaseDimension::Mass => "kg",
            BaseDimension::Length => "m",
            BaseDimension::Time => "s",
            BaseDimension::ElectricCurrent => "A",
            BaseDimension::Temperature => "K",
            BaseDimension::AmountOfSubstance => "mol",
            BaseDimension::LuminousIntensity => "cd",
        }
    }
}

impl fmt::Display for BaseDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Error types for dimension exponent operations
#[derive(Debug, thiserror::Error)]
pub enum DimensionError {
    #[error("Exponent {exponent} of {base} is not divisible by {degree}")]
    NonIntegralRoot {
        base: BaseDimension,
        exponent: i32,
        degree: i32,
    },

    #[error("Zeroth root of a dimension is undefined")]
    ZeroRoot,
}

/// A physical dimension: a product of base dimensions with integer
/// exponents, e.g. {L: 1, T: -1} for velocity.
///
/// Entries with exponent zero are never stored, so two dimensions are equal
/// iff their exponent maps are equal, and the dimensionless dimension is the
/// empty map (the multiplicative identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimension {
    exponents: BTreeMap<BaseDimension, i32>,
}

impl Dimension {
    /// The dimensionless dimension (empty exponent map)
    pub fn none() -> Self {
        Self::default()
    }

    /// A single base dimension with exponent 1
    pub fn base(base: BaseDimension) -> Self {
        let mut exponents = BTreeMap::new();
        exponents.insert(base, 1);
        Self { exponents }
    }

    /// Build from (base, exponent) pairs; zero exponents are dropped
    pub fn from_exponents(pairs: impl IntoIterator<Item = (BaseDimension, i32)>) -> Self {
        let mut exponents = BTreeMap::new();
        for (base, exp) in pairs {
            if exp != 0 {
                *exponents.entry(base).or_insert(0) += exp;
            }
        }
        exponents.retain(|_, e| *e != 0);
        Self { exponents }
    }

    pub fn is_none(&self) -> bool {
        self.exponents.is_empty()
    }

    /// Exponent of a base dimension (0 when absent)
    pub fn exponent(&self, base: BaseDimension) -> i32 {
        self.exponents.get(&base).copied().unwrap_or(0)
    }

    /// Iterate over the non-zero (base, exponent) entries
    pub fn exponents(&self) -> impl Iterator<Item = (BaseDimension, i32)> + '_ {
        self.exponents.iter().map(|(b, e)| (*b, *e))
    }

    /// Pointwise sum of exponents
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        let mut exponents = self.exponents.clone();
        for (base, exp) in &other.exponents {
            *exponents.entry(*base).or_insert(0) += exp;
        }
        exponents.retain(|_, e| *e != 0);
        Dimension { exponents }
    }

    /// Pointwise difference of exponents
    pub fn divide(&self, other: &Dimension) -> Dimension {
        let mut exponents = self.exponents.clone();
        for (base, exp) in &other.exponents {
            *exponents.entry(*base).or_insert(0) -= exp;
        }
        exponents.retain(|_, e| *e != 0);
        Dimension { exponents }
    }

    /// Scale every exponent by n
    pub fn pow(&self, n: i32) -> Dimension {
        if n == 0 {
            return Dimension::none();
        }
        let exponents = self.exponents.iter().map(|(b, e)| (*b, e * n)).collect();
        Dimension { exponents }
    }

    /// Divide every exponent by n. Fails when an exponent is not evenly
    /// divisible by n, or when n is zero.
    pub fn root(&self, n: i32) -> Result<Dimension, DimensionError> {
        if n == 0 {
            return Err(DimensionError::ZeroRoot);
        }
        let mut exponents = BTreeMap::new();
        for (base, exp) in &self.exponents {
            if exp % n != 0 {
                return Err(DimensionError::NonIntegralRoot {
                    base: *base,
                    exponent: *exp,
                    degree: n,
                });
            }
            exponents.insert(*base, exp / n);
        }
        Ok(Dimension { exponents })
    }

    /// Canonical symbol of this dimension's reference unit, composed from the
    /// base reference symbols, e.g. "m/s" for {L: 1, T: -1}.
    pub fn reference_symbol(&self) -> String {
        self.compose_symbol(|b| b.reference_symbol())
    }

    fn compose_symbol(&self, sym: impl Fn(BaseDimension) -> &'static str) -> String {
        if self.exponents.is_empty() {
            return "1".to_string();
        }

        let term = |base: &BaseDimension, exp: i32| {
            if exp == 1 {
                sym(*base).to_string()
            } else {
                format!("{}^{}", sym(*base), exp)
            }
        };

        let numerator: Vec<String> = self
            .exponents
            .iter()
            .filter(|(_, e)| **e > 0)
            .map(|(b, e)| term(b, *e))
            .collect();
        let denominator: Vec<String> = self
            .exponents
            .iter()
            .filter(|(_, e)| **e < 0)
            .map(|(b, e)| term(b, -*e))
            .collect();

        let num = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join("·")
        };

        match denominator.len() {
            0 => num,
            1 => format!("{}/{}", num, denominator[0]),
            _ => format!("{}/({})", num, denominator.join("·")),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compose_symbol(|b| b.symbol()))
    }
}
