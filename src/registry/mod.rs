//! Process-wide quantity registry: one canonical system unit per quantity
//! kind, globally consistent (the Length reference is always the metre).
//!
//! The table is built once behind a `LazyLock` on first access and is
//! read-only afterwards, so concurrent readers need no locking.

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::LazyLock;

use crate::measure::{MeasureValue, Measurement};
use crate::types::{
    Acceleration, Area, Dimension, Dimensionless, ElectricCurrent, Energy, Force, Length, Mass,
    Pressure, Quantity, Temperature, Time, Unknown, Velocity, Volume,
};
use crate::units::{Unit, UnitError, systems};

struct Entry {
    dimension: Dimension,
    metric_unit: Unit<Unknown>,
}

static REGISTRY: LazyLock<HashMap<TypeId, Entry>> = LazyLock::new(|| {
    let mut table = HashMap::new();

    fn register<Q: Quantity>(table: &mut HashMap<TypeId, Entry>, unit: Unit<Q>) {
        table.insert(
            TypeId::of::<Q>(),
            Entry {
                dimension: unit.dimension().clone(),
                metric_unit: unit.erase(),
            },
        );
    }

    register(&mut table, systems::one());
    register(&mut table, systems::meter());
    register(&mut table, systems::kilogram());
    register(&mut table, systems::second());
    register(&mut table, systems::ampere());
    register(&mut table, systems::kelvin());
    register(&mut table, systems::meter_per_second());
    register(&mut table, systems::meter_per_second_squared());
    register(&mut table, systems::square_meter());
    register(&mut table, systems::cubic_meter());
    register(&mut table, systems::newton());
    register(&mut table, systems::pascal());
    register(&mut table, systems::joule());

    table
});

/// Canonical dimension registered for a quantity kind
pub fn dimension_of<Q: Quantity>() -> Result<&'static Dimension, UnitError> {
    REGISTRY
        .get(&TypeId::of::<Q>())
        .map(|e| &e.dimension)
        .ok_or(UnitError::UnregisteredQuantity(Q::NAME))
}

/// Factory handle for one quantity kind: hands out the canonical metric
/// unit and constructs dimension-validated measurements.
pub struct QuantityFactory<Q: Quantity>(PhantomData<Q>);

impl<Q: Quantity> QuantityFactory<Q> {
    pub fn instance() -> Self {
        Self(PhantomData)
    }

    /// The canonical system unit for Q
    pub fn metric_unit(&self) -> Result<Unit<Q>, UnitError> {
        REGISTRY
            .get(&TypeId::of::<Q>())
            .map(|e| e.metric_unit.retag())
            .ok_or(UnitError::UnregisteredQuantity(Q::NAME))
    }

    /// A measurement typed to Q, after validating that the unit's dimension
    /// matches the registered canonical dimension
    pub fn create(
        &self,
        value: impl Into<MeasureValue>,
        unit: Unit<Q>,
    ) -> Result<Measurement<Q>, UnitError> {
        let expected = dimension_of::<Q>()?;
        if unit.dimension() != expected {
            return Err(UnitError::TypeMismatch {
                unit: unit.symbol().to_string(),
                quantity: Q::NAME,
            });
        }
        Ok(Measurement::of(value, unit))
    }
}

// quantity kinds with a registered canonical unit
pub type DimensionlessFactory = QuantityFactory<Dimensionless>;
pub type LengthFactory = QuantityFactory<Length>;
pub type MassFactory = QuantityFactory<Mass>;
pub type TimeFactory = QuantityFactory<Time>;
pub type CurrentFactory = QuantityFactory<ElectricCurrent>;
pub type TemperatureFactory = QuantityFactory<Temperature>;
pub type VelocityFactory = QuantityFactory<Velocity>;
pub type AccelerationFactory = QuantityFactory<Acceleration>;
pub type AreaFactory = QuantityFactory<Area>;
pub type VolumeFactory = QuantityFactory<Volume>;
pub type ForceFactory = QuantityFactory<Force>;
pub type PressureFactory = QuantityFactory<Pressure>;
pub type EnergyFactory = QuantityFactory<Energy>;
