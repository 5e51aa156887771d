mod dimension;
mod quantity;

pub use dimension::{BaseDimension, Dimension, DimensionError};
pub use quantity::{
    Acceleration, Area, Dimensionless, ElectricCurrent, Energy, Force, Length, Mass, Pressure,
    Quantity, Temperature, Time, Unknown, Velocity, Volume,
};
