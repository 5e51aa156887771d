//! The fixed table of named units: SI reference units plus the customary
//! units exercised throughout the crate. Reference units carry factor one;
//! everything else is derived from them.

use rust_decimal_macros::dec;

use super::unit::Unit;
use crate::types::{
    Acceleration, Area, BaseDimension, Dimension, Dimensionless, ElectricCurrent, Energy, Force,
    Length, Mass, Pressure, Temperature, Time, Unknown, Velocity, Volume,
};

fn dim(pairs: &[(BaseDimension, i32)]) -> Dimension {
    Dimension::from_exponents(pairs.iter().copied())
}

// ---- dimensionless ----

/// The dimensionless reference unit
pub fn one() -> Unit<Dimensionless> {
    Unit::reference(Dimension::none())
}

pub fn percent() -> Unit<Dimensionless> {
    one().scaled(dec!(0.01)).with_symbol("%")
}

// ---- length ----

pub fn meter() -> Unit<Length> {
    Unit::reference(Dimension::base(BaseDimension::Length))
}

pub fn kilometer() -> Unit<Length> {
    meter().scaled(dec!(1000)).with_symbol("km")
}

pub fn centimeter() -> Unit<Length> {
    meter().scaled(dec!(0.01)).with_symbol("cm")
}

pub fn millimeter() -> Unit<Length> {
    meter().scaled(dec!(0.001)).with_symbol("mm")
}

pub fn mile() -> Unit<Length> {
    meter().scaled(dec!(1609.344)).with_symbol("mi")
}

pub fn yard() -> Unit<Length> {
    meter().scaled(dec!(0.9144)).with_symbol("yd")
}

pub fn foot() -> Unit<Length> {
    meter().scaled(dec!(0.3048)).with_symbol("ft")
}

pub fn inch() -> Unit<Length> {
    meter().scaled(dec!(0.0254)).with_symbol("in")
}

// ---- mass ----

pub fn kilogram() -> Unit<Mass> {
    Unit::reference(Dimension::base(BaseDimension::Mass))
}

pub fn gram() -> Unit<Mass> {
    kilogram().scaled(dec!(0.001)).with_symbol("g")
}

pub fn tonne() -> Unit<Mass> {
    kilogram().scaled(dec!(1000)).with_symbol("t")
}

pub fn pound() -> Unit<Mass> {
    kilogram().scaled(dec!(0.45359237)).with_symbol("lb")
}

pub fn ounce() -> Unit<Mass> {
    kilogram().scaled(dec!(0.028349523125)).with_symbol("oz")
}

// ---- time ----

pub fn second() -> Unit<Time> {
    Unit::reference(Dimension::base(BaseDimension::Time))
}

pub fn millisecond() -> Unit<Time> {
    second().scaled(dec!(0.001)).with_symbol("ms")
}

pub fn minute() -> Unit<Time> {
    second().scaled(dec!(60)).with_symbol("min")
}

pub fn hour() -> Unit<Time> {
    second().scaled(dec!(3600)).with_symbol("h")
}

pub fn day() -> Unit<Time> {
    second().scaled(dec!(86400)).with_symbol("d")
}

// ---- electric current ----

pub fn ampere() -> Unit<ElectricCurrent> {
    Unit::reference(Dimension::base(BaseDimension::ElectricCurrent))
}

// ---- temperature ----

pub fn kelvin() -> Unit<Temperature> {
    Unit::reference(Dimension::base(BaseDimension::Temperature))
}

pub fn celsius() -> Unit<Temperature> {
    kelvin().shift(dec!(273.15)).with_symbol("°C")
}

/// Kelvin-sized degrees rescaled to Fahrenheit-sized ones
pub fn rankine() -> Unit<Temperature> {
    kelvin().scaled(dec!(5) / dec!(9)).with_symbol("°R")
}

pub fn fahrenheit() -> Unit<Temperature> {
    rankine().shift(dec!(459.67)).with_symbol("°F")
}

// ---- velocity ----

pub fn meter_per_second() -> Unit<Velocity> {
    Unit::reference(dim(&[(BaseDimension::Length, 1), (BaseDimension::Time, -1)]))
}

pub fn kilometer_per_hour() -> Unit<Velocity> {
    kilometer().divide(&hour()).retag().with_symbol("km/h")
}

pub fn mile_per_hour() -> Unit<Velocity> {
    mile().divide(&hour()).retag().with_symbol("mph")
}

pub fn knot() -> Unit<Velocity> {
    meter_per_second()
        .scaled(dec!(1852) / dec!(3600))
        .with_symbol("kn")
}

// ---- acceleration ----

pub fn meter_per_second_squared() -> Unit<Acceleration> {
    Unit::reference(dim(&[(BaseDimension::Length, 1), (BaseDimension::Time, -2)]))
}

pub fn standard_gravity() -> Unit<Acceleration> {
    meter_per_second_squared()
        .scaled(dec!(9.80665))
        .with_symbol("g0")
}

// ---- area ----

pub fn square_meter() -> Unit<Area> {
    Unit::reference(dim(&[(BaseDimension::Length, 2)]))
}

pub fn hectare() -> Unit<Area> {
    square_meter().scaled(dec!(10000)).with_symbol("ha")
}

pub fn square_foot() -> Unit<Area> {
    foot().multiply(&foot()).retag().with_symbol("ft^2")
}

// ---- volume ----

pub fn cubic_meter() -> Unit<Volume> {
    Unit::reference(dim(&[(BaseDimension::Length, 3)]))
}

pub fn liter() -> Unit<Volume> {
    cubic_meter().scaled(dec!(0.001)).with_symbol("L")
}

// ---- force ----

pub fn newton() -> Unit<Force> {
    Unit::reference(dim(&[
        (BaseDimension::Mass, 1),
        (BaseDimension::Length, 1),
        (BaseDimension::Time, -2),
    ]))
    .with_symbol("N")
}

pub fn pound_force() -> Unit<Force> {
    newton().scaled(dec!(4.4482216152605)).with_symbol("lbf")
}

// ---- pressure ----

pub fn pascal() -> Unit<Pressure> {
    Unit::reference(dim(&[
        (BaseDimension::Mass, 1),
        (BaseDimension::Length, -1),
        (BaseDimension::Time, -2),
    ]))
    .with_symbol("Pa")
}

pub fn kilopascal() -> Unit<Pressure> {
    pascal().scaled(dec!(1000)).with_symbol("kPa")
}

pub fn bar() -> Unit<Pressure> {
    pascal().scaled(dec!(100000)).with_symbol("bar")
}

pub fn psi() -> Unit<Pressure> {
    pound_force()
        .divide(&inch().multiply(&inch()))
        .retag()
        .with_symbol("psi")
}

// ---- energy ----

pub fn joule() -> Unit<Energy> {
    Unit::reference(dim(&[
        (BaseDimension::Mass, 1),
        (BaseDimension::Length, 2),
        (BaseDimension::Time, -2),
    ]))
    .with_symbol("J")
}

pub fn kilowatt_hour() -> Unit<Energy> {
    joule().scaled(dec!(3600000)).with_symbol("kWh")
}

/// Every named unit above, tag-erased. This is the symbol table the text
/// boundary resolves against.
pub fn common_units() -> Vec<Unit<Unknown>> {
    vec![
        one().erase(),
        percent().erase(),
        meter().erase(),
        kilometer().erase(),
        centimeter().erase(),
        millimeter().erase(),
        mile().erase(),
        yard().erase(),
        foot().erase(),
        inch().erase(),
        kilogram().erase(),
        gram().erase(),
        tonne().erase(),
        pound().erase(),
        ounce().erase(),
        second().erase(),
        millisecond().erase(),
        minute().erase(),
        hour().erase(),
        day().erase(),
        ampere().erase(),
        kelvin().erase(),
        celsius().erase(),
        rankine().erase(),
        fahrenheit().erase(),
        meter_per_second().erase(),
        kilometer_per_hour().erase(),
        mile_per_hour().erase(),
        knot().erase(),
        meter_per_second_squared().erase(),
        standard_gravity().erase(),
        square_meter().erase(),
        hectare().erase(),
        square_foot().erase(),
        cubic_meter().erase(),
        liter().erase(),
        newton().erase(),
        pound_force().erase(),
        pascal().erase(),
        kilopascal().erase(),
        bar().erase(),
        psi().erase(),
        joule().erase(),
        kilowatt_hour().erase(),
    ]
}
