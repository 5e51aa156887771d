/// Marker trait for quantity tag types (Length, Mass, …).
///
/// A tag carries no runtime state; it only parameterizes `Unit` and
/// `Measurement` so that quantities of different kinds cannot be mixed
/// without an explicit, dimension-checked cast.
pub trait Quantity: 'static {
    const NAME: &'static str;
}

macro_rules! quantity_tags {
    ($($tag:ident => $name:literal),+ $(,)?) => {
        $(
            #[derive(Debug)]
            pub enum $tag {}

            impl Quantity for $tag {
                const NAME: &'static str = $name;
            }
        )+
    };
}

quantity_tags! {
    Dimensionless => "dimensionless",
    Length => "length",
    Mass => "mass",
    Time => "time",
    ElectricCurrent => "electric current",
    Temperature => "temperature",
    Velocity => "velocity",
    Acceleration => "acceleration",
    Area => "area",
    Volume => "volume",
    Force => "force",
    Pressure => "pressure",
    Energy => "energy",
}

/// Tag for units and measurements whose quantity kind is not statically
/// known, e.g. the result of multiplying two arbitrary measurements.
/// Recoverable through the checked `as_type` cast.
#[derive(Debug)]
pub enum Unknown {}

impl Quantity for Unknown {
    const NAME: &'static str = "unknown";
}
