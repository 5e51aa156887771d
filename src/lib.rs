pub mod measure;
pub mod registry;
pub mod text;
pub mod types;
pub mod units;

pub use measure::*;
pub use registry::*;
pub use text::{ParseError, SymbolTable, UnitFormat};
pub use types::*;
pub use units::*;
