mod attributes;
mod generator;
mod squad;

pub use attributes::*;
pub use generator::*;
pub use squad::*;
