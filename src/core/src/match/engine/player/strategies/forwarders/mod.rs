mod positioning;

pub use positioning::*;
