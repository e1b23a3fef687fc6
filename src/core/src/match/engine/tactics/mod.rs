mod positions;

pub use positions::*;
