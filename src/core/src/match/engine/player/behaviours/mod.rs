mod steering;

pub use steering::*;
