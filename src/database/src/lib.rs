mod loaders;

pub use loaders::*;
