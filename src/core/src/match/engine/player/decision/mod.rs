mod agent;
mod error;

pub use agent::*;
pub use error::*;
