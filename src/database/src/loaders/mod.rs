mod error;
mod scenario;
mod squad;

pub use error::*;
pub use scenario::*;
pub use squad::*;
