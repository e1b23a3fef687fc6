pub mod config;
pub mod engine;
pub mod result;
pub mod scenario;
pub mod squad;
pub mod statistics;

pub use config::*;
pub use engine::*;
pub use result::*;
pub use scenario::*;
pub use squad::*;
pub use statistics::*;
