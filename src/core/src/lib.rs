pub mod error;
pub mod r#match;
pub mod utils;

pub use error::*;
pub use r#match::*;
pub use utils::*;

pub use nalgebra::Vector3;
