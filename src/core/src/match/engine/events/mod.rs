mod detector;
mod models;

pub use detector::*;
pub use models::*;
