mod manager;
mod state;

pub use manager::*;
pub use state::*;
