pub mod actions;
pub mod behaviours;
pub mod context;
pub mod decision;
pub mod physics;
pub mod player;
pub mod state;
pub mod strategies;

pub use actions::*;
pub use behaviours::*;
pub use context::*;
pub use decision::*;
pub use physics::*;
pub use player::*;
pub use state::*;
pub use strategies::*;
