pub mod balance;
pub mod ball;
pub mod context;
pub mod engine;
pub mod events;
pub mod executor;
pub mod field;
pub mod physics;
pub mod player;
pub mod rng;
pub mod state;
pub mod tactics;


pub use balance::*;
pub use ball::*;
pub use context::*;
pub use engine::*;
pub use events::*;
pub use executor::*;
pub use field::*;
pub use physics::*;
pub use player::*;
pub use rng::*;
pub use state::*;
pub use tactics::*;
