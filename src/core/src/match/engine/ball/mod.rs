mod ball;
mod events;
mod physics;
mod possession;

pub use ball::*;
pub use events::*;
pub use physics::*;
pub use possession::*;
