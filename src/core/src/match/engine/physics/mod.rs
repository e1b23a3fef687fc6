pub mod constants;
mod kinematics;

pub use kinematics::*;
