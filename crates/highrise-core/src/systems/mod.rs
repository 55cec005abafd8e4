//! Systems - logic that operates on components

mod doors;
mod elevator;
mod movement;
mod wandering;

pub use doors::*;
pub use elevator::*;
pub use movement::*;
pub use wandering::*;
