//! Components - pure data attached to entities

mod building;
mod common;
mod people;

pub use building::*;
pub use common::*;
pub use people::*;
