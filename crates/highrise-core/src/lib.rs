//! Highrise Core - Apartment Building Simulation Engine
//!
//! An ECS-based simulation of an apartment building where residents walk
//! their floors, pass through self-opening doors, and ride a single shared
//! elevator between floors.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Actors, doors, walls
//! - **Components**: Pure data attached to entities (Position, Motion, Rider, etc.)
//! - **Systems**: Logic that queries and updates components, plus the
//!   `ElevatorCoordinator` state machine that owns the car
//!
//! # Example
//!
//! ```rust,no_run
//! use highrise_core::prelude::*;
//! use highrise_core::generation::BuildingConfig;
//!
//! let mut engine = Engine::new(BuildingConfig::default());
//! let resident = engine.roster()[0];
//! engine.set_selected(Some(resident));
//!
//! // Send the resident to the lobby
//! engine.handle_click(0, 300.0);
//!
//! // Run simulation
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{FloorPlan, SimConfig};
    pub use crate::engine::Engine;
    pub use crate::systems::{DoorState, ElevatorCoordinator};
}
