//! Building structure components: doors and walls.

use serde::{Deserialize, Serialize};

/// Apartment door on one floor. Opens when a moving actor crosses its
/// trigger zone from the approach side; the door coordinator owns the
/// open/close timing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Door {
    pub floor: i32,
    pub x: f32,
    /// Trigger zone width on either side of the door
    pub trigger_width: f32,
    pub open: bool,
}

impl Door {
    pub fn new(floor: i32, x: f32, trigger_width: f32) -> Self {
        Self {
            floor,
            x,
            trigger_width,
            open: false,
        }
    }
}

/// Invisible wall segment bounding a floor. Actors hitting it are pushed
/// back outside its box and hard-stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wall {
    pub floor: i32,
    pub x: f32,
    pub half_width: f32,
}

impl Wall {
    pub fn new(floor: i32, x: f32, half_width: f32) -> Self {
        Self {
            floor,
            x,
            half_width,
        }
    }
}
