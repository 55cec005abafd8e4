//! Common components: position, motion, names.

use serde::{Deserialize, Serialize};

/// Spatial position: continuous x along the floor, integer floor index
/// (0 = lobby). Y is derived from the floor via `FloorPlan::floor_y`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub floor: i32,
}

impl Position {
    pub fn new(x: f32, floor: i32) -> Self {
        Self { x, floor }
    }
}

/// Per-frame motion state, read by the rendering collaborator to pick
/// walk/idle animation and facing. Recomputed every tick; never an input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Motion {
    /// Signed horizontal velocity, pixels per second
    pub vx: f32,
    pub facing_right: bool,
    pub walking: bool,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            vx: 0.0,
            facing_right: true,
            walking: false,
        }
    }
}

/// Seek target - present only while the actor has somewhere to go
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeekTarget {
    pub x: f32,
}

impl SeekTarget {
    pub fn new(x: f32) -> Self {
        Self { x }
    }
}

/// Walking speed in pixels per second
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Speed(pub f32);

/// Name component - display only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name {
    pub given: String,
    pub family: String,
}

impl Name {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }
}
