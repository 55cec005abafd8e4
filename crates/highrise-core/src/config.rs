//! Simulation constants and tunable timing configuration.
//!
//! All delays here are choreography pacing, not failure timeouts. They are
//! expressed in sim-time seconds and advanced only by `Engine::update`, so
//! every run is deterministic.

use serde::{Deserialize, Serialize};

/// Distance at which a seeking actor snaps onto its target (pixels)
pub const ARRIVE_EPSILON: f32 = 2.0;

/// Velocity magnitude below which an actor counts as standing still
pub const STANDSTILL_EPSILON: f32 = 0.1;

/// Tunable speeds and delays for movement, doors, and the elevator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Actor walking speed, pixels per second
    pub walk_speed: f32,
    /// Half-width of an actor's body for wall collision
    pub body_half_width: f32,
    /// Elevator transit time per floor, seconds
    pub travel_secs: f64,
    /// Elevator landing door open/close transition time
    pub door_transition_secs: f64,
    /// Dwell after the landing doors open at the pickup stop
    pub pickup_dwell_secs: f64,
    /// Dwell after the landing doors open at en-route stops
    pub stop_dwell_secs: f64,
    /// Pause between alighting and boarding at en-route stops
    pub exit_pause_secs: f64,
    /// Delay before the doors close once boarding finishes (pickup stop)
    pub pickup_close_secs: f64,
    /// Delay before the doors close at en-route stops
    pub stop_close_secs: f64,
    /// How close an actor must be to the boarding x before its request fires
    pub boarding_tolerance: f32,
    /// Apartment door trigger zone width
    pub door_trigger_width: f32,
    /// Delay before a door-crossing actor resumes walking
    pub door_resume_secs: f64,
    /// Delay before an opened apartment door closes again; must exceed the
    /// resume delay so the actor is seen walking through an open door
    pub door_close_secs: f64,
    /// Chance per wander pass that an idle actor strolls somewhere
    pub wander_chance: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            walk_speed: 100.0,
            body_half_width: 32.0,
            travel_secs: 1.5,
            door_transition_secs: 0.15,
            pickup_dwell_secs: 0.4,
            stop_dwell_secs: 0.1,
            exit_pause_secs: 0.3,
            pickup_close_secs: 0.5,
            stop_close_secs: 0.4,
            boarding_tolerance: 40.0,
            door_trigger_width: 20.0,
            door_resume_secs: 0.2,
            door_close_secs: 1.0,
            wander_chance: 0.02,
        }
    }
}

/// Fixed vertical layout of the building: where each floor's walk line sits,
/// the walkable x span, and the elevator's boarding position.
///
/// The driver supplies these as configuration; the core never computes y
/// from rendering state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlan {
    /// Number of floors, indexed from 0 (lobby)
    pub floor_count: usize,
    /// Y coordinate of the lobby walk line
    pub ground_y: f32,
    /// Vertical distance between walk lines
    pub floor_height: f32,
    /// Leftmost walkable x (left wall line on upper floors)
    pub walk_min_x: f32,
    /// Rightmost walkable x
    pub walk_max_x: f32,
    /// Fixed x of the elevator shaft and boarding position
    pub elevator_x: f32,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self {
            floor_count: 4,
            ground_y: 552.0,
            floor_height: 96.0,
            walk_min_x: 176.0,
            walk_max_x: 624.0,
            elevator_x: 250.0,
        }
    }
}

impl FloorPlan {
    /// Y coordinate of a floor's walk line
    pub fn floor_y(&self, floor: i32) -> f32 {
        self.ground_y - self.floor_height * floor as f32
    }

    pub fn contains_floor(&self, floor: i32) -> bool {
        floor >= 0 && (floor as usize) < self.floor_count
    }

    /// Which floor a world-space y falls on, if any (click hit testing)
    pub fn floor_at_y(&self, y: f32) -> Option<i32> {
        for floor in 0..self.floor_count as i32 {
            let line = self.floor_y(floor);
            if (y - line).abs() <= self.floor_height / 2.0 {
                return Some(floor);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_y_descends_going_up() {
        let plan = FloorPlan::default();
        assert!(plan.floor_y(1) < plan.floor_y(0));
        assert_eq!(plan.floor_y(0) - plan.floor_y(2), plan.floor_height * 2.0);
    }

    #[test]
    fn test_floor_at_y_roundtrip() {
        let plan = FloorPlan::default();
        for floor in 0..plan.floor_count as i32 {
            assert_eq!(plan.floor_at_y(plan.floor_y(floor)), Some(floor));
        }
        // Far above the roof
        assert_eq!(plan.floor_at_y(plan.floor_y(3) - plan.floor_height * 2.0), None);
    }

    #[test]
    fn test_contains_floor_bounds() {
        let plan = FloorPlan::default();
        assert!(plan.contains_floor(0));
        assert!(plan.contains_floor(3));
        assert!(!plan.contains_floor(4));
        assert!(!plan.contains_floor(-1));
    }

    #[test]
    fn test_default_delays_ordered() {
        let config = SimConfig::default();
        // The door must stay open longer than the walk-resume delay
        assert!(config.door_close_secs > config.door_resume_secs);
    }
}
