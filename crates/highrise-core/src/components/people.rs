//! Actor components: marker, elevator rider state, door transit flags.

use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as a simulated character
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Actor;

/// Elevator involvement for one actor. Present only while the actor has an
/// outstanding inter-floor request or is mid-ride; removed when the ride
/// (or the change of mind) completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rider {
    pub state: RiderState,
    /// X to resume walking toward once the actor steps out of the car
    pub deferred_x: Option<f32>,
}

impl Rider {
    pub fn walking_to_car(target_floor: i32, deferred_x: Option<f32>) -> Self {
        Self {
            state: RiderState::WalkingToCar { target_floor },
            deferred_x,
        }
    }

    /// The floor this actor wants the car to take it to
    pub fn target_floor(&self) -> i32 {
        match self.state {
            RiderState::WalkingToCar { target_floor }
            | RiderState::Waiting { target_floor }
            | RiderState::Riding { target_floor } => target_floor,
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, RiderState::Waiting { .. })
    }

    pub fn is_riding(&self) -> bool {
        matches!(self.state, RiderState::Riding { .. })
    }
}

/// One state per actor makes waiting-while-riding unrepresentable. The
/// hand-off points are the only transitions:
/// `WalkingToCar -> Waiting` when the request fires at the boarding x,
/// `Waiting -> Riding` when the actor finishes walking into the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiderState {
    /// Walking to the boarding position; the request is made on arrival
    WalkingToCar { target_floor: i32 },
    /// Request registered, standing at the landing
    Waiting { target_floor: i32 },
    /// Inside the car
    Riding { target_floor: i32 },
}

/// Present only while an actor is mid door choreography. Blocks the same
/// door (or any other) from re-triggering until the close deadline clears it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DoorTransit {
    /// Set on trigger; cleared early if the actor stops moving
    pub entered: bool,
    /// Set on trigger; required for the walk-resume deadline to fire
    pub walking_through: bool,
}

impl DoorTransit {
    pub fn begin() -> Self {
        Self {
            entered: true,
            walking_through: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rider_target_floor_across_states() {
        let rider = Rider::walking_to_car(3, Some(420.0));
        assert_eq!(rider.target_floor(), 3);
        assert!(!rider.is_waiting());

        let rider = Rider {
            state: RiderState::Waiting { target_floor: 3 },
            deferred_x: Some(420.0),
        };
        assert_eq!(rider.target_floor(), 3);
        assert!(rider.is_waiting());
        assert!(!rider.is_riding());
    }
}
