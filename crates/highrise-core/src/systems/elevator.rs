//! Elevator coordinator - dispatch, travel, and boarding/alighting choreography.
//!
//! One car serves the whole building. The car runs an explicit state machine
//! with sim-time deadlines; `tick` advances it once per frame. While `locked`
//! the car is executing an itinerary and new requests only mark the actor as
//! waiting - the car picks them up when it passes their floor heading the
//! same way, or promotes them once the current itinerary finishes.
//!
//! The initial approach toward the requester never stops for intermediate
//! pickups; those are only served on the en-route leg. Boarding is
//! sequential: one actor at a time walks to the boarding x, so the shared
//! position is never contested.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::components::{Motion, Position, Rider, RiderState, SeekTarget};
use crate::config::{FloorPlan, SimConfig, ARRIVE_EPSILON};

/// Per-floor landing door state, read by the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    Closed,
    Transitioning,
    Open,
}

/// The itinerary currently being serviced
#[derive(Debug, Clone, Copy)]
pub struct ActiveRequest {
    pub actor: Entity,
    pub target_floor: i32,
}

/// Which stop of the itinerary the car is making; pacing differs slightly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopKind {
    Pickup,
    EnRoute,
}

/// Car state machine. Every timed phase carries its wake deadline in
/// sim-time seconds.
#[derive(Debug, Clone)]
enum CarPhase {
    Idle,
    /// Slewing one floor at a time toward the requester; no stops
    Approach { pickup: i32, dir: i32, due: f64 },
    DoorsOpening { kind: StopKind, due: f64 },
    OpenDwell { kind: StopKind, due: f64 },
    /// En-route stops pause between alighting and boarding
    ExitPause {
        kind: StopKind,
        boarders: VecDeque<Entity>,
        due: f64,
    },
    /// One boarder at a time walks into the car
    Boarding {
        kind: StopKind,
        current: Entity,
        rest: VecDeque<Entity>,
    },
    CloseDelay { kind: StopKind, due: f64 },
    DoorsClosing { kind: StopKind, due: f64 },
    /// Waiting out the per-floor transit time before the next step
    Travel { due: f64 },
}

/// Owns all car state: current floor, per-floor landing doors, the lock
/// flag, the active request, and the boarded set (in boarding order).
pub struct ElevatorCoordinator {
    current_floor: i32,
    door_state: Vec<DoorState>,
    locked: bool,
    active: Option<ActiveRequest>,
    boarded: Vec<Entity>,
    phase: CarPhase,
    /// Sign of the active leg's direction; valid while an itinerary runs
    travel_dir: i32,
}

impl ElevatorCoordinator {
    pub fn new(floor_count: usize, start_floor: i32) -> Self {
        Self {
            current_floor: start_floor,
            door_state: vec![DoorState::Closed; floor_count],
            locked: false,
            active: None,
            boarded: Vec::new(),
            phase: CarPhase::Idle,
            travel_dir: 0,
        }
    }

    /// The car's current (or last-arrived) floor - the indicator floor
    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }

    /// True exactly while the car is executing a multi-step itinerary
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_idle(&self) -> bool {
        !self.locked && self.active.is_none()
    }

    pub fn active_request(&self) -> Option<&ActiveRequest> {
        self.active.as_ref()
    }

    /// Actors currently inside the car, in boarding order
    pub fn boarded(&self) -> &[Entity] {
        &self.boarded
    }

    pub fn is_boarded(&self, actor: Entity) -> bool {
        self.boarded.contains(&actor)
    }

    pub fn door_state(&self, floor: i32) -> DoorState {
        self.door_state
            .get(floor as usize)
            .copied()
            .unwrap_or(DoorState::Closed)
    }

    /// Register a transport request. The actor becomes a waiter; if the car
    /// is free the request is adopted and serviced immediately, otherwise
    /// the actor is picked up when the car visits its floor or once the car
    /// finishes. Refused outright: a request for the actor's own floor, or
    /// for an actor already aboard or already being fetched.
    pub fn request_elevator(
        &mut self,
        world: &mut World,
        roster: &[Entity],
        actor: Entity,
        target_floor: i32,
        now: f64,
        config: &SimConfig,
    ) -> bool {
        // An actor already aboard or already being fetched keeps its
        // existing itinerary
        if self.is_boarded(actor) || self.active.map(|r| r.actor) == Some(actor) {
            debug!("request ignored: actor {:?} already being served", actor);
            return false;
        }
        let Ok(floor) = world.get::<&Position>(actor).map(|p| p.floor) else {
            return false;
        };
        if target_floor == floor {
            debug!(
                "request refused: actor {:?} already on floor {}",
                actor, target_floor
            );
            return false;
        }

        // Preserve a deferred x carried over from the walk-to-car phase
        let deferred_x = world.get::<&Rider>(actor).ok().and_then(|r| r.deferred_x);
        let _ = world.insert_one(
            actor,
            Rider {
                state: RiderState::Waiting { target_floor },
                deferred_x,
            },
        );
        debug!(
            "elevator requested: actor {:?} floor {} -> {}",
            actor, floor, target_floor
        );

        if self.active.is_none() {
            self.active = Some(ActiveRequest {
                actor,
                target_floor,
            });
            self.process_queue(world, roster, now, config);
        }
        true
    }

    /// Start servicing the active request: board in place if the car is
    /// already at the requester's floor, otherwise travel there first.
    /// No-op while locked or with nothing to service.
    pub fn process_queue(
        &mut self,
        world: &mut World,
        roster: &[Entity],
        now: f64,
        config: &SimConfig,
    ) {
        if self.locked {
            return;
        }
        let Some(active) = self.active else {
            return;
        };
        let Ok(pickup) = world.get::<&Position>(active.actor).map(|p| p.floor) else {
            self.active = None;
            return;
        };

        self.locked = true;
        self.travel_dir = (active.target_floor - pickup).signum();

        if self.current_floor == pickup {
            self.evaluate_stop(world, roster, StopKind::Pickup, now, config);
        } else {
            let dir = (pickup - self.current_floor).signum();
            trace!("car slewing {} -> {}", self.current_floor, pickup);
            self.phase = CarPhase::Approach {
                pickup,
                dir,
                due: now + config.travel_secs,
            };
        }
    }

    /// Advance the car state machine. Call once per frame after movement.
    pub fn tick(
        &mut self,
        world: &mut World,
        roster: &[Entity],
        now: f64,
        plan: &FloorPlan,
        config: &SimConfig,
    ) {
        match self.phase.clone() {
            CarPhase::Idle => {}

            CarPhase::Approach { pickup, dir, due } => {
                if now < due {
                    return;
                }
                self.current_floor += dir;
                trace!("car passes floor {}", self.current_floor);
                if self.current_floor == pickup {
                    self.evaluate_stop(world, roster, StopKind::Pickup, now, config);
                } else {
                    self.phase = CarPhase::Approach {
                        pickup,
                        dir,
                        due: now + config.travel_secs,
                    };
                }
            }

            CarPhase::DoorsOpening { kind, due } => {
                if now < due {
                    return;
                }
                self.set_door(self.current_floor, DoorState::Open);
                let dwell = match kind {
                    StopKind::Pickup => config.pickup_dwell_secs,
                    StopKind::EnRoute => config.stop_dwell_secs,
                };
                self.phase = CarPhase::OpenDwell {
                    kind,
                    due: now + dwell,
                };
            }

            CarPhase::OpenDwell { kind, due } => {
                if now < due {
                    return;
                }
                self.release_exiters(world);
                let boarders: VecDeque<Entity> = self
                    .scan_boarders(world, roster, self.current_floor)
                    .into();
                match kind {
                    StopKind::Pickup => {
                        self.begin_boarding(world, boarders, kind, now, plan, config)
                    }
                    StopKind::EnRoute => {
                        self.phase = CarPhase::ExitPause {
                            kind,
                            boarders,
                            due: now + config.exit_pause_secs,
                        };
                    }
                }
            }

            CarPhase::ExitPause {
                kind,
                boarders,
                due,
            } => {
                if now < due {
                    return;
                }
                self.begin_boarding(world, boarders, kind, now, plan, config);
            }

            CarPhase::Boarding {
                kind,
                current,
                rest,
            } => {
                // A boarder that changed its mind mid-walk is skipped
                let still_waiting = world
                    .get::<&Rider>(current)
                    .map(|r| r.is_waiting())
                    .unwrap_or(false);
                if !still_waiting {
                    self.begin_boarding(world, rest, kind, now, plan, config);
                    return;
                }

                let arrived = world
                    .get::<&Position>(current)
                    .map(|p| (p.x - plan.elevator_x).abs() < ARRIVE_EPSILON)
                    .unwrap_or(false);
                if arrived {
                    self.board(world, current, plan);
                    self.begin_boarding(world, rest, kind, now, plan, config);
                } else {
                    // Walls or door pauses may have cleared the seek; keep
                    // the boarder heading for the car
                    let seeking = world.get::<&SeekTarget>(current).is_ok();
                    let in_door = world
                        .get::<&crate::components::DoorTransit>(current)
                        .is_ok();
                    if !seeking && !in_door {
                        let _ = world.insert_one(current, SeekTarget::new(plan.elevator_x));
                    }
                }
            }

            CarPhase::CloseDelay { kind, due } => {
                if now < due {
                    return;
                }
                self.set_door(self.current_floor, DoorState::Transitioning);
                self.phase = CarPhase::DoorsClosing {
                    kind,
                    due: now + config.door_transition_secs,
                };
            }

            CarPhase::DoorsClosing { kind, due } => {
                if now < due {
                    return;
                }
                self.set_door(self.current_floor, DoorState::Closed);
                let pause = match kind {
                    StopKind::Pickup => config.travel_secs,
                    StopKind::EnRoute => config.travel_secs / 2.0,
                };
                self.phase = CarPhase::Travel { due: now + pause };
            }

            CarPhase::Travel { due } => {
                if now < due {
                    return;
                }
                self.travel_step(world, roster, now, plan, config);
            }
        }
    }

    /// One en-route step: advance a floor, carry the riders along, and stop
    /// only where someone gets on or off. Arriving with the itinerary
    /// exhausted hands the car to the next claimant.
    fn travel_step(
        &mut self,
        world: &mut World,
        roster: &[Entity],
        now: f64,
        plan: &FloorPlan,
        config: &SimConfig,
    ) {
        let Some(active) = self.active else {
            self.finish_itinerary(world, roster, now, config);
            return;
        };

        if self.current_floor == active.target_floor {
            self.finish_itinerary(world, roster, now, config);
            return;
        }

        self.current_floor += self.travel_dir;
        let floor = self.current_floor;
        trace!("car at floor {}", floor);

        // Riders track the car
        for &rider in &self.boarded {
            if let Ok(mut pos) = world.get::<&mut Position>(rider) {
                pos.floor = floor;
                pos.x = plan.elevator_x;
            }
        }

        self.evaluate_stop(world, roster, StopKind::EnRoute, now, config);
    }

    /// Decide whether the current floor warrants a door cycle. If nobody
    /// gets on or off, the car moves straight on - no wasted cycle.
    fn evaluate_stop(
        &mut self,
        world: &mut World,
        roster: &[Entity],
        kind: StopKind,
        now: f64,
        config: &SimConfig,
    ) {
        let floor = self.current_floor;
        let has_exiters = self
            .boarded
            .iter()
            .any(|&e| rider_target(world, e) == Some(floor));
        let has_boarders = !self.scan_boarders(world, roster, floor).is_empty();

        if has_exiters || has_boarders {
            debug!(
                "car stops at floor {} (exiters: {}, boarders: {})",
                floor, has_exiters, has_boarders
            );
            self.set_door(floor, DoorState::Transitioning);
            self.phase = CarPhase::DoorsOpening {
                kind,
                due: now + config.door_transition_secs,
            };
        } else {
            self.phase = CarPhase::Travel {
                due: now + config.travel_secs,
            };
        }
    }

    /// Everyone bound for this floor steps out: repositioned onto the
    /// landing, rider state dropped, deferred walk target restored.
    fn release_exiters(&mut self, world: &mut World) {
        let floor = self.current_floor;
        let exiting: Vec<Entity> = self
            .boarded
            .iter()
            .copied()
            .filter(|&e| rider_target(world, e) == Some(floor))
            .collect();
        if exiting.is_empty() {
            return;
        }

        self.boarded.retain(|e| !exiting.contains(e));
        for actor in exiting {
            if let Ok(mut pos) = world.get::<&mut Position>(actor) {
                pos.floor = floor;
            }
            let deferred_x = world.get::<&Rider>(actor).ok().and_then(|r| r.deferred_x);
            let _ = world.remove_one::<Rider>(actor);
            if let Some(x) = deferred_x {
                let _ = world.insert_one(actor, SeekTarget::new(x));
            }
            debug!("actor {:?} steps out at floor {}", actor, floor);
        }
    }

    /// Walk the next boarder in, or close up if the queue is done
    fn begin_boarding(
        &mut self,
        world: &mut World,
        mut boarders: VecDeque<Entity>,
        kind: StopKind,
        now: f64,
        plan: &FloorPlan,
        config: &SimConfig,
    ) {
        if let Some(first) = boarders.pop_front() {
            let _ = world.insert_one(first, SeekTarget::new(plan.elevator_x));
            self.phase = CarPhase::Boarding {
                kind,
                current: first,
                rest: boarders,
            };
        } else {
            let close = match kind {
                StopKind::Pickup => config.pickup_close_secs,
                StopKind::EnRoute => config.stop_close_secs,
            };
            self.phase = CarPhase::CloseDelay {
                kind,
                due: now + close,
            };
        }
    }

    fn board(&mut self, world: &mut World, actor: Entity, plan: &FloorPlan) {
        if let Ok(mut pos) = world.get::<&mut Position>(actor) {
            pos.x = plan.elevator_x;
        }
        if let Ok(mut motion) = world.get::<&mut Motion>(actor) {
            motion.vx = 0.0;
            motion.walking = false;
        }
        let _ = world.remove_one::<SeekTarget>(actor);
        if let Ok(mut rider) = world.get::<&mut Rider>(actor) {
            rider.state = RiderState::Riding {
                target_floor: rider.target_floor(),
            };
        }
        self.boarded.push(actor);
        debug!(
            "actor {:?} boards at floor {} ({} aboard)",
            actor,
            self.current_floor,
            self.boarded.len()
        );
    }

    /// Itinerary complete: unlock, then keep the car moving for a remaining
    /// passenger, promote the next waiter, or settle idle.
    fn finish_itinerary(
        &mut self,
        world: &mut World,
        roster: &[Entity],
        now: f64,
        config: &SimConfig,
    ) {
        self.locked = false;
        self.active = None;
        self.travel_dir = 0;

        // A passenger still aboard keeps the car moving without idling
        let passenger = self
            .boarded
            .iter()
            .copied()
            .find_map(|e| rider_target(world, e).map(|t| (e, t)));
        if let Some((actor, target_floor)) = passenger {
            debug!(
                "continuing for passenger {:?} -> floor {}",
                actor, target_floor
            );
            self.active = Some(ActiveRequest {
                actor,
                target_floor,
            });
            self.process_queue(world, roster, now, config);
            return;
        }

        // Otherwise anyone still waiting, in roster order
        let waiter = roster.iter().copied().find_map(|e| {
            world
                .get::<&Rider>(e)
                .ok()
                .filter(|r| r.is_waiting())
                .map(|r| (e, r.target_floor()))
        });
        if let Some((actor, target_floor)) = waiter {
            debug!("promoting waiter {:?} -> floor {}", actor, target_floor);
            self.active = Some(ActiveRequest {
                actor,
                target_floor,
            });
            self.process_queue(world, roster, now, config);
            return;
        }

        debug!("car idle at floor {}", self.current_floor);
        self.set_door(self.current_floor, DoorState::Closed);
        self.phase = CarPhase::Idle;
    }

    /// Waiters on this floor heading the same way as the car, first
    /// registered first served
    fn scan_boarders(&self, world: &World, roster: &[Entity], floor: i32) -> Vec<Entity> {
        let dir = self.travel_dir;
        roster
            .iter()
            .copied()
            .filter(|&e| {
                let on_floor = world
                    .get::<&Position>(e)
                    .map(|p| p.floor == floor)
                    .unwrap_or(false);
                if !on_floor {
                    return false;
                }
                world
                    .get::<&Rider>(e)
                    .map(|r| r.is_waiting() && (r.target_floor() - floor).signum() == dir)
                    .unwrap_or(false)
            })
            .collect()
    }

    fn set_door(&mut self, floor: i32, state: DoorState) {
        if let Some(slot) = self.door_state.get_mut(floor as usize) {
            if *slot != state {
                trace!("landing door floor {}: {:?}", floor, state);
                *slot = state;
            }
        }
    }
}

fn rider_target(world: &World, actor: Entity) -> Option<i32> {
    world.get::<&Rider>(actor).ok().map(|r| r.target_floor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Actor, Speed};
    use crate::systems::movement_system;

    fn spawn_actor(world: &mut World, x: f32, floor: i32) -> Entity {
        world.spawn((
            Actor,
            Position::new(x, floor),
            Motion::default(),
            Speed(100.0),
        ))
    }

    fn run(
        car: &mut ElevatorCoordinator,
        world: &mut World,
        roster: &[Entity],
        now: &mut f64,
        secs: f64,
        plan: &FloorPlan,
        config: &SimConfig,
    ) {
        let dt = 1.0 / 60.0;
        let end = *now + secs;
        while *now < end {
            *now += dt as f64;
            movement_system(world, dt);
            car.tick(world, roster, *now, plan, config);
        }
    }

    #[test]
    fn test_request_marks_waiting_and_locks() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let actor = spawn_actor(&mut world, plan.elevator_x, 2);
        let roster = vec![actor];

        assert!(car.request_elevator(&mut world, &roster, actor, 0, 0.0, &config));
        assert!(car.is_locked());
        assert!(car.active_request().is_some());
        assert!(world.get::<&Rider>(actor).unwrap().is_waiting());
    }

    #[test]
    fn test_same_floor_request_refused() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let actor = spawn_actor(&mut world, plan.elevator_x, 1);
        let roster = vec![actor];

        assert!(!car.request_elevator(&mut world, &roster, actor, 1, 0.0, &config));
        assert!(car.is_idle());
        assert!(world.get::<&Rider>(actor).is_err());
    }

    #[test]
    fn test_second_request_only_enqueues() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let first = spawn_actor(&mut world, plan.elevator_x, 2);
        let second = spawn_actor(&mut world, plan.elevator_x, 1);
        let roster = vec![first, second];

        car.request_elevator(&mut world, &roster, first, 0, 0.0, &config);
        let active = car.active_request().unwrap().actor;
        car.request_elevator(&mut world, &roster, second, 3, 0.0, &config);

        // The car stays on the first itinerary; the second actor waits
        assert_eq!(car.active_request().unwrap().actor, active);
        assert!(world.get::<&Rider>(second).unwrap().is_waiting());
    }

    #[test]
    fn test_process_queue_noop_while_locked() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let actor = spawn_actor(&mut world, plan.elevator_x, 3);
        let roster = vec![actor];

        car.request_elevator(&mut world, &roster, actor, 0, 0.0, &config);
        let floor_before = car.current_floor();
        car.process_queue(&mut world, &roster, 0.0, &config);
        car.process_queue(&mut world, &roster, 0.0, &config);
        assert_eq!(car.current_floor(), floor_before);
        assert!(car.is_locked());
    }

    #[test]
    fn test_single_rider_roundtrip() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let actor = spawn_actor(&mut world, plan.elevator_x, 0);
        let roster = vec![actor];
        let mut now = 0.0;

        car.request_elevator(&mut world, &roster, actor, 2, now, &config);
        run(
            &mut car, &mut world, &roster, &mut now, 30.0, &plan, &config,
        );

        assert!(car.is_idle());
        assert!(car.boarded().is_empty());
        assert_eq!(world.get::<&Position>(actor).unwrap().floor, 2);
        assert!(world.get::<&Rider>(actor).is_err());
        assert_eq!(car.current_floor(), 2);
    }

    #[test]
    fn test_direction_filter_skips_opposite_waiter() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let up = spawn_actor(&mut world, plan.elevator_x, 0);
        let down = spawn_actor(&mut world, plan.elevator_x, 1);
        let roster = vec![up, down];
        let mut now = 0.0;

        // First rider goes 0 -> 3; the second waits on floor 1 to go down
        car.request_elevator(&mut world, &roster, up, 3, now, &config);
        car.request_elevator(&mut world, &roster, down, 0, now, &config);

        // Give the car time to pass floor 1 but not finish the itinerary
        run(&mut car, &mut world, &roster, &mut now, 6.0, &plan, &config);

        // The downward-bound waiter is never aboard an upward car
        assert!(!car.is_boarded(down));
        assert!(world.get::<&Rider>(down).unwrap().is_waiting());

        // After the full trip the waiter is promoted and delivered
        run(
            &mut car, &mut world, &roster, &mut now, 40.0, &plan, &config,
        );
        assert_eq!(world.get::<&Position>(down).unwrap().floor, 0);
        assert!(car.is_idle());
    }

    #[test]
    fn test_no_door_cycle_at_empty_floor() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let actor = spawn_actor(&mut world, plan.elevator_x, 0);
        let roster = vec![actor];
        let mut now = 0.0;

        car.request_elevator(&mut world, &roster, actor, 3, now, &config);

        // Floors 1 and 2 have nobody waiting: their landing doors must
        // never leave Closed for the whole trip
        let dt = 1.0 / 60.0;
        for _ in 0..(40.0 / dt) as usize {
            now += dt as f64;
            movement_system(&mut world, dt);
            car.tick(&mut world, &roster, now, &plan, &config);
            assert_eq!(car.door_state(1), DoorState::Closed);
            assert_eq!(car.door_state(2), DoorState::Closed);
        }
        assert_eq!(world.get::<&Position>(actor).unwrap().floor, 3);
    }

    #[test]
    fn test_request_for_boarded_actor_refused() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let actor = spawn_actor(&mut world, plan.elevator_x, 0);
        let roster = vec![actor];
        let mut now = 0.0;

        car.request_elevator(&mut world, &roster, actor, 3, now, &config);
        let dt = 1.0 / 60.0;
        while !car.is_boarded(actor) {
            now += dt as f64;
            movement_system(&mut world, dt);
            car.tick(&mut world, &roster, now, &plan, &config);
            assert!(now < 30.0, "actor never boarded");
        }

        // A second request mid-ride keeps the rider exactly where it is
        assert!(!car.request_elevator(&mut world, &roster, actor, 1, now, &config));
        assert!(world.get::<&Rider>(actor).unwrap().is_riding());
        assert_eq!(car.boarded(), &[actor]);
        assert_eq!(car.active_request().unwrap().target_floor, 3);

        run(
            &mut car, &mut world, &roster, &mut now, 30.0, &plan, &config,
        );
        assert_eq!(world.get::<&Position>(actor).unwrap().floor, 3);
        assert!(car.is_idle());
    }

    #[test]
    fn test_repeat_request_from_active_requester_refused() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let actor = spawn_actor(&mut world, plan.elevator_x, 2);
        let roster = vec![actor];

        assert!(car.request_elevator(&mut world, &roster, actor, 0, 0.0, &config));
        assert!(!car.request_elevator(&mut world, &roster, actor, 3, 0.0, &config));
        // The original itinerary stands
        assert_eq!(car.active_request().unwrap().target_floor, 0);
        assert_eq!(world.get::<&Rider>(actor).unwrap().target_floor(), 0);
    }

    #[test]
    fn test_two_waiters_board_one_at_a_time_in_roster_order() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 0);
        let first = spawn_actor(&mut world, 400.0, 1);
        let second = spawn_actor(&mut world, 460.0, 1);
        let roster = vec![first, second];
        let mut now = 0.0;

        car.request_elevator(&mut world, &roster, first, 3, now, &config);
        car.request_elevator(&mut world, &roster, second, 3, now, &config);

        let dt = 1.0 / 60.0;
        for _ in 0..(40.0 / dt) as usize {
            now += dt as f64;
            movement_system(&mut world, dt);
            car.tick(&mut world, &roster, now, &plan, &config);
            // The second waiter stands still until the first is inside
            if !car.is_boarded(first) {
                assert!(world.get::<&SeekTarget>(second).is_err());
            }
            if car.boarded().len() == 2 {
                assert_eq!(car.boarded(), &[first, second]);
            }
        }

        assert_eq!(world.get::<&Position>(first).unwrap().floor, 3);
        assert_eq!(world.get::<&Position>(second).unwrap().floor, 3);
        assert!(car.is_idle());
        assert!(car.boarded().is_empty());
    }

    #[test]
    fn test_boarded_empty_when_unlocked_and_idle() {
        let mut world = World::new();
        let plan = FloorPlan::default();
        let config = SimConfig::default();
        let mut car = ElevatorCoordinator::new(plan.floor_count, 2);
        let actor = spawn_actor(&mut world, plan.elevator_x, 2);
        let roster = vec![actor];
        let mut now = 0.0;

        car.request_elevator(&mut world, &roster, actor, 0, now, &config);
        let dt = 1.0 / 60.0;
        for _ in 0..(30.0 / dt) as usize {
            now += dt as f64;
            movement_system(&mut world, dt);
            car.tick(&mut world, &roster, now, &plan, &config);
            if car.is_idle() {
                assert!(car.boarded().is_empty());
            }
        }
        assert!(car.is_idle());
    }
}
