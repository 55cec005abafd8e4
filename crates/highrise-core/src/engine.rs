//! Simulation engine - owns the world, the clock, and the coordinators.
//!
//! One `update` per frame, fixed pass order: movement first, then wall
//! collision, then doors, then the elevator hand-off checks, then the car
//! itself. All timers run on the sim clock, so a run is a pure function of
//! the command sequence and the elapsed dt values.

use hecs::{Entity, World};

use crate::components::{DoorTransit, Position, Rider, RiderState, SeekTarget};
use crate::config::{FloorPlan, SimConfig};
use crate::generation::{generate_building, BuildingConfig, BuildingLayout, ManifestError};
use crate::systems::{
    door_system, movement_system, wall_collision_system, wandering_system, DoorQueue,
    ElevatorCoordinator,
};

/// Main simulation engine
pub struct Engine {
    /// ECS world containing all entities
    pub world: World,
    /// Elevator car state and dispatch
    pub elevator: ElevatorCoordinator,
    sim_time: f64,
    plan: FloorPlan,
    sim: SimConfig,
    layout: BuildingLayout,
    doors: DoorQueue,
    selected: Option<Entity>,
    last_wander: f64,
    time_scale: f32,
}

impl Engine {
    /// Build a world from a building config
    pub fn new(config: BuildingConfig) -> Self {
        let mut world = World::new();
        let layout = generate_building(&mut world, &config);
        let elevator = ElevatorCoordinator::new(config.plan.floor_count, 0);
        Self {
            world,
            elevator,
            sim_time: 0.0,
            plan: config.plan,
            sim: config.sim,
            layout,
            doors: DoorQueue::new(),
            selected: None,
            last_wander: 0.0,
            time_scale: 1.0,
        }
    }

    /// Build a world from the building manifest JSON
    pub fn from_manifest(json: &str) -> Result<Self, ManifestError> {
        Ok(Self::new(BuildingConfig::from_json(json)?))
    }

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = dt * self.time_scale;
        self.sim_time += dt as f64;

        movement_system(&mut self.world, dt);
        wall_collision_system(&mut self.world, self.sim.body_half_width);
        door_system(&mut self.world, &mut self.doors, self.sim_time, &self.sim);
        self.update_walkers();
        self.elevator.tick(
            &mut self.world,
            &self.layout.roster,
            self.sim_time,
            &self.plan,
            &self.sim,
        );

        // Idle strolls, throttled to ~10 Hz
        if self.sim_time - self.last_wander >= 0.1 {
            wandering_system(&mut self.world, &self.plan, &self.sim, self.selected);
            self.last_wander = self.sim_time;
        }
    }

    /// Route a click for the selected actor: same floor walks there
    /// directly, another floor starts the walk-to-car hand-off. Clicks for
    /// a boarded or riding actor are ignored; a new click drops any
    /// pending walk or wait (a change of mind, not an error).
    pub fn handle_click(&mut self, floor: i32, x: f32) {
        let Some(actor) = self.selected else {
            return;
        };
        if !self.plan.contains_floor(floor) {
            return;
        }
        if self.elevator.is_boarded(actor) {
            return;
        }
        if let Ok(rider) = self.world.get::<&Rider>(actor) {
            if rider.is_riding() {
                return;
            }
        }
        let Ok(current_floor) = self.world.get::<&Position>(actor).map(|p| p.floor) else {
            return;
        };

        if floor == current_floor {
            let _ = self.world.remove_one::<Rider>(actor);
            self.clear_door_walkthrough(actor);
            let _ = self.world.insert_one(actor, SeekTarget::new(x));
            return;
        }

        // The car is already coming for this actor; ignore
        if self.elevator.active_request().map(|r| r.actor) == Some(actor) {
            return;
        }

        self.clear_door_walkthrough(actor);
        let _ = self
            .world
            .insert_one(actor, Rider::walking_to_car(floor, Some(x)));
        let _ = self
            .world
            .insert_one(actor, SeekTarget::new(self.plan.elevator_x));
    }

    /// Register a transport request directly (input collaborators normally
    /// go through `handle_click`, which walks the actor over first)
    pub fn request_elevator(&mut self, actor: Entity, target_floor: i32) -> bool {
        self.elevator.request_elevator(
            &mut self.world,
            &self.layout.roster,
            actor,
            target_floor,
            self.sim_time,
            &self.sim,
        )
    }

    /// Walk-to-car hand-off: once a walking actor is within tolerance of
    /// the boarding x, its request fires. Re-checked every tick; a stale
    /// walk is dropped silently.
    fn update_walkers(&mut self) {
        let mut arrivals = Vec::new();
        let mut cancels = Vec::new();
        let mut walkers = Vec::new();

        for (entity, (pos, rider)) in self.world.query::<(&Position, &Rider)>().iter() {
            let RiderState::WalkingToCar { target_floor } = rider.state else {
                continue;
            };
            if pos.floor == target_floor {
                cancels.push(entity);
            } else if (pos.x - self.plan.elevator_x).abs() < self.sim.boarding_tolerance {
                arrivals.push((entity, target_floor));
            } else {
                walkers.push(entity);
            }
        }

        for entity in cancels {
            let _ = self.world.remove_one::<Rider>(entity);
            let _ = self.world.remove_one::<SeekTarget>(entity);
        }

        for (entity, target_floor) in arrivals {
            let _ = self.world.remove_one::<SeekTarget>(entity);
            if !self.request_elevator(entity, target_floor) {
                let _ = self.world.remove_one::<Rider>(entity);
            }
        }

        // Keep walkers heading for the car unless a door pause owns them
        for entity in walkers {
            let seeking = self.world.get::<&SeekTarget>(entity).is_ok();
            let in_door = self.world.get::<&DoorTransit>(entity).is_ok();
            if !seeking && !in_door {
                let _ = self
                    .world
                    .insert_one(entity, SeekTarget::new(self.plan.elevator_x));
            }
        }
    }

    fn clear_door_walkthrough(&mut self, actor: Entity) {
        if let Ok(mut transit) = self.world.get::<&mut DoorTransit>(actor) {
            transit.walking_through = false;
        }
    }

    // ── Read accessors for collaborators ──

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn sim_config(&self) -> &SimConfig {
        &self.sim
    }

    pub fn building_name(&self) -> &str {
        &self.layout.name
    }

    /// Actors in spawn order
    pub fn roster(&self) -> &[Entity] {
        &self.layout.roster
    }

    pub fn door_queue(&self) -> &DoorQueue {
        &self.doors
    }

    pub fn selected(&self) -> Option<Entity> {
        self.selected
    }

    pub fn set_selected(&mut self, actor: Option<Entity>) {
        self.selected = actor;
    }

    /// Y of a floor's walk line (for collaborators that draw actors)
    pub fn floor_y(&self, floor: i32) -> f32 {
        self.plan.floor_y(floor)
    }

    /// Hit-test a world-space point against the roster (for selection)
    pub fn actor_at(&self, x: f32, y: f32) -> Option<Entity> {
        let floor = self.plan.floor_at_y(y)?;
        self.layout.roster.iter().copied().find(|&e| {
            self.world
                .get::<&Position>(e)
                .map(|p| p.floor == floor && (p.x - x).abs() <= self.sim.body_half_width)
                .unwrap_or(false)
        })
    }
}
