//! Building generation - walls, doors, and the actor roster.
//!
//! The layout is declarative: a `BuildingConfig` (hand-written or parsed
//! from the building manifest JSON) lists the floor plan, door positions,
//! and the starting roster. Generation spawns the matching entities and
//! hands back their ids in spawn order - the roster order is what the
//! elevator's first-come-first-served scans iterate.

use std::fmt;

use hecs::{Entity, World};
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::{Actor, Door, Motion, Name, Position, Speed, Wall};
use crate::config::{FloorPlan, SimConfig};

/// Where a single apartment door sits
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DoorSpec {
    pub floor: i32,
    pub x: f32,
}

/// One actor in the starting roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSpec {
    pub given: String,
    pub family: String,
    pub floor: i32,
    pub x: f32,
}

/// Complete declarative description of a building and its residents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub name: String,
    #[serde(default)]
    pub plan: FloorPlan,
    pub doors: Vec<DoorSpec>,
    pub actors: Vec<ActorSpec>,
    #[serde(default)]
    pub sim: SimConfig,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        let plan = FloorPlan::default();
        let mut doors = vec![DoorSpec { floor: 0, x: 180.0 }];
        for floor in 1..=3 {
            for &x in &[308.0, 436.0, 532.0] {
                doors.push(DoorSpec { floor, x });
            }
        }
        Self {
            name: "Maple Court Apartments".to_string(),
            plan,
            doors,
            actors: vec![
                ActorSpec {
                    given: "John".into(),
                    family: "Sim".into(),
                    floor: 3,
                    x: 400.0,
                },
                ActorSpec {
                    given: "Alice".into(),
                    family: "Lee".into(),
                    floor: 2,
                    x: 400.0,
                },
                ActorSpec {
                    given: "Dana".into(),
                    family: "Lee".into(),
                    floor: 1,
                    x: 400.0,
                },
            ],
            sim: SimConfig::default(),
        }
    }
}

impl BuildingConfig {
    /// Parse and validate a building manifest
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ManifestError> {
        if self.plan.floor_count == 0 {
            return Err(ManifestError::Layout("building has no floors".into()));
        }
        if self.plan.walk_min_x >= self.plan.walk_max_x {
            return Err(ManifestError::Layout("walkable span is empty".into()));
        }
        if self.plan.elevator_x < self.plan.walk_min_x || self.plan.elevator_x > self.plan.walk_max_x
        {
            return Err(ManifestError::Layout(
                "elevator sits outside the walkable span".into(),
            ));
        }
        for door in &self.doors {
            if !self.plan.contains_floor(door.floor) {
                return Err(ManifestError::Layout(format!(
                    "door at x {} is on missing floor {}",
                    door.x, door.floor
                )));
            }
        }
        for actor in &self.actors {
            if !self.plan.contains_floor(actor.floor) {
                return Err(ManifestError::Layout(format!(
                    "{} {} starts on missing floor {}",
                    actor.given, actor.family, actor.floor
                )));
            }
        }
        Ok(())
    }
}

/// A bad building manifest
#[derive(Debug)]
pub enum ManifestError {
    Parse(serde_json::Error),
    Layout(String),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Parse(e) => write!(f, "manifest parse error: {}", e),
            ManifestError::Layout(msg) => write!(f, "manifest layout error: {}", msg),
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<serde_json::Error> for ManifestError {
    fn from(e: serde_json::Error) -> Self {
        ManifestError::Parse(e)
    }
}

/// Entity handles produced by generation
pub struct BuildingLayout {
    pub name: String,
    pub doors: Vec<Entity>,
    pub walls: Vec<Entity>,
    /// Actors in spawn order - the service order for elevator scans
    pub roster: Vec<Entity>,
}

/// Spawn walls, doors, and the roster described by the config
pub fn generate_building(world: &mut World, config: &BuildingConfig) -> BuildingLayout {
    let plan = &config.plan;

    // Bounding walls: right wall on every floor, left wall everywhere but
    // the lobby, which opens onto the street
    let mut walls = Vec::new();
    for floor in 0..plan.floor_count as i32 {
        walls.push(world.spawn((Wall::new(floor, plan.walk_max_x, 5.0),)));
        if floor != 0 {
            walls.push(world.spawn((Wall::new(floor, plan.walk_min_x, 5.0),)));
        }
    }

    let doors: Vec<Entity> = config
        .doors
        .iter()
        .map(|spec| world.spawn((Door::new(spec.floor, spec.x, config.sim.door_trigger_width),)))
        .collect();

    let roster: Vec<Entity> = config
        .actors
        .iter()
        .map(|spec| {
            world.spawn((
                Actor,
                Name::new(spec.given.clone(), spec.family.clone()),
                Position::new(spec.x, spec.floor),
                Motion::default(),
                Speed(config.sim.walk_speed),
            ))
        })
        .collect();

    info!(
        "generated {}: {} floors, {} doors, {} actors",
        config.name,
        plan.floor_count,
        doors.len(),
        roster.len()
    );

    BuildingLayout {
        name: config.name.clone(),
        doors,
        walls,
        roster,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_building_generates() {
        let mut world = World::new();
        let config = BuildingConfig::default();
        let layout = generate_building(&mut world, &config);

        assert_eq!(layout.roster.len(), 3);
        assert_eq!(layout.doors.len(), 10);
        // Right wall on all four floors, left wall on three
        assert_eq!(layout.walls.len(), 7);
        assert_eq!(world.query::<&Actor>().iter().count(), 3);
    }

    #[test]
    fn test_roster_preserves_manifest_order() {
        let mut world = World::new();
        let config = BuildingConfig::default();
        let layout = generate_building(&mut world, &config);

        let first = world.get::<&Name>(layout.roster[0]).unwrap();
        assert_eq!(first.full_name(), "John Sim");
        let last = world.get::<&Name>(layout.roster[2]).unwrap();
        assert_eq!(last.full_name(), "Dana Lee");
    }

    #[test]
    fn test_manifest_roundtrip() {
        let config = BuildingConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = BuildingConfig::from_json(&json).unwrap();
        assert_eq!(parsed.actors.len(), config.actors.len());
        assert_eq!(parsed.plan.floor_count, config.plan.floor_count);
    }

    #[test]
    fn test_manifest_rejects_bad_floor() {
        let mut config = BuildingConfig::default();
        config.doors.push(DoorSpec { floor: 9, x: 100.0 });
        let json = serde_json::to_string(&config).unwrap();
        let err = BuildingConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, ManifestError::Layout(_)));
    }

    #[test]
    fn test_manifest_rejects_garbage() {
        let err = BuildingConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }
}
