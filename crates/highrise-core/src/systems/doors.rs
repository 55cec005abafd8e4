//! Door coordinator - trigger-zone detection and fixed-delay choreography.
//!
//! When a moving actor crosses a closed door's trigger zone from the
//! approach side, the actor halts, the door opens, and two deadlines are
//! queued: a short one that restores the captured target so the actor is
//! seen walking through the open door, and a longer one that closes the
//! door and clears the transit flags. Fixed pacing, independent of actor
//! speed - no collision-exit detection.

use hecs::{Entity, World};
use log::debug;

use crate::components::{Actor, Door, DoorTransit, Motion, Position, SeekTarget};
use crate::config::{SimConfig, STANDSTILL_EPSILON};

/// An in-flight door crossing: one actor, one door, two deadlines
#[derive(Debug, Clone)]
pub struct DoorPassage {
    pub door: Entity,
    pub actor: Entity,
    /// When the actor's captured target is restored
    pub resume_at: f64,
    /// When the door closes and the transit flags clear
    pub close_at: f64,
    /// Target captured when the actor was halted, if it had one
    pub resume_x: Option<f32>,
    resumed: bool,
}

/// Tracks all in-flight door crossings
#[derive(Debug, Default)]
pub struct DoorQueue {
    passages: Vec<DoorPassage>,
}

impl DoorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Whether this actor is currently mid-crossing
    pub fn in_transit(&self, actor: Entity) -> bool {
        self.passages.iter().any(|p| p.actor == actor)
    }
}

/// Per-tick door pass: fire due deadlines, then scan moving actors against
/// closed doors on their floor. Runs after movement, before the elevator.
pub fn door_system(world: &mut World, queue: &mut DoorQueue, now: f64, config: &SimConfig) {
    process_deadlines(world, queue, now);
    clear_stalled(world);
    trigger_scan(world, queue, now, config);
}

fn process_deadlines(world: &mut World, queue: &mut DoorQueue, now: f64) {
    for passage in queue.passages.iter_mut() {
        if !passage.resumed && now >= passage.resume_at {
            passage.resumed = true;
            let still_walking = world
                .get::<&DoorTransit>(passage.actor)
                .map(|t| t.walking_through)
                .unwrap_or(false);
            if still_walking {
                if let Some(x) = passage.resume_x {
                    let _ = world.insert_one(passage.actor, SeekTarget::new(x));
                }
            }
        }

        if now >= passage.close_at {
            if let Ok(mut door) = world.get::<&mut Door>(passage.door) {
                door.open = false;
            }
            let _ = world.remove_one::<DoorTransit>(passage.actor);
        }
    }

    queue.passages.retain(|p| now < p.close_at);
}

fn trigger_scan(world: &mut World, queue: &mut DoorQueue, now: f64, config: &SimConfig) {
    let doors: Vec<(Entity, Door)> = world
        .query::<&Door>()
        .iter()
        .map(|(e, d)| (e, *d))
        .collect();
    if doors.is_empty() {
        return;
    }

    struct Hit {
        actor: Entity,
        door: Entity,
        resume_x: Option<f32>,
    }
    let mut hits = Vec::new();

    for (actor, (pos, motion, _)) in world
        .query::<(&Position, &Motion, &Actor)>()
        .without::<&DoorTransit>()
        .iter()
    {
        if motion.vx.abs() <= STANDSTILL_EPSILON {
            continue;
        }

        let hit = doors.iter().find(|(_, door)| {
            door.floor == pos.floor
                && !door.open
                && (door.x - pos.x).abs() < door.trigger_width
                && (door.x - pos.x) != 0.0
                && motion.vx.signum() == (door.x - pos.x).signum()
        });

        if let Some(&(door_entity, _)) = hit {
            let resume_x = world.get::<&SeekTarget>(actor).map(|s| s.x).ok();
            hits.push(Hit {
                actor,
                door: door_entity,
                resume_x,
            });
        }
    }

    for hit in hits {
        // One actor per door cycle: a door opened here no longer matches
        // the closed-door filter for anyone else
        if let Ok(mut door) = world.get::<&mut Door>(hit.door) {
            if door.open {
                continue;
            }
            door.open = true;
            debug!(
                "door opens: floor {} x {} for actor {:?}",
                door.floor, door.x, hit.actor
            );
        }

        let _ = world.remove_one::<SeekTarget>(hit.actor);
        if let Ok(mut motion) = world.get::<&mut Motion>(hit.actor) {
            motion.vx = 0.0;
            motion.walking = false;
        }
        let _ = world.insert_one(hit.actor, DoorTransit::begin());

        queue.passages.push(DoorPassage {
            door: hit.door,
            actor: hit.actor,
            resume_at: now + config.door_resume_secs,
            close_at: now + config.door_close_secs,
            resume_x: hit.resume_x,
            resumed: false,
        });
    }
}

/// An actor that came to rest outside the choreography is no longer
/// "entering" - mirrors the driver's per-frame reset
fn clear_stalled(world: &mut World) {
    for (_, (transit, motion)) in world.query::<(&mut DoorTransit, &Motion)>().iter() {
        if transit.entered && motion.vx.abs() < STANDSTILL_EPSILON {
            transit.entered = false;
        }
    }
}
