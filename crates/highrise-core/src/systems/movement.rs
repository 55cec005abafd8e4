//! Movement system - seek-and-stop target following plus wall collision.
//!
//! Not physics: velocity is derived from the sign of the remaining distance
//! each tick, and arrival snaps onto the target. Deterministic for any dt.

use hecs::World;

use crate::components::{Actor, Motion, Position, SeekTarget, Speed, Wall};
use crate::config::ARRIVE_EPSILON;

/// Advance every seeking actor toward its target x. Within `ARRIVE_EPSILON`
/// the actor snaps to the target and the `SeekTarget` is removed.
pub fn movement_system(world: &mut World, dt: f32) {
    let mut arrived = Vec::new();

    for (entity, (pos, motion, seek, speed)) in world
        .query::<(&mut Position, &mut Motion, &SeekTarget, &Speed)>()
        .iter()
    {
        let dx = seek.x - pos.x;
        if dx.abs() < ARRIVE_EPSILON {
            pos.x = seek.x;
            motion.vx = 0.0;
            motion.walking = false;
            arrived.push(entity);
            continue;
        }

        let dir = dx.signum();
        motion.vx = dir * speed.0;
        motion.facing_right = dir > 0.0;
        motion.walking = true;
        pos.x += motion.vx * dt;

        // Snap instead of overshooting past the target on a large step
        if (seek.x - pos.x).signum() != dir {
            pos.x = seek.x;
        }
    }

    for entity in arrived {
        let _ = world.remove_one::<SeekTarget>(entity);
    }

    // Actors with no target stand still
    for (_, motion) in world
        .query::<&mut Motion>()
        .without::<&SeekTarget>()
        .iter()
    {
        motion.vx = 0.0;
        motion.walking = false;
    }
}

/// Push actors back outside any wall box they overlap on their floor, along
/// the side they approached from. A hard stop: velocity and target are
/// cleared, no bounce.
pub fn wall_collision_system(world: &mut World, body_half_width: f32) {
    let walls: Vec<Wall> = world.query::<&Wall>().iter().map(|(_, w)| *w).collect();
    if walls.is_empty() {
        return;
    }

    let mut stopped = Vec::new();
    for (entity, (pos, motion, _)) in world
        .query::<(&mut Position, &mut Motion, &Actor)>()
        .iter()
    {
        for wall in &walls {
            if wall.floor != pos.floor {
                continue;
            }
            let reach = wall.half_width + body_half_width;
            if (pos.x - wall.x).abs() < reach {
                if motion.vx > 0.0 {
                    pos.x = wall.x - reach;
                } else if motion.vx < 0.0 {
                    pos.x = wall.x + reach;
                }
                motion.vx = 0.0;
                motion.walking = false;
                stopped.push(entity);
            }
        }
    }

    for entity in stopped {
        let _ = world.remove_one::<SeekTarget>(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_actor(world: &mut World, x: f32, floor: i32) -> hecs::Entity {
        world.spawn((
            Actor,
            Position::new(x, floor),
            Motion::default(),
            Speed(100.0),
        ))
    }

    #[test]
    fn test_seek_converges_and_clears_target() {
        let mut world = World::new();
        let actor = spawn_actor(&mut world, 0.0, 0);
        world.insert_one(actor, SeekTarget::new(50.0)).unwrap();

        let dt = 0.1; // 10 px per tick
        let mut ticks = 0;
        while world.get::<&SeekTarget>(actor).is_ok() {
            movement_system(&mut world, dt);
            ticks += 1;
            assert!(ticks < 20, "did not converge");
        }

        let pos = world.get::<&Position>(actor).unwrap();
        assert_eq!(pos.x, 50.0);
        let motion = world.get::<&Motion>(actor).unwrap();
        assert_eq!(motion.vx, 0.0);
        assert!(!motion.walking);
        // Bound from the distance: ceil(50 / 10) plus the snap tick
        assert!(ticks <= 6);
    }

    #[test]
    fn test_seek_monotonic_approach() {
        let mut world = World::new();
        let actor = spawn_actor(&mut world, 200.0, 1);
        world.insert_one(actor, SeekTarget::new(80.0)).unwrap();

        let mut last = (200.0f32 - 80.0).abs();
        for _ in 0..30 {
            movement_system(&mut world, 0.05);
            let x = world.get::<&Position>(actor).unwrap().x;
            let dist = (x - 80.0).abs();
            assert!(dist <= last);
            last = dist;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_facing_follows_direction() {
        let mut world = World::new();
        let actor = spawn_actor(&mut world, 100.0, 0);
        world.insert_one(actor, SeekTarget::new(20.0)).unwrap();

        movement_system(&mut world, 0.01);
        let motion = world.get::<&Motion>(actor).unwrap();
        assert!(motion.vx < 0.0);
        assert!(!motion.facing_right);
    }

    #[test]
    fn test_no_overshoot_on_large_step() {
        let mut world = World::new();
        let actor = spawn_actor(&mut world, 0.0, 0);
        world.insert_one(actor, SeekTarget::new(30.0)).unwrap();

        // One tick covers 100 px, target is 30 px away
        movement_system(&mut world, 1.0);
        let x = world.get::<&Position>(actor).unwrap().x;
        assert_eq!(x, 30.0);
    }

    #[test]
    fn test_wall_hard_stops_actor() {
        let mut world = World::new();
        let actor = spawn_actor(&mut world, 560.0, 1);
        world.insert_one(actor, SeekTarget::new(700.0)).unwrap();
        world.spawn((Wall::new(1, 624.0, 5.0),));

        for _ in 0..120 {
            movement_system(&mut world, 1.0 / 60.0);
            wall_collision_system(&mut world, 32.0);
        }

        let pos = world.get::<&Position>(actor).unwrap();
        assert_eq!(pos.x, 624.0 - 5.0 - 32.0);
        assert!(world.get::<&SeekTarget>(actor).is_err());
    }

    #[test]
    fn test_wall_on_other_floor_ignored() {
        let mut world = World::new();
        let actor = spawn_actor(&mut world, 560.0, 0);
        world.insert_one(actor, SeekTarget::new(600.0)).unwrap();
        world.spawn((Wall::new(1, 580.0, 5.0),));

        for _ in 0..120 {
            movement_system(&mut world, 1.0 / 60.0);
            wall_collision_system(&mut world, 32.0);
        }

        assert_eq!(world.get::<&Position>(actor).unwrap().x, 600.0);
    }
}
