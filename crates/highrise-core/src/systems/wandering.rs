//! Wandering system - gives idle actors occasional strolls along their floor

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{Actor, DoorTransit, Position, Rider, SeekTarget};
use crate::config::{FloorPlan, SimConfig};

/// Occasionally hand an idle actor (no target, no elevator business, not
/// mid-door) a random walk target within the floor's walkable span. The
/// selected actor is excluded so player commands are never overridden.
pub fn wandering_system(
    world: &mut World,
    plan: &FloorPlan,
    config: &SimConfig,
    exclude: Option<Entity>,
) {
    // Keep a margin from the walls so a stroll never hard-stops. A span
    // narrower than the margins leaves nowhere to go
    let margin = config.body_half_width + 8.0;
    let lo = plan.walk_min_x + margin;
    let hi = plan.walk_max_x - margin;
    if lo >= hi {
        return;
    }

    let mut rng = rand::thread_rng();
    let mut strollers = Vec::new();

    for (entity, (_, _)) in world
        .query::<(&Actor, &Position)>()
        .without::<&SeekTarget>()
        .without::<&Rider>()
        .without::<&DoorTransit>()
        .iter()
    {
        if Some(entity) == exclude {
            continue;
        }
        if rng.gen::<f32>() < config.wander_chance {
            strollers.push(entity);
        }
    }

    for entity in strollers {
        let target_x = rng.gen_range(lo..hi);
        let _ = world.insert_one(entity, SeekTarget::new(target_x));
    }
}
