//! Highrise Headless Simulation Harness
//!
//! Validates building generation and the full walk/door/elevator loop
//! without any rendering. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p highrise-simtest
//!   cargo run -p highrise-simtest -- --verbose

use highrise_core::components::{Door, Position, Rider, SeekTarget};
use highrise_core::engine::Engine;
use highrise_core::generation::BuildingConfig;
use highrise_core::systems::DoorState;

// ── Building manifest (same JSON a driver would ship) ───────────────────
const MANIFEST_JSON: &str = include_str!("../../../data/building_manifest.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Highrise Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Building manifest validation
    results.extend(validate_building_manifest(verbose));

    // 2. Walking, walls, and apartment doors
    results.extend(validate_walking_and_doors(verbose));

    // 3. Single elevator ride end-to-end
    results.extend(validate_single_ride(verbose));

    // 4. Shared ride with an en-route pickup
    results.extend(validate_en_route_pickup(verbose));

    // 5. Direction filter and deferred service
    results.extend(validate_direction_filter(verbose));

    // 6. Mutual exclusion and change of mind
    results.extend(validate_exclusion_and_cancel(verbose));

    // 7. Sequential boarding of two waiters at one stop
    results.extend(validate_sequential_boarding(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Step an engine at 60 Hz for `secs` of sim time
fn run(engine: &mut Engine, secs: f64) {
    let dt = 1.0 / 60.0f32;
    let steps = (secs / dt as f64).ceil() as usize;
    for _ in 0..steps {
        engine.update(dt);
    }
}

fn actor_pos(engine: &Engine, actor: hecs::Entity) -> (i32, f32) {
    let pos = engine.world.get::<&Position>(actor).unwrap();
    (pos.floor, pos.x)
}

// ── 1. Building Manifest ────────────────────────────────────────────────

fn validate_building_manifest(verbose: bool) -> Vec<TestResult> {
    println!("--- Building Manifest ---");
    let mut results = Vec::new();

    let config = match BuildingConfig::from_json(MANIFEST_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "manifest_parse".into(),
                passed: false,
                detail: format!("manifest rejected: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "manifest_floors".into(),
        passed: config.plan.floor_count == 4,
        detail: format!("{} floors", config.plan.floor_count),
    });

    results.push(TestResult {
        name: "manifest_doors_on_every_upper_floor".into(),
        passed: (1..4).all(|f| config.doors.iter().any(|d| d.floor == f)),
        detail: format!("{} doors listed", config.doors.len()),
    });

    results.push(TestResult {
        name: "manifest_roster".into(),
        passed: config.actors.len() == 3,
        detail: format!("{} residents", config.actors.len()),
    });

    let engine = Engine::from_manifest(MANIFEST_JSON);
    results.push(TestResult {
        name: "manifest_generates_engine".into(),
        passed: engine.is_ok(),
        detail: match &engine {
            Ok(e) => format!("generated {}", e.building_name()),
            Err(e) => format!("generation failed: {}", e),
        },
    });

    if verbose {
        println!("  Roster:");
        for a in &config.actors {
            println!("    {} {} (floor {}, x {})", a.given, a.family, a.floor, a.x);
        }
    }

    results
}

// ── 2. Walking & Doors ──────────────────────────────────────────────────

fn validate_walking_and_doors(_verbose: bool) -> Vec<TestResult> {
    println!("--- Walking & Doors ---");
    let mut results = Vec::new();

    let mut engine = Engine::from_manifest(MANIFEST_JSON).expect("manifest");
    let john = engine.roster()[0]; // floor 3, x 400
    engine.set_selected(Some(john));

    // Walk right past the doors at 436 and 532
    engine.handle_click(3, 560.0);
    let mut door_opened = false;
    let dt = 1.0 / 60.0f32;
    for _ in 0..(8.0 / dt as f64) as usize {
        engine.update(dt);
        let any_open = engine
            .world
            .query::<&Door>()
            .iter()
            .any(|(_, d)| d.open);
        door_opened |= any_open;
    }

    let (floor, x) = actor_pos(&engine, john);
    results.push(TestResult {
        name: "walk_reaches_target".into(),
        passed: floor == 3 && (x - 560.0).abs() < 0.5,
        detail: format!("arrived at floor {} x {:.1}", floor, x),
    });

    results.push(TestResult {
        name: "doors_open_for_walkers".into(),
        passed: door_opened,
        detail: "a door opened during the walk".into(),
    });

    let all_closed = engine.world.query::<&Door>().iter().all(|(_, d)| !d.open);
    results.push(TestResult {
        name: "doors_close_behind".into(),
        passed: all_closed,
        detail: "all doors closed once the walk finished".into(),
    });

    // Click past the right wall; the wall stops the actor short
    engine.handle_click(3, 620.0);
    run(&mut engine, 4.0);
    let (_, x) = actor_pos(&engine, john);
    results.push(TestResult {
        name: "wall_stops_walk".into(),
        passed: x < 620.0 && x > 500.0,
        detail: format!("stopped at x {:.1} short of the wall", x),
    });

    results
}

// ── 3. Single Ride ──────────────────────────────────────────────────────

fn validate_single_ride(verbose: bool) -> Vec<TestResult> {
    println!("--- Single Ride ---");
    let mut results = Vec::new();

    let mut engine = Engine::from_manifest(MANIFEST_JSON).expect("manifest");
    let alice = engine.roster()[1]; // floor 2, x 400
    engine.set_selected(Some(alice));
    engine.handle_click(0, 300.0);

    let dt = 1.0 / 60.0f32;
    let mut waited = false;
    let mut rode = false;
    let mut board_time = None;
    for _ in 0..(40.0 / dt as f64) as usize {
        engine.update(dt);
        if let Ok(rider) = engine.world.get::<&Rider>(alice) {
            waited |= rider.is_waiting();
            rode |= rider.is_riding();
        }
        if board_time.is_none() && engine.elevator.is_boarded(alice) {
            board_time = Some(engine.sim_time());
        }
    }

    results.push(TestResult {
        name: "ride_waits_then_rides".into(),
        passed: waited && rode,
        detail: format!("waited={} rode={}", waited, rode),
    });

    let (floor, x) = actor_pos(&engine, alice);
    results.push(TestResult {
        name: "ride_delivers_to_lobby".into(),
        passed: floor == 0 && (x - 300.0).abs() < 0.5,
        detail: format!("delivered to floor {} x {:.1}", floor, x),
    });

    results.push(TestResult {
        name: "ride_releases_rider".into(),
        passed: engine.world.get::<&Rider>(alice).is_err(),
        detail: "rider component removed after stepping out".into(),
    });

    results.push(TestResult {
        name: "ride_car_idles_after".into(),
        passed: engine.elevator.is_idle()
            && !engine.elevator.is_locked()
            && engine.elevator.current_floor() == 0,
        detail: format!("car idle at floor {}", engine.elevator.current_floor()),
    });

    if verbose {
        if let Some(t) = board_time {
            println!("  boarded at t={:.2}s", t);
        }
    }

    results
}

// ── 4. En-Route Pickup ──────────────────────────────────────────────────

fn validate_en_route_pickup(_verbose: bool) -> Vec<TestResult> {
    println!("--- En-Route Pickup ---");
    let mut results = Vec::new();

    let mut engine = Engine::from_manifest(MANIFEST_JSON).expect("manifest");
    let alice = engine.roster()[1]; // floor 2
    let dana = engine.roster()[2]; // floor 1

    // Dana calls first and is the active request; Alice waits upstairs
    // heading the same way and gets swept up in passing
    assert!(engine.request_elevator(dana, 3));
    assert!(engine.request_elevator(alice, 3));

    let dt = 1.0 / 60.0f32;
    let mut shared_leg = false;
    for _ in 0..(40.0 / dt as f64) as usize {
        engine.update(dt);
        shared_leg |= engine.elevator.is_boarded(dana) && engine.elevator.is_boarded(alice);
    }

    results.push(TestResult {
        name: "pickup_shares_the_car".into(),
        passed: shared_leg,
        detail: "both riders aboard on the shared leg".into(),
    });

    let (dana_floor, _) = actor_pos(&engine, dana);
    let (alice_floor, _) = actor_pos(&engine, alice);
    results.push(TestResult {
        name: "pickup_delivers_both".into(),
        passed: dana_floor == 3 && alice_floor == 3,
        detail: format!("dana → floor {}, alice → floor {}", dana_floor, alice_floor),
    });

    results.push(TestResult {
        name: "pickup_car_empties".into(),
        passed: engine.elevator.boarded().is_empty() && engine.elevator.is_idle(),
        detail: "car empty and idle after the run".into(),
    });

    results
}

// ── 5. Direction Filter ─────────────────────────────────────────────────

fn validate_direction_filter(_verbose: bool) -> Vec<TestResult> {
    println!("--- Direction Filter ---");
    let mut results = Vec::new();

    let mut engine = Engine::from_manifest(MANIFEST_JSON).expect("manifest");
    let john = engine.roster()[0]; // floor 3
    let alice = engine.roster()[1]; // floor 2

    // John rides down; Alice wants up from floor 2 and must not be
    // collected on the way past
    assert!(engine.request_elevator(john, 0));
    assert!(engine.request_elevator(alice, 3));

    let dt = 1.0 / 60.0f32;
    let mut opened_at_2_with_john = false;
    for _ in 0..(60.0 / dt as f64) as usize {
        engine.update(dt);
        if engine.elevator.is_boarded(john)
            && !matches!(engine.elevator.door_state(2), DoorState::Closed)
        {
            opened_at_2_with_john = true;
        }
    }

    results.push(TestResult {
        name: "filter_skips_opposite_rider".into(),
        passed: !opened_at_2_with_john,
        detail: "no stop at floor 2 while heading down".into(),
    });

    let (john_floor, _) = actor_pos(&engine, john);
    let (alice_floor, _) = actor_pos(&engine, alice);
    results.push(TestResult {
        name: "filter_serves_deferred_rider".into(),
        passed: john_floor == 0 && alice_floor == 3,
        detail: format!(
            "john → floor {}, alice served after → floor {}",
            john_floor, alice_floor
        ),
    });

    results
}

// ── 6. Exclusion & Cancellation ─────────────────────────────────────────

fn validate_exclusion_and_cancel(_verbose: bool) -> Vec<TestResult> {
    println!("--- Exclusion & Cancellation ---");
    let mut results = Vec::new();

    let mut engine = Engine::from_manifest(MANIFEST_JSON).expect("manifest");
    let john = engine.roster()[0]; // floor 3
    let dana = engine.roster()[2]; // floor 1

    assert!(engine.request_elevator(john, 0));
    let active_before = engine.elevator.active_request().map(|r| r.actor);

    // A second request queues without stealing the itinerary
    assert!(engine.request_elevator(dana, 2));
    let active_after = engine.elevator.active_request().map(|r| r.actor);
    results.push(TestResult {
        name: "exclusion_one_itinerary".into(),
        passed: active_before == Some(john) && active_after == Some(john),
        detail: "second request queued, itinerary unchanged".into(),
    });

    run(&mut engine, 60.0);
    let (john_floor, _) = actor_pos(&engine, john);
    let (dana_floor, _) = actor_pos(&engine, dana);
    results.push(TestResult {
        name: "exclusion_both_served".into(),
        passed: john_floor == 0 && dana_floor == 2,
        detail: format!("john → floor {}, dana → floor {}", john_floor, dana_floor),
    });

    // Change of mind: a same-floor click while walking to the car drops
    // the pending ride
    let mut engine = Engine::from_manifest(MANIFEST_JSON).expect("manifest");
    let alice = engine.roster()[1]; // floor 2
    engine.set_selected(Some(alice));
    engine.handle_click(0, 300.0);
    run(&mut engine, 0.3);
    engine.handle_click(2, 500.0);
    run(&mut engine, 5.0);

    let (floor, x) = actor_pos(&engine, alice);
    results.push(TestResult {
        name: "cancel_same_floor_click".into(),
        passed: floor == 2 && (x - 500.0).abs() < 0.5 && engine.world.get::<&Rider>(alice).is_err(),
        detail: format!("stayed on floor {} at x {:.1}", floor, x),
    });

    results
}

// ── 7. Sequential Boarding ──────────────────────────────────────────────

fn validate_sequential_boarding(_verbose: bool) -> Vec<TestResult> {
    println!("--- Sequential Boarding ---");
    let mut results = Vec::new();

    let mut engine = Engine::from_manifest(MANIFEST_JSON).expect("manifest");
    let alice = engine.roster()[1];
    let dana = engine.roster()[2]; // floor 1, x 400

    // Put both waiters on floor 1 so one stop collects them both
    if let Ok(mut pos) = engine.world.get::<&mut Position>(alice) {
        pos.floor = 1;
        pos.x = 460.0;
    }
    assert!(engine.request_elevator(alice, 3));
    assert!(engine.request_elevator(dana, 3));

    let dt = 1.0 / 60.0f32;
    let mut overlap = false;
    let mut observed_order = None;
    for _ in 0..(40.0 / dt as f64) as usize {
        engine.update(dt);
        // The second waiter must not start walking until the first is in
        if !engine.elevator.is_boarded(alice) && engine.world.get::<&SeekTarget>(dana).is_ok() {
            overlap = true;
        }
        if observed_order.is_none() && engine.elevator.boarded().len() == 2 {
            observed_order = Some(engine.elevator.boarded().to_vec());
        }
    }

    results.push(TestResult {
        name: "boarding_one_at_a_time".into(),
        passed: !overlap,
        detail: "second waiter stands still until the first is aboard".into(),
    });

    results.push(TestResult {
        name: "boarding_roster_order".into(),
        passed: observed_order == Some(vec![alice, dana]),
        detail: format!("boarded order observed: {:?}", observed_order),
    });

    let (alice_floor, _) = actor_pos(&engine, alice);
    let (dana_floor, _) = actor_pos(&engine, dana);
    results.push(TestResult {
        name: "boarding_delivers_both".into(),
        passed: alice_floor == 3 && dana_floor == 3,
        detail: format!("alice → floor {}, dana → floor {}", alice_floor, dana_floor),
    });

    results
}
