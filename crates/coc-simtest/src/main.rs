//! CoC Objects Headless Harness
//!
//! Validates blueprint data and facet logic without a MUD server.
//! Runs entirely in-process: no database, no networking, no telnet.
//!
//! Usage:
//!   cargo run -p coc-simtest
//!   cargo run -p coc-simtest -- --verbose

use std::collections::BTreeMap;

use coc_objects::blueprint::{self, validate_blueprint, ObjectBlueprint};
use coc_objects::container::{ContainerOutcome, ContainerRejection};
use coc_objects::error::ObjectError;
use coc_objects::materials::{known_materials, Material, PropertyValue};
use coc_objects::slots::{SlotOutcome, SlotRejection};
use coc_objects::stackable::StackOutcome;
use coc_objects::StackCandidate;
use coc_world::prelude::*;

// ── Blueprint catalogue (authoring format) ──────────────────────────────
const BLUEPRINTS_JSON: &str = include_str!("../../../data/blueprints.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    println!("=== CoC Objects Harness ===\n");

    let blueprints = match load_blueprints(BLUEPRINTS_JSON) {
        Ok(b) => b,
        Err(e) => {
            println!("  ✗ blueprints_parse: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Blueprint catalogue
    results.extend(validate_catalogue(&blueprints));

    // 2. Mass and unit conversions
    results.extend(validate_mass());

    // 3. Materials table
    results.extend(validate_materials());

    // 4. Seats
    results.extend(validate_seats(&blueprints));

    // 5. Slots
    results.extend(validate_slots(&blueprints));

    // 6. Containers and locks
    results.extend(validate_containers(&blueprints));

    // 7. Stacks
    results.extend(validate_stacks(&blueprints));

    // 8. Save/load
    results.extend(validate_persistence(&blueprints));

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

/// A world with one parlour and every blueprint registered.
fn parlour(blueprints: &BTreeMap<String, ObjectBlueprint>) -> ObjectWorld {
    let mut world = ObjectWorld::new();
    world.add_room("parlour", 1.0);
    world.add_room("dreamlands", 0.5);
    for bp in blueprints.values() {
        world.register_blueprint(bp.clone());
    }
    world
}

// ── 1. Blueprint catalogue ──────────────────────────────────────────────

fn validate_catalogue(blueprints: &BTreeMap<String, ObjectBlueprint>) -> Vec<TestResult> {
    println!("--- Blueprint Catalogue ---");
    let mut results = Vec::new();

    results.push(check(
        "catalogue_not_empty",
        blueprints.len() >= 5,
        format!("{} blueprints loaded", blueprints.len()),
    ));

    let invalid: Vec<&str> = blueprints
        .values()
        .filter(|bp| !validate_blueprint(bp).is_empty())
        .map(|bp| bp.class.as_str())
        .collect();
    results.push(check(
        "catalogue_valid",
        invalid.is_empty(),
        if invalid.is_empty() {
            "every blueprint validates".into()
        } else {
            format!("invalid: {}", invalid.join(", "))
        },
    ));

    let chair_matches = blueprints.get("Chair") == Some(&blueprint::chair());
    results.push(check(
        "chair_matches_builtin",
        chair_matches,
        "JSON chair equals the built-in chair".into(),
    ));

    let unique_guids: std::collections::BTreeSet<&str> =
        blueprints.values().map(|bp| bp.guid.as_str()).collect();
    results.push(check(
        "guids_unique",
        unique_guids.len() == blueprints.len(),
        format!("{} distinct GUIDs", unique_guids.len()),
    ));

    results
}

// ── 2. Mass ─────────────────────────────────────────────────────────────

fn validate_mass() -> Vec<TestResult> {
    println!("--- Mass ---");
    let mut results = Vec::new();

    let mut world = ObjectWorld::new();
    world.add_room("parlour", 1.0);
    world.add_room("dreamlands", 0.5);
    let chair = match world.spawn(&blueprint::chair(), "Old chair", "parlour") {
        Ok(id) => id,
        Err(e) => {
            results.push(check("chair_spawn", false, e.to_string()));
            return results;
        }
    };

    if let Ok(obj) = world.object(chair) {
        let m = obj.mass();
        results.push(check(
            "chair_mass",
            m.mass() == 3028.8 && m.weight() == 3028.8,
            format!("mass={} weight={}", m.mass(), m.weight()),
        ));
        results.push(check(
            "chair_units",
            m.weight_kg() == 3.0288 && m.weight_tn() == 0.003029 && m.weight_mg() == 3_028_800.0,
            format!(
                "{}mg {}kg {}t",
                m.weight_mg(),
                m.weight_kg(),
                m.weight_tn()
            ),
        ));
        results.push(check(
            "chair_first_part",
            obj.parts()
                .and_then(|p| p.iter().next())
                .map(|p| p.name() == "Old chair body")
                .unwrap_or(false),
            "parts are named after their object".into(),
        ));
    }

    let moved = world.move_to_room(chair, "dreamlands");
    let halved = world
        .object(chair)
        .map(|o| o.mass().mass() == 3028.8 && o.mass().weight() == 1514.4)
        .unwrap_or(false);
    results.push(check(
        "gravity_changes_weight",
        moved.is_ok() && halved,
        "weight halves at gravity 0.5, mass unchanged".into(),
    ));

    results
}

// ── 3. Materials ────────────────────────────────────────────────────────

fn validate_materials() -> Vec<TestResult> {
    println!("--- Materials ---");
    let mut results = Vec::new();

    for name in known_materials() {
        let m = Material::new(name);
        results.push(check(
            &format!("material_{}_complete", name.replace(' ', "_")),
            m.properties().count() == 27,
            format!("{} properties", m.properties().count()),
        ));
    }

    let iron = Material::new("iron");
    results.push(check(
        "iron_not_flammable",
        !iron.is_flammable(),
        format!("FL={:?}", iron.get_property("FL")),
    ));

    let unknown = Material::new("mi-go alloy");
    results.push(check(
        "unknown_material_defaults",
        unknown.get_property("CL") == Ok(&PropertyValue::Text("white".into())),
        "unknown materials keep the base table".into(),
    ));

    results.push(check(
        "unknown_property_code",
        matches!(unknown.get_property("ZZ"), Err(ObjectError::UnknownProperty(_))),
        "unknown codes are refused".into(),
    ));

    results
}

// ── 4. Seats ────────────────────────────────────────────────────────────

fn validate_seats(blueprints: &BTreeMap<String, ObjectBlueprint>) -> Vec<TestResult> {
    println!("--- Seats ---");
    let mut results = Vec::new();
    let mut world = parlour(blueprints);

    let spawned = (|| -> Result<_, WorldError> {
        let sofa = world.spawn_class("Sofa", "chesterfield", "parlour")?;
        let mut sitters = Vec::new();
        for name in ["Harvey", "Lydia", "Jonah", "Amelia"] {
            sitters.push(world.spawn_class("Investigator", name, "parlour")?);
        }
        Ok((sofa, sitters))
    })();
    let (sofa, sitters) = match spawned {
        Ok(s) => s,
        Err(e) => {
            results.push(check("seat_spawn", false, e.to_string()));
            return results;
        }
    };

    let seated = ["left", "middle", "right"]
        .iter()
        .zip(&sitters)
        .all(|(seat, who)| world.sit(sofa, seat, *who).is_ok());
    results.push(check("sofa_seats_three", seated, "three investigators seated".into()));

    let refused = matches!(
        world.sit(sofa, "left", sitters[3]),
        Err(WorldError::Object(ObjectError::Occupancy { .. }))
    );
    results.push(check("full_seat_refuses", refused, "fourth sitter refused".into()));

    if let Ok(obj) = world.object(sofa) {
        let free = obj.seats().map_or(99, |s| s.free_seats());
        let expected = 18000.0 + 2200.0 + 4100.0 + 48.0 * 1.8 + 3.0 * 72000.0;
        results.push(check(
            "sofa_mass_includes_sitters",
            free == 0 && (obj.mass().mass() - expected).abs() < 1e-6,
            format!("free={} mass={}", free, obj.mass().mass()),
        ));
    }

    let stood = world.stand(sofa, "middle", sitters[1]).is_ok();
    let free_after = world
        .object(sofa)
        .ok()
        .and_then(|o| o.seats().map(|s| s.free_seats()));
    results.push(check(
        "stand_frees_seat",
        stood && free_after == Some(1),
        format!("free after standing: {:?}", free_after),
    ));

    results
}

// ── 5. Slots ────────────────────────────────────────────────────────────

fn validate_slots(blueprints: &BTreeMap<String, ObjectBlueprint>) -> Vec<TestResult> {
    println!("--- Slots ---");
    let mut results = Vec::new();
    let mut world = parlour(blueprints);

    let spawned = (|| -> Result<_, WorldError> {
        Ok((
            world.spawn_class("Backpack", "rucksack", "parlour")?,
            world.spawn_class("OilLamp", "lamp", "parlour")?,
            world.spawn_class("OilLamp", "spare lamp", "parlour")?,
        ))
    })();
    let (pack, lamp, spare) = match spawned {
        Ok(s) => s,
        Err(e) => {
            results.push(check("slot_spawn", false, e.to_string()));
            return results;
        }
    };

    let attached = world.attach(pack, "left pocket", lamp);
    results.push(check(
        "pocket_takes_lamp",
        matches!(attached, Ok(SlotOutcome::Ok(_))),
        format!("{:?}", attached),
    ));

    let second = world.attach(pack, "left pocket", spare);
    results.push(check(
        "full_pocket_refuses",
        second == Ok(SlotOutcome::Rejected(SlotRejection::NoCapacity)),
        format!("{:?}", second),
    ));

    let missing = world.attach(pack, "hat band", spare);
    results.push(check(
        "unknown_slot_refuses",
        missing == Ok(SlotOutcome::Rejected(SlotRejection::NoSuchSlot)),
        format!("{:?}", missing),
    ));

    let detached = world.detach(pack, "left pocket", lamp, "parlour");
    let pack_mass = world.object(pack).map(|o| o.mass().mass()).unwrap_or(-1.0);
    results.push(check(
        "detach_restores_mass",
        detached.is_ok() && pack_mass == 950.0,
        format!("backpack mass {}", pack_mass),
    ));

    results
}

// ── 6. Containers ───────────────────────────────────────────────────────

fn validate_containers(blueprints: &BTreeMap<String, ObjectBlueprint>) -> Vec<TestResult> {
    println!("--- Containers ---");
    let mut results = Vec::new();
    let mut world = parlour(blueprints);

    let spawned = (|| -> Result<_, WorldError> {
        Ok((
            world.spawn_class("WritingDesk", "desk", "parlour")?,
            world.spawn_class("OilLamp", "lamp", "parlour")?,
        ))
    })();
    let (desk, lamp) = match spawned {
        Ok(s) => s,
        Err(e) => {
            results.push(check("container_spawn", false, e.to_string()));
            return results;
        }
    };

    let stored = world.store(desk, lamp);
    results.push(check(
        "desk_stores_lamp",
        stored == Ok(ContainerOutcome::Stored),
        format!("{:?}", stored),
    ));

    let locked = world
        .object_mut(desk)
        .map_err(|e| e.to_string())
        .and_then(|mut d| match d.container_mut() {
            Some(c) => c.lock("desk key").map_err(|e| e.to_string()),
            None => Err("desk has no container".into()),
        });
    let retrieve_locked = world.retrieve(desk, lamp);
    results.push(check(
        "locked_desk_keeps_lamp",
        locked.is_ok()
            && retrieve_locked == Err(WorldError::Object(ObjectError::ContainerClosed)),
        format!("{:?}", retrieve_locked),
    ));

    let wrong_key = world
        .object_mut(desk)
        .ok()
        .and_then(|mut d| d.container_mut().map(|c| c.unlock("brass key")));
    results.push(check(
        "wrong_key_refused",
        wrong_key == Some(Err(ObjectError::WrongKey)),
        format!("{:?}", wrong_key),
    ));

    let reopened = world
        .object_mut(desk)
        .ok()
        .and_then(|mut d| {
            d.container_mut()
                .map(|c| c.unlock("desk key").and_then(|_| c.open()))
        });
    let retrieved = world.retrieve(desk, lamp);
    results.push(check(
        "unlocked_desk_gives_lamp",
        reopened == Some(Ok(())) && retrieved.is_ok(),
        format!("{:?}", retrieved),
    ));

    let closed = world
        .object_mut(desk)
        .ok()
        .and_then(|mut d| d.container_mut().map(|c| c.close()));
    let refused = world.store(desk, lamp);
    results.push(check(
        "closed_desk_refuses",
        closed.is_some()
            && refused == Ok(ContainerOutcome::Rejected(ContainerRejection::Closed)),
        format!("{:?}", refused),
    ));

    let nested = (|| -> Result<f64, WorldError> {
        if let Some(c) = world.object_mut(desk)?.container_mut() {
            c.open()?;
        }
        let pack = world.spawn_class("Backpack", "rucksack", "parlour")?;
        world.store(desk, pack)?;
        world.attach(pack, "main", lamp)?;
        let mass = world.object(desk)?.mass().mass();
        Ok(mass)
    })();
    results.push(check(
        "desk_weighs_lamp_in_stored_pack",
        nested == Ok(15_825.0),
        format!("{:?}", nested),
    ));

    results
}

// ── 7. Stacks ───────────────────────────────────────────────────────────

fn validate_stacks(blueprints: &BTreeMap<String, ObjectBlueprint>) -> Vec<TestResult> {
    println!("--- Stacks ---");
    let mut results = Vec::new();
    let mut world = parlour(blueprints);

    let coins: Result<Vec<_>, WorldError> = (0..51)
        .map(|_| world.spawn_class("SilverDollar", "silver dollar", "parlour"))
        .collect();
    let coins = match coins {
        Ok(c) => c,
        Err(e) => {
            results.push(check("stack_spawn", false, e.to_string()));
            return results;
        }
    };
    let purse = coins[0];

    let merged = coins[1..50]
        .iter()
        .all(|c| world.stack_onto(purse, *c) == Ok(StackOutcome::Merged));
    let count = world.object(purse).map(|o| o.stack_count()).unwrap_or(0);
    results.push(check(
        "stack_fills_to_max",
        merged && count == 50,
        format!("stack of {}", count),
    ));

    let over = world.stack_onto(purse, coins[50]);
    results.push(check(
        "full_stack_refuses",
        over == Ok(StackOutcome::MaxReached),
        format!("{:?}", over),
    ));

    results.push(check(
        "merged_coins_despawned",
        world.object_count() == 2,
        format!("{} objects remain", world.object_count()),
    ));

    let split = world.split_stack(purse, 10).unwrap_or_default();
    let count = world.object(purse).map(|o| o.stack_count()).unwrap_or(0);
    results.push(check(
        "split_spawns_fresh_coins",
        split.len() == 10 && count == 40 && world.objects_in("parlour").len() == 12,
        format!("split {} off, {} left", split.len(), count),
    ));

    let lamp = world.spawn_class("OilLamp", "lamp", "parlour");
    let mismatch = lamp.and_then(|l| world.stack_onto(purse, l));
    results.push(check(
        "other_class_refused",
        mismatch == Ok(StackOutcome::TypeMismatch),
        format!("{:?}", mismatch),
    ));

    results
}

// ── 8. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(blueprints: &BTreeMap<String, ObjectBlueprint>) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();
    let mut world = parlour(blueprints);

    let built = (|| -> Result<_, WorldError> {
        let chair = world.spawn_class("Chair", "Old chair", "parlour")?;
        let harvey = world.spawn_class("Investigator", "Harvey", "parlour")?;
        world.sit(chair, "seat", harvey)?;
        Ok(chair)
    })();
    let chair = match built {
        Ok(c) => c,
        Err(e) => {
            results.push(check("persistence_setup", false, e.to_string()));
            return results;
        }
    };

    let mut buffer = Vec::new();
    if let Err(e) = save_world(&mut buffer, &world) {
        results.push(check("save_world", false, e.to_string()));
        return results;
    }
    results.push(check(
        "save_world",
        !buffer.is_empty(),
        format!("{} bytes", buffer.len()),
    ));

    match load_world(&buffer[..]) {
        Ok(loaded) => {
            let before = world.object(chair).map(|o| o.mass().mass()).ok();
            let after = loaded.object(chair).map(|o| o.mass().mass()).ok();
            results.push(check(
                "load_world_preserves_mass",
                before.is_some() && before == after,
                format!("{:?} -> {:?}", before, after),
            ));
            results.push(check(
                "load_world_preserves_objects",
                loaded.object_count() == world.object_count(),
                format!("{} objects", loaded.object_count()),
            ));
        }
        Err(e) => results.push(check("load_world", false, e.to_string())),
    }

    results
}
