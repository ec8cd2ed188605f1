//! Properties that must hold on every tick of a long, busy game.

use shelter_core::{
    efficiency::{builder_efficiency, worker_efficiency},
    engine::SimEngine,
    error::SimError,
    facility::FacilityKind,
    resident::{Resident, SkillKind, Skills},
    rng::{RngBank, SubsystemSlot},
};

#[test]
fn resources_stay_within_limits_every_tick() {
    let mut engine = SimEngine::build_test(41);
    for kind in [FacilityKind::WaterPlant, FacilityKind::Farm, FacilityKind::PowerStation] {
        engine.build_facility(kind).expect("build");
    }
    engine.clock.resume();
    for tick in 0..400 {
        if tick == 150 {
            let ids: Vec<String> = engine.state.facilities.iter().map(|f| f.id.clone()).collect();
            let residents: Vec<String> = engine.state.residents.iter().map(|r| r.id.clone()).collect();
            for (r, f) in residents.iter().zip(ids.iter().cycle()) {
                let _ = engine.assign_worker(r, f);
            }
        }
        engine.tick(1.0).expect("tick");
        for (kind, amount) in engine.state.resources.iter() {
            let limit = engine.state.resource_limits.get(kind);
            assert!(
                (0.0..=limit).contains(&amount),
                "tick {tick}: {kind} = {amount} outside [0, {limit}]"
            );
        }
        engine.state.validate().expect("state stays consistent");
        assert!(engine.state.researching_count() <= 1);
    }
}

#[test]
fn rejected_ticks_change_nothing() {
    let mut engine = SimEngine::build_test(42);
    let before = engine.state.clone();

    assert!(matches!(engine.tick(1.0), Err(SimError::Paused)));
    engine.clock.resume();
    assert!(matches!(engine.tick(-1.0), Err(SimError::InvalidDelta(_))));
    assert!(matches!(engine.tick(f64::NAN), Err(SimError::InvalidDelta(_))));
    assert!(matches!(engine.tick(f64::INFINITY), Err(SimError::InvalidDelta(_))));
    assert_eq!(engine.state, before);
}

#[test]
fn zero_delta_tick_only_advances_the_counter() {
    let mut engine = SimEngine::build_test(43);
    let before = engine.state.clone();
    engine.clock.resume();
    engine.tick(0.0).expect("tick");
    assert_eq!(engine.state.tick, 1);
    assert_eq!(engine.state.game_time, 0.0);
    assert_eq!(engine.state.resources, before.resources);
}

#[test]
fn efficiency_stays_in_bounds() {
    let mut rng = RngBank::new(44).for_subsystem_at(SubsystemSlot::Genesis, 0);
    let mut resident = Resident::generate(&mut rng);
    for skill in [0u8, 1, 5, 10, 50, 255] {
        for happiness in [0.0, 25.0, 50.0, 80.0, 100.0] {
            for health in [0.0, 10.0, 50.0, 100.0] {
                resident.skills = Skills::uniform(skill);
                resident.happiness = happiness;
                resident.health = health;
                for kind in SkillKind::ALL {
                    let e = worker_efficiency(&resident, Some(kind));
                    assert!((0.1..=2.0).contains(&e), "worker {e}");
                }
                let e = worker_efficiency(&resident, None);
                assert!((0.1..=2.0).contains(&e), "unskilled {e}");
                let b = builder_efficiency(&resident);
                assert!((0.1..=1.5).contains(&b), "builder {b}");
            }
        }
    }
}
