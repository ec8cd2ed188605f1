//! Worked examples from the balance sheet, checked end to end.

use shelter_core::{
    engine::SimEngine,
    event::SimEvent,
    facility::FacilityKind,
    resident::Skills,
    resource::{ResourceBundle, ResourceKind},
};

/// Every resident becomes an engineering-10 builder at happiness 80,
/// health 100.
fn steady_crew(engine: &mut SimEngine) {
    for r in &mut engine.state.residents {
        r.skills = Skills::uniform(10);
        r.happiness = 80.0;
        r.health = 100.0;
    }
}

#[test]
fn building_a_farm_drains_exactly_its_cost() {
    let mut engine = SimEngine::build_test(1);
    engine.state.resources = ResourceBundle::default()
        .with(ResourceKind::Materials, 50.0)
        .with(ResourceKind::Power, 20.0);

    let id = engine.build_facility(FacilityKind::Farm).expect("farm is affordable");

    assert_eq!(engine.state.resources.materials, 0.0);
    assert_eq!(engine.state.resources.power, 0.0);
    assert_eq!(engine.state.facilities.len(), 1);
    let farm = engine.state.facility(&id).expect("farm listed");
    assert!(farm.is_building);
    assert_eq!(farm.build_progress, 0.0);
}

#[test]
fn construction_completes_on_the_tick_the_formula_predicts() {
    let mut engine = SimEngine::build_test(2);
    steady_crew(&mut engine);
    let id = engine.build_facility(FacilityKind::Farm).expect("build");
    assert_eq!(engine.state.facility(&id).map(|f| f.build_time), Some(15.0));

    engine.clock.resume();
    let mut completed_at = None;
    for _ in 0..15 {
        let events = engine.tick(1.0).expect("tick");
        for event in events {
            if let SimEvent::ConstructionCompleted { tick, facility_id, .. } = event {
                assert_eq!(facility_id, id);
                completed_at = Some(tick);
            }
        }
        if completed_at.is_some() {
            break;
        }
    }

    // ceil(15 / 1.15) = 14
    assert_eq!(completed_at, Some(14));
    let farm = engine.state.facility(&id).expect("farm listed");
    assert!(farm.is_operational());
    assert!(farm.build_workers.is_empty());
    assert!(farm.workers.is_empty());
    assert!(engine.state.residents.iter().all(|r| !r.is_working));
}

#[test]
fn builders_are_drafted_in_resident_order() {
    let mut engine = SimEngine::build_test(3);
    let id = engine.build_facility(FacilityKind::Quarters).expect("build");
    engine.run_ticks(1).expect("tick");

    let expected: Vec<String> = engine.state.residents.iter().map(|r| r.id.clone()).collect();
    let quarters = engine.state.facility(&id).expect("quarters listed");
    assert_eq!(quarters.build_workers, expected);
    assert!(engine.state.residents.iter().all(|r| r.is_working));
}

#[test]
fn recruitment_cost_grows_with_population() {
    let mut engine = SimEngine::build_test(4);
    let base = ResourceBundle::default()
        .with(ResourceKind::Money, 100.0)
        .with(ResourceKind::Food, 20.0);
    assert_eq!(engine.recruitment_cost(), base);

    engine.build_facility(FacilityKind::Quarters).expect("build quarters");
    engine.run_ticks(45).expect("ticks");
    assert_eq!(engine.state.max_population, 7);

    let money_before = engine.state.resources.money;
    engine.recruit_resident().expect("recruit");
    assert_eq!(engine.state.population, 4);
    assert_eq!(engine.state.resources.money, money_before - 100.0);

    let grown = ResourceBundle::default()
        .with(ResourceKind::Money, 150.0)
        .with(ResourceKind::Food, 30.0);
    assert_eq!(engine.recruitment_cost(), grown);
}

#[test]
fn empty_larder_costs_five_health_and_three_happiness() {
    let mut engine = SimEngine::build_test(5);
    steady_crew(&mut engine);
    engine.state.resources.food = 0.0;

    engine.clock.resume();
    let events = engine.tick(1.0).expect("tick");

    for r in &engine.state.residents {
        assert_eq!(r.health, 95.0);
        assert_eq!(r.happiness, 77.0);
    }
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::ShortageApplied { resource: ResourceKind::Food, residents_affected: 3, .. }
    )));
}

#[test]
fn shortage_penalties_floor_at_zero() {
    let mut engine = SimEngine::build_test(6);
    for r in &mut engine.state.residents {
        r.health = 2.0;
        r.happiness = 1.0;
    }
    engine.state.resources.food = 0.0;
    engine.state.resources.water = 0.0;

    engine.run_ticks(1).expect("tick");
    for r in &engine.state.residents {
        assert_eq!(r.health, 0.0);
        assert_eq!(r.happiness, 0.0);
    }
}

#[test]
fn staffed_farm_feeds_the_shelter() {
    let mut engine = SimEngine::build_test(7);
    steady_crew(&mut engine);
    let farm = engine.build_facility(FacilityKind::Farm).expect("build");
    engine.run_ticks(14).expect("ticks");

    for r in engine.state.residents.clone() {
        engine.assign_worker(&r.id, &farm).expect("assign");
    }
    engine.run_ticks(1).expect("tick");

    // Three steady workers: efficiency min(2.0, 1.0 + 0.3) at full crew.
    let expected = 1.0 * 1.3 - 3.0 * 0.1;
    assert!((engine.state.resources_per_second.food - expected).abs() < 1e-9);
}
