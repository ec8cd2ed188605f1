//! Efficiency calculator: how well a facility's crew performs.
//!
//! Operational efficiency scales production; construction efficiency
//! scales build progress. Both are pure and return exactly 0 for an
//! empty crew.

use crate::{
    facility::Facility,
    resident::{Resident, SkillKind},
};

pub const OPERATIONAL_MIN: f64 = 0.1;
pub const OPERATIONAL_MAX: f64 = 2.0;
pub const CONSTRUCTION_MIN: f64 = 0.1;
pub const CONSTRUCTION_MAX: f64 = 1.5;

/// Skill value used for facility kinds with no mapped skill.
pub const NOMINAL_SKILL: f64 = 1.0;

/// Per-worker efficiency at an operational facility, in [0.1, 2.0].
pub fn worker_efficiency(resident: &Resident, skill: Option<SkillKind>) -> f64 {
    let relevant = skill.map_or(NOMINAL_SKILL, |s| f64::from(resident.skills.get(s)));
    let happiness_bonus = (resident.happiness - 50.0) / 100.0;
    let health_penalty = ((50.0 - resident.health) / 100.0).max(0.0);
    (relevant / 10.0 + happiness_bonus - health_penalty).clamp(OPERATIONAL_MIN, OPERATIONAL_MAX)
}

/// Per-builder efficiency, in [0.1, 1.5]. Always uses engineering, and
/// condition counts half as much as on an operational shift.
pub fn builder_efficiency(resident: &Resident) -> f64 {
    let engineering = f64::from(resident.skills.engineering);
    let happiness_bonus = (resident.happiness - 50.0) / 200.0;
    let health_penalty = ((50.0 - resident.health) / 200.0).max(0.0);
    (engineering / 10.0 + happiness_bonus - health_penalty)
        .clamp(CONSTRUCTION_MIN, CONSTRUCTION_MAX)
}

/// `average(worker efficiency) * (0.5 + 0.5 * workers / max_workers)`.
pub fn operational_efficiency(facility: &Facility, residents: &[Resident]) -> f64 {
    let skill = facility.kind.relevant_skill();
    let crew = resolve(&facility.workers, residents, &facility.id);
    if crew.is_empty() || facility.max_workers == 0 {
        return 0.0;
    }
    let average = crew.iter().map(|r| worker_efficiency(r, skill)).sum::<f64>() / crew.len() as f64;
    let ratio = crew.len() as f64 / facility.max_workers as f64;
    average * (0.5 + 0.5 * ratio)
}

/// Plain average builder efficiency over `builders`.
pub fn construction_efficiency(facility: &Facility, residents: &[Resident]) -> f64 {
    let crew = resolve(&facility.build_workers, residents, &facility.id);
    if crew.is_empty() {
        return 0.0;
    }
    crew.iter().map(|r| builder_efficiency(r)).sum::<f64>() / crew.len() as f64
}

fn resolve<'a>(ids: &[String], residents: &'a [Resident], facility_id: &str) -> Vec<&'a Resident> {
    ids.iter()
        .filter_map(|id| {
            let found = residents.iter().find(|r| &r.id == id);
            if found.is_none() {
                log::warn!("facility {facility_id} references missing resident {id}");
            }
            found
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ShelterConfig,
        facility::FacilityKind,
        resident::Skills,
    };

    fn resident(id: &str, skill: u8, happiness: f64, health: f64) -> Resident {
        Resident {
            id: id.into(),
            name: id.into(),
            skills: Skills::uniform(skill),
            happiness,
            health,
            age: 30,
            assigned_facility: None,
            is_working: false,
        }
    }

    fn facility(kind: FacilityKind) -> Facility {
        let config = ShelterConfig::default_test();
        Facility::new_construction("f".into(), config.facility(kind).unwrap())
    }

    #[test]
    fn worker_efficiency_is_clamped() {
        let star = resident("a", 10, 100.0, 100.0);
        let wreck = resident("b", 1, 0.0, 0.0);
        assert_eq!(worker_efficiency(&star, Some(SkillKind::Engineering)), 1.5);
        assert_eq!(worker_efficiency(&wreck, Some(SkillKind::Engineering)), OPERATIONAL_MIN);

        let mut prodigy = star.clone();
        prodigy.skills.engineering = 20;
        assert_eq!(worker_efficiency(&prodigy, Some(SkillKind::Engineering)), OPERATIONAL_MAX);
    }

    #[test]
    fn builder_efficiency_matches_worked_example() {
        let r = resident("a", 10, 80.0, 100.0);
        assert!((builder_efficiency(&r) - 1.15).abs() < 1e-12);
    }

    #[test]
    fn unmapped_skill_uses_nominal_value() {
        let r = resident("a", 10, 50.0, 100.0);
        assert!((worker_efficiency(&r, None) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn empty_crew_means_zero() {
        let residents = vec![resident("a", 5, 50.0, 100.0)];
        let mut farm = facility(FacilityKind::Farm);
        assert_eq!(construction_efficiency(&farm, &residents), 0.0);
        farm.is_building = false;
        assert_eq!(operational_efficiency(&farm, &residents), 0.0);
    }

    #[test]
    fn partial_crew_scales_by_ratio() {
        let residents = vec![resident("a", 10, 50.0, 100.0)];
        let mut farm = facility(FacilityKind::Farm);
        farm.is_building = false;
        farm.workers.push("a".into());

        // 1.0 average, one of three slots filled
        let expected = 1.0 * (0.5 + 0.5 / 3.0);
        assert!((operational_efficiency(&farm, &residents) - expected).abs() < 1e-12);
    }

    #[test]
    fn dangling_worker_ids_are_skipped() {
        let residents = vec![resident("a", 10, 50.0, 100.0)];
        let mut farm = facility(FacilityKind::Farm);
        farm.build_workers = vec!["ghost".into(), "a".into()];
        assert!((construction_efficiency(&farm, &residents) - 1.0).abs() < 1e-12);
    }
}
