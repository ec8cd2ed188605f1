//! Residents: workers with skills, health and happiness.
//!
//! `assigned_facility` is a lookup key, never an owner. The facility's
//! worker set is the source of truth for who works where; `is_working`
//! is recomputed from facility membership after every tick and action.

use crate::{
    name_generator::NameGenerator,
    rng::SubsystemRng,
    types::{FacilityId, ResidentId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Engineering,
    Medical,
    Combat,
    Exploration,
    Research,
    Management,
}

impl SkillKind {
    pub const ALL: [SkillKind; 6] = [
        SkillKind::Engineering,
        SkillKind::Medical,
        SkillKind::Combat,
        SkillKind::Exploration,
        SkillKind::Research,
        SkillKind::Management,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skills {
    pub engineering: u8,
    pub medical:     u8,
    pub combat:      u8,
    pub exploration: u8,
    pub research:    u8,
    pub management:  u8,
}

impl Skills {
    pub fn get(&self, skill: SkillKind) -> u8 {
        match skill {
            SkillKind::Engineering => self.engineering,
            SkillKind::Medical     => self.medical,
            SkillKind::Combat      => self.combat,
            SkillKind::Exploration => self.exploration,
            SkillKind::Research    => self.research,
            SkillKind::Management  => self.management,
        }
    }

    /// Highest skill; ties resolve to the earliest in `SkillKind::ALL`.
    pub fn strongest(&self) -> SkillKind {
        SkillKind::ALL
            .iter()
            .copied()
            .fold(SkillKind::Engineering, |best, s| {
                if self.get(s) > self.get(best) { s } else { best }
            })
    }

    /// Every skill set to the same value. Mostly for fixtures.
    pub fn uniform(value: u8) -> Self {
        Self {
            engineering: value,
            medical:     value,
            combat:      value,
            exploration: value,
            research:    value,
            management:  value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resident {
    pub id:                ResidentId,
    pub name:              String,
    pub skills:            Skills,
    pub happiness:         f64,
    pub health:            f64,
    pub age:               u32,
    pub assigned_facility: Option<FacilityId>,
    pub is_working:        bool,
}

impl Resident {
    /// Roll a new resident: skills 1–10, happiness 80–99, health 90–99,
    /// age 18–64.
    pub fn generate(rng: &mut SubsystemRng) -> Self {
        let id = rng.next_uuid().to_string();
        let skills = Skills {
            engineering: rng.range_inclusive(1, 10) as u8,
            medical:     rng.range_inclusive(1, 10) as u8,
            combat:      rng.range_inclusive(1, 10) as u8,
            exploration: rng.range_inclusive(1, 10) as u8,
            research:    rng.range_inclusive(1, 10) as u8,
            management:  rng.range_inclusive(1, 10) as u8,
        };
        let happiness = f64::from(rng.range_inclusive(80, 99));
        let health = f64::from(rng.range_inclusive(90, 99));
        let age = rng.range_inclusive(18, 64);
        let name = format!(
            "{} {}",
            NameGenerator::title_for(skills.strongest()),
            NameGenerator::generate_full_name(rng)
        );

        Self {
            id,
            name,
            skills,
            happiness,
            health,
            age,
            assigned_facility: None,
            is_working: false,
        }
    }

    /// Residents with no job may be drafted as builders.
    pub fn is_unassigned(&self) -> bool {
        self.assigned_facility.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, SubsystemSlot};

    #[test]
    fn generated_residents_stay_in_documented_ranges() {
        let bank = RngBank::new(2024);
        for nonce in 0..200 {
            let mut rng = bank.for_subsystem_at(SubsystemSlot::Recruitment, nonce);
            let r = Resident::generate(&mut rng);
            for skill in SkillKind::ALL {
                assert!((1..=10).contains(&r.skills.get(skill)));
            }
            assert!((80.0..=99.0).contains(&r.happiness));
            assert!((90.0..=99.0).contains(&r.health));
            assert!((18..=64).contains(&r.age));
            assert!(r.assigned_facility.is_none());
            assert!(!r.is_working);
        }
    }

    #[test]
    fn strongest_skill_prefers_earliest_on_ties() {
        let mut skills = Skills::uniform(5);
        assert_eq!(skills.strongest(), SkillKind::Engineering);
        skills.research = 9;
        assert_eq!(skills.strongest(), SkillKind::Research);
    }
}
