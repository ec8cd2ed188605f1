//! Deterministic resident name generation from curated name lists.
//!
//! All generation is deterministic (same RNG stream = same names).

use crate::{resident::SkillKind, rng::SubsystemRng};

/// Deterministic name generator using curated name lists
pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last) deterministically
    pub fn generate_full_name(rng: &mut SubsystemRng) -> String {
        let first_name = Self::pick(rng, Self::first_names());
        let last_name = Self::pick(rng, Self::last_names());
        format!("{first_name} {last_name}")
    }

    /// Role title shown in front of a resident's name, keyed by their
    /// strongest skill.
    pub fn title_for(skill: SkillKind) -> &'static str {
        match skill {
            SkillKind::Engineering => "Engineer",
            SkillKind::Medical     => "Doctor",
            SkillKind::Combat      => "Sergeant",
            SkillKind::Exploration => "Scout",
            SkillKind::Research    => "Researcher",
            SkillKind::Management  => "Supervisor",
        }
    }

    fn pick(rng: &mut SubsystemRng, names: &'static [&'static str]) -> &'static str {
        let index = rng.next_u64_below(names.len() as u64) as usize;
        names.get(index).copied().unwrap_or("Nobody")
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Ada", "Bram", "Cass", "Dorian", "Edda", "Finn", "Greta", "Hugo",
            "Ines", "Jonah", "Kira", "Lev", "Mara", "Nils", "Orla", "Piet",
            "Quinn", "Rhea", "Sami", "Tove", "Ulla", "Vik", "Wren", "Yara",
            "Zeno", "Alma", "Bo", "Cleo", "Dag", "Elin", "Farah", "Gus",
            "Hana", "Ivo", "Juno", "Kai", "Lina", "Milo", "Nora", "Otto",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Ashford", "Brandt", "Castell", "Dunmore", "Eklund", "Falk", "Grau",
            "Holt", "Ivers", "Jansen", "Krane", "Lind", "Marsh", "Novak",
            "Okafor", "Pryce", "Quill", "Rask", "Sato", "Thorne", "Ueda",
            "Voss", "Wexler", "Yilmaz", "Zell", "Ambler", "Birk", "Chen",
            "Dahl", "Ek", "Fenwick", "Hale", "Kovac", "Moreau", "Reyes",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, SubsystemSlot};

    #[test]
    fn name_generation_is_deterministic() {
        let bank1 = RngBank::new(12345);
        let mut rng1 = bank1.for_subsystem_at(SubsystemSlot::Recruitment, 1);
        let name1 = NameGenerator::generate_full_name(&mut rng1);

        let bank2 = RngBank::new(12345);
        let mut rng2 = bank2.for_subsystem_at(SubsystemSlot::Recruitment, 1);
        let name2 = NameGenerator::generate_full_name(&mut rng2);

        assert_eq!(name1, name2, "Same seed should produce same name");
    }

    #[test]
    fn generates_two_part_names() {
        let bank = RngBank::new(7);
        let mut rng = bank.for_subsystem_at(SubsystemSlot::Recruitment, 0);

        for _ in 0..100 {
            let name = NameGenerator::generate_full_name(&mut rng);
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 2, "Name should have exactly 2 parts: {name}");
        }
    }
}
