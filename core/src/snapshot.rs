//! Snapshot serialization: full shelter state to/from JSON.
//!
//! A snapshot captures everything needed to resume play: the state
//! itself plus a small metadata block for save-slot listings. Restoring
//! checks the version first and the state's structure second.

use crate::{
    error::{SimError, SimResult},
    state::ShelterState,
    types::Millis,
};
use serde::{Deserialize, Serialize};

/// Format version written into every save.
pub const SAVE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveMetadata {
    /// Game seconds elapsed.
    pub play_time:       f64,
    pub population:      u32,
    pub shelter_level:   u32,
    /// Floor of the summed ledger.
    pub total_resources: u64,
}

impl SaveMetadata {
    pub fn describe(state: &ShelterState) -> Self {
        Self {
            play_time:       state.game_time,
            population:      state.population,
            shelter_level:   state.shelter_level,
            total_resources: state.resources.total().max(0.0).floor() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShelterSnapshot {
    pub version:  String,
    pub name:     String,
    pub saved_at: Millis,
    pub metadata: SaveMetadata,
    pub state:    ShelterState,
}

impl ShelterSnapshot {
    pub fn capture(name: impl Into<String>, state: &ShelterState) -> Self {
        Self {
            version:  SAVE_VERSION.to_string(),
            name:     name.into(),
            saved_at: chrono::Utc::now().timestamp_millis(),
            metadata: SaveMetadata::describe(state),
            state:    state.clone(),
        }
    }

    /// Version gate plus structural validation of the carried state.
    pub fn check(&self) -> SimResult<()> {
        if !is_version_compatible(&self.version) {
            return Err(SimError::IncompatibleVersion {
                expected: SAVE_VERSION.to_string(),
                found:    self.version.clone(),
            });
        }
        self.state.validate().map_err(SimError::InvalidSnapshot)
    }
}

/// Saves are compatible when their major version matches ours.
pub fn is_version_compatible(version: &str) -> bool {
    match (major(version), major(SAVE_VERSION)) {
        (Some(theirs), Some(ours)) => theirs == ours,
        _ => false,
    }
}

fn major(version: &str) -> Option<u64> {
    version.split('.').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_version_gates_compatibility() {
        assert!(is_version_compatible("1.0.0"));
        assert!(is_version_compatible("1.4.2"));
        assert!(!is_version_compatible("2.0.0"));
        assert!(!is_version_compatible("0.9.0"));
        assert!(!is_version_compatible("garbage"));
        assert!(!is_version_compatible(""));
    }
}
