use crate::{facility::FacilityKind, resource::ResourceBundle};
use thiserror::Error;

/// Infrastructure and data-integrity failures.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save version {found} is incompatible with {expected}")]
    IncompatibleVersion { expected: String, found: String },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("tick() called on paused engine")]
    Paused,

    #[error("Invalid tick delta: {0}")]
    InvalidDelta(f64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;

/// A player action whose precondition was not met. Always recoverable;
/// the state is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Insufficient resources: need {needed:?}")]
    InsufficientResources { needed: ResourceBundle },

    #[error("Facility '{0}' not found")]
    UnknownFacility(String),

    #[error("Resident '{0}' not found")]
    UnknownResident(String),

    #[error("Technology '{0}' not found")]
    UnknownTechnology(String),

    #[error("No spec for facility kind {0}")]
    UnknownFacilityKind(FacilityKind),

    #[error("Facility kind {0} is not unlocked")]
    FacilityLocked(FacilityKind),

    #[error("Facility '{0}' is still under construction")]
    FacilityUnderConstruction(String),

    #[error("Facility '{0}' is not under construction")]
    FacilityNotUnderConstruction(String),

    #[error("Facility '{0}' has no free worker slots")]
    FacilityFull(String),

    #[error("Population cap of {0} reached")]
    PopulationCap(u32),

    #[error("Technology '{0}' is already researched")]
    AlreadyResearched(String),

    #[error("Technology '{0}' is already being researched")]
    AlreadyResearching(String),

    #[error("Technology '{0}' is being researched; only one project at a time")]
    ResearchBusy(String),

    #[error("Technology '{tech}' requires {missing:?}")]
    PrerequisitesUnmet { tech: String, missing: Vec<String> },
}

pub type ActionResult<T> = Result<T, ActionError>;
