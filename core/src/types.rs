//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one discrete step of the tick driver.
pub type Tick = u64;

/// A stable, unique identifier for any entity in the simulation.
pub type EntityId = String;

/// Identifier of a facility (room).
pub type FacilityId = EntityId;

/// Identifier of a resident.
pub type ResidentId = EntityId;

/// Identifier of a technology in the catalog.
pub type TechId = String;

/// Unix timestamp in milliseconds.
pub type Millis = i64;
