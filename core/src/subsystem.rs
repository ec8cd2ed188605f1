//! Subsystem trait.
//!
//! RULE: Every tick step implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, every tick.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    config::ShelterConfig,
    error::SimResult,
    event::SimEvent,
    state::ShelterState,
    types::Tick,
};

/// Read-only inputs shared by every subsystem for one tick.
pub struct TickContext<'a> {
    pub tick:   Tick,
    /// Elapsed time this tick, in seconds.
    pub delta:  f64,
    pub config: &'a ShelterConfig,
}

/// The contract every subsystem must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per tick by the engine.
    ///
    /// - `ctx`:       tick number, elapsed time and balance config
    /// - `state`:     the working copy being advanced; discarded on error
    /// - `events_in`: events emitted by earlier subsystems this tick
    ///
    /// Returns a vec of new events to add to the tick's event log.
    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut ShelterState,
        events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>>;
}
