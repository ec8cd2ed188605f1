//! The simulation engine: one owner for the state, the clock and the
//! subsystem pipeline.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Production    (net rates → ProductionComputed)
//!   2. Construction  (draft idle builders, advance, complete)
//!   3. Research      (advance the active technology)
//!   4. Ledger        (recompute limits, apply clamped delta)
//!   5. Shortage      (health/happiness penalties)
//!
//! RULES:
//!   - Subsystems execute in registration order, every tick.
//!   - A tick runs on a working copy and is committed only if every
//!     subsystem succeeds. A failed tick leaves the state untouched.
//!   - Subsystems hand data forward only through the tick's events.
//!   - All randomness flows through the RngBank.

use crate::{
    clock::{SimClock, TICK_DELTA},
    command::{CommandOutcome, PlayerCommand},
    config::ShelterConfig,
    construction_subsystem::ConstructionSubsystem,
    error::{ActionError, ActionResult, SimError, SimResult},
    event::SimEvent,
    facility::FacilityKind,
    ledger_subsystem::LedgerSubsystem,
    production_subsystem::ProductionSubsystem,
    research_subsystem::ResearchSubsystem,
    resource::ResourceBundle,
    rng::RngBank,
    shortage_subsystem::ShortageSubsystem,
    snapshot::ShelterSnapshot,
    state::ShelterState,
    subsystem::{SimSubsystem, TickContext},
    types::{FacilityId, ResidentId},
};

pub struct SimEngine {
    pub state:    ShelterState,
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    config:       ShelterConfig,
    subsystems:   Vec<Box<dyn SimSubsystem>>,
}

impl SimEngine {
    /// A new game with no subsystems registered.
    pub fn new(seed: u64, config: ShelterConfig) -> Self {
        let rng_bank = RngBank::new(seed);
        Self {
            state:      ShelterState::new_game(&config, &rng_bank),
            clock:      SimClock::new(),
            rng_bank,
            config,
            subsystems: Vec::new(),
        }
    }

    /// Build a fully wired engine with all subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(seed: u64, config: ShelterConfig) -> Self {
        let mut engine = SimEngine::new(seed, config);

        // EXECUTION ORDER: fixed, documented, never reordered.
        engine.register(Box::new(ProductionSubsystem::new()));
        engine.register(Box::new(ConstructionSubsystem::new()));
        engine.register(Box::new(ResearchSubsystem::new()));
        engine.register(Box::new(LedgerSubsystem::new()));
        engine.register(Box::new(ShortageSubsystem::new()));
        engine
    }

    /// `build` with the built-in balance data.
    pub fn build_test(seed: u64) -> Self {
        Self::build(seed, ShelterConfig::default_test())
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push(subsystem);
    }

    pub fn config(&self) -> &ShelterConfig {
        &self.config
    }

    /// Advance the shelter by `delta` seconds of game time.
    pub fn tick(&mut self, delta: f64) -> SimResult<Vec<SimEvent>> {
        if self.clock.paused {
            return Err(SimError::Paused);
        }
        if !delta.is_finite() || delta < 0.0 {
            return Err(SimError::InvalidDelta(delta));
        }

        let current_tick = self.state.tick + 1;
        let ctx = TickContext { tick: current_tick, delta, config: &self.config };
        let mut working = self.state.clone();
        let mut tick_events = vec![SimEvent::TickStarted { tick: current_tick, delta }];

        // Each subsystem sees all events emitted so far this tick.
        for subsystem in &mut self.subsystems {
            let new_events = subsystem.update(&ctx, &mut working, &tick_events)?;
            for event in &new_events {
                log::debug!("tick={current_tick} {}: {}", subsystem.name(), event.type_name());
            }
            tick_events.extend(new_events);
        }

        working.game_time += delta;
        working.tick = current_tick;
        working.last_update = chrono::Utc::now().timestamp_millis();
        working.max_population = working.compute_max_population(&self.config);
        working.refresh_working_flags();

        tick_events.push(SimEvent::TickCompleted {
            tick:      current_tick,
            game_time: working.game_time,
        });
        self.state = working;
        Ok(tick_events)
    }

    /// Run n one-second ticks in a loop. Used for testing and fast-forward.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        self.clock.resume();
        for _ in 0..n {
            if let Err(e) = self.tick(TICK_DELTA) {
                self.clock.pause();
                return Err(e);
            }
        }
        self.clock.pause();
        Ok(())
    }

    // ── Player actions ─────────────────────────────────────────

    pub fn build_facility(&mut self, kind: FacilityKind) -> ActionResult<FacilityId> {
        self.state.build_facility(kind, &self.config, &self.rng_bank)
    }

    pub fn upgrade_facility(&mut self, facility_id: &str) -> ActionResult<u32> {
        self.state.upgrade_facility(facility_id, &self.config)
    }

    pub fn cancel_build(&mut self, facility_id: &str) -> ActionResult<ResourceBundle> {
        self.state.cancel_build(facility_id, &self.config)
    }

    pub fn assign_worker(&mut self, resident_id: &str, facility_id: &str) -> ActionResult<()> {
        self.state.assign_worker(resident_id, facility_id)
    }

    pub fn unassign_worker(&mut self, resident_id: &str) -> ActionResult<()> {
        self.state.unassign_worker(resident_id)
    }

    pub fn recruit_resident(&mut self) -> ActionResult<ResidentId> {
        self.state.recruit_resident(&self.config, &self.rng_bank)
    }

    pub fn start_research(&mut self, tech_id: &str) -> ActionResult<()> {
        self.state.start_research(tech_id)
    }

    /// Dispatch a serialized player command.
    pub fn apply_command(&mut self, command: PlayerCommand) -> ActionResult<CommandOutcome> {
        log::debug!("command: {command:?}");
        let outcome = match command {
            PlayerCommand::Pause => {
                self.clock.pause();
                CommandOutcome::Done
            }
            PlayerCommand::Resume => {
                self.clock.resume();
                CommandOutcome::Done
            }
            PlayerCommand::SetSpeed { speed } => {
                self.clock.set_speed(speed);
                CommandOutcome::Done
            }
            PlayerCommand::BuildFacility { kind } => {
                let facility_id = self.build_facility(kind)?;
                CommandOutcome::FacilityBuilt { facility_id }
            }
            PlayerCommand::UpgradeFacility { facility_id } => {
                let level = self.upgrade_facility(&facility_id)?;
                CommandOutcome::FacilityUpgraded { facility_id, level }
            }
            PlayerCommand::CancelBuild { facility_id } => {
                let refund = self.cancel_build(&facility_id)?;
                CommandOutcome::BuildCancelled { facility_id, refund }
            }
            PlayerCommand::AssignWorker { resident_id, facility_id } => {
                self.assign_worker(&resident_id, &facility_id)?;
                CommandOutcome::Done
            }
            PlayerCommand::UnassignWorker { resident_id } => {
                self.unassign_worker(&resident_id)?;
                CommandOutcome::Done
            }
            PlayerCommand::RecruitResident => {
                let resident_id = self.recruit_resident()?;
                CommandOutcome::ResidentRecruited { resident_id }
            }
            PlayerCommand::StartResearch { tech_id } => {
                self.start_research(&tech_id)?;
                CommandOutcome::ResearchStarted { tech_id }
            }
        };
        Ok(outcome)
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        self.state.can_afford(cost)
    }

    pub fn recruitment_cost(&self) -> ResourceBundle {
        self.state.recruitment_cost(&self.config)
    }

    pub fn research_eligibility(&self, tech_id: &str) -> ActionResult<()> {
        self.state.research_eligibility(tech_id)
    }

    pub fn can_start_research(&self, tech_id: &str) -> bool {
        self.state.can_start_research(tech_id)
    }

    pub fn facility_kind_cost(&self, kind: FacilityKind) -> ActionResult<ResourceBundle> {
        self.config
            .facility(kind)
            .map(|spec| spec.cost)
            .ok_or(ActionError::UnknownFacilityKind(kind))
    }

    // ── Save / load ────────────────────────────────────────────

    pub fn snapshot(&self, name: &str) -> ShelterSnapshot {
        ShelterSnapshot::capture(name, &self.state)
    }

    /// Adopt a saved state. Incompatible or invalid saves are refused
    /// and the running state is kept.
    pub fn restore(&mut self, snapshot: ShelterSnapshot) -> SimResult<()> {
        if let Err(e) = snapshot.check() {
            log::warn!("restore: refused '{}': {e}", snapshot.name);
            return Err(e);
        }
        let mut state = snapshot.state;
        state.last_update = chrono::Utc::now().timestamp_millis();
        state.refresh_derived(&self.config);
        self.state = state;
        log::info!("restore: '{}' at tick {}", snapshot.name, self.state.tick);
        Ok(())
    }
}
