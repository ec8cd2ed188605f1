//! Shelter simulation core.
//!
//! A deterministic tick engine for an underground shelter: facilities
//! turn residents' labor into resources, construction and research
//! advance in the background, and shortages wear the residents down.
//! The engine owns the state; drivers call `tick` and issue commands.

pub mod actions;
pub mod clock;
pub mod command;
pub mod config;
pub mod construction_subsystem;
pub mod efficiency;
pub mod engine;
pub mod error;
pub mod event;
pub mod facility;
pub mod ledger_subsystem;
pub mod name_generator;
pub mod production_subsystem;
pub mod research_subsystem;
pub mod resident;
pub mod resource;
pub mod rng;
pub mod shortage_subsystem;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod subsystem;
pub mod technology;
pub mod types;
