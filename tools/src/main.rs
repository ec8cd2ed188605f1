//! shelter-runner: headless driver for the shelter simulation.
//!
//! Usage:
//!   shelter-runner --seed 12345 --ticks 300 --db saves.db
//!   shelter-runner --seed 12345 --ticks 60 --realtime
//!   shelter-runner --seed 12345 --ipc-mode

use anyhow::Result;
use shelter_core::{
    command::{CommandOutcome, PlayerCommand},
    config::ShelterConfig,
    engine::SimEngine,
    resource::{ResourceBundle, ResourceKind},
    store::{SaveStore, SlotInfo},
    types::Tick,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Command { command: PlayerCommand },
    Save { slot: u32, name: String },
    Load { slot: u32 },
    ListSlots,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    tick:           Tick,
    paused:         bool,
    game_time:      f64,
    population:     u32,
    max_population: u32,
    resources:      ResourceBundle,
    limits:         ResourceBundle,
    per_second:     ResourceBundle,
    facilities:     usize,
    constructing:   usize,
    research:       Option<String>,
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum IpcReply {
    State(UiState),
    Outcome { outcome: CommandOutcome, state: UiState },
    Slots { slots: Vec<SlotInfo> },
    Error { error: String },
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 300u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let realtime = args.iter().any(|a| a == "--realtime");
    let db = string_arg(&args, "--db", ":memory:");
    let data_dir = string_arg(&args, "--data-dir", "./data");

    if !ipc_mode {
        println!("Shelter: shelter-runner");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let store = if db == ":memory:" { SaveStore::in_memory()? } else { SaveStore::open(db)? };
    store.migrate()?;

    let config = ShelterConfig::load(data_dir)?;
    let mut engine = SimEngine::build(seed, config);

    if ipc_mode {
        run_ipc_loop(&mut engine, &store)?;
    } else {
        if realtime {
            run_realtime(&mut engine, ticks)?;
        } else {
            engine.run_ticks(ticks)?;
        }
        let snapshot = engine.snapshot(&format!("autosave-{seed}"));
        store.autosave(&snapshot)?;
        print_summary(&engine, ticks);

        let saved_at = chrono::DateTime::from_timestamp_millis(snapshot.saved_at)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| snapshot.saved_at.to_string());
        println!();
        println!("  autosaved to slot 0 at {saved_at}");
    }

    Ok(())
}

/// Tick at the clock's speed, sleeping between steps. A tick starts only
/// after the previous one has returned.
fn run_realtime(engine: &mut SimEngine, ticks: u64) -> Result<()> {
    engine.clock.resume();
    for _ in 0..ticks {
        let per_second = engine.clock.ticks_per_real_second().max(1);
        std::thread::sleep(Duration::from_millis(1000 / u64::from(per_second)));
        engine.tick(shelter_core::clock::TICK_DELTA)?;
    }
    engine.clock.pause();
    Ok(())
}

fn run_ipc_loop(engine: &mut SimEngine, store: &SaveStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let reply = match serde_json::from_str::<IpcCommand>(&buffer) {
            Ok(IpcCommand::Quit) => break,
            Ok(cmd) => handle_ipc(engine, store, cmd),
            Err(e) => IpcReply::Error { error: e.to_string() },
        };
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Failures become error replies; the loop keeps serving.
fn handle_ipc(engine: &mut SimEngine, store: &SaveStore, cmd: IpcCommand) -> IpcReply {
    dispatch(engine, store, cmd).unwrap_or_else(|e| {
        log::warn!("ipc: {e}");
        IpcReply::Error { error: e.to_string() }
    })
}

fn dispatch(engine: &mut SimEngine, store: &SaveStore, cmd: IpcCommand) -> Result<IpcReply> {
    match cmd {
        IpcCommand::GetState => Ok(IpcReply::State(build_ui_state(engine))),
        IpcCommand::Tick { count } => {
            engine.run_ticks(count)?;
            Ok(IpcReply::State(build_ui_state(engine)))
        }
        IpcCommand::Command { command } => {
            let outcome = engine.apply_command(command)?;
            Ok(IpcReply::Outcome { outcome, state: build_ui_state(engine) })
        }
        IpcCommand::Save { slot, name } => {
            store.save_slot(slot, &engine.snapshot(&name))?;
            Ok(IpcReply::Slots { slots: store.list_slots()? })
        }
        IpcCommand::Load { slot } => {
            let snapshot = store
                .load_slot(slot)?
                .ok_or_else(|| anyhow::anyhow!("slot {slot} is empty"))?;
            engine.restore(snapshot)?;
            Ok(IpcReply::State(build_ui_state(engine)))
        }
        IpcCommand::ListSlots => Ok(IpcReply::Slots { slots: store.list_slots()? }),
        IpcCommand::Quit => Ok(IpcReply::State(build_ui_state(engine))),
    }
}

fn build_ui_state(engine: &SimEngine) -> UiState {
    let state = &engine.state;
    UiState {
        tick:           state.tick,
        paused:         engine.clock.paused,
        game_time:      state.game_time,
        population:     state.population,
        max_population: state.max_population,
        resources:      state.resources,
        limits:         state.resource_limits,
        per_second:     state.resources_per_second,
        facilities:     state.facilities.len(),
        constructing:   state.facilities.iter().filter(|f| f.is_building).count(),
        research:       state.active_research.clone(),
    }
}

fn print_summary(engine: &SimEngine, ticks: u64) {
    let state = &engine.state;

    println!("=== RUN SUMMARY ===");
    println!("  ticks run:      {ticks}");
    println!("  final tick:     {}", state.tick);
    println!("  game time:      {:.0}s", state.game_time);
    println!("  population:     {}/{}", state.population, state.max_population);
    println!("  facilities:     {}", state.facilities.len());

    println!();
    println!("=== LEDGER ===");
    for kind in ResourceKind::ALL {
        println!(
            "  {:<11} {:>9.1} / {:<9.0} ({:+.3}/s)",
            kind.name(),
            state.resources.get(kind),
            state.resource_limits.get(kind),
            state.resources_per_second.get(kind),
        );
    }

    println!();
    println!("=== RESIDENTS ===");
    for r in &state.residents {
        println!(
            "  {:<28} health {:>5.1} | happiness {:>5.1} | {}",
            r.name,
            r.health,
            r.happiness,
            r.assigned_facility.as_deref().unwrap_or("idle"),
        );
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .unwrap_or(default)
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
