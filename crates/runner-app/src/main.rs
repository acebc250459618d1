use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use runner_app::core::commands::PursuitCommand;
use runner_app::core::config::PursuitConfig;
use runner_app::core::constants::TICK_RATE;
use runner_app::game_loop::LoopOptions;
use runner_app::init_logging;
use runner_app::scenario::{HazardDensity, HazardSchedule};
use runner_app::sim::engine::SimConfig;
use runner_app::state::Session;

/// Headless lane-runner pursuit simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 60 * TICK_RATE as u64)]
    ticks: u64,

    /// Seed for the hazard schedule
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// JSON pursuit tuning; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Allow run-ending obstacles in the hazard schedule
    #[arg(long)]
    fatal: bool,

    /// Runner speed in units per second
    #[arg(long)]
    runner_speed: Option<f32>,

    /// Pace ticks to wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Read JSON pursuit commands from stdin, one per line, instead of
    /// generating hazards (implies --realtime)
    #[arg(short, long)]
    interactive: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: Option<&Path>) -> Result<PursuitConfig> {
    let Some(path) = path else {
        return Ok(PursuitConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading pursuit config {}", path.display()))?;
    PursuitConfig::from_json_str(&text)
        .with_context(|| format!("parsing pursuit config {}", path.display()))
}

/// Forward stdin commands until EOF. Bad lines are logged and skipped.
fn pump_stdin(session: &Session) -> Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<PursuitCommand>(line) {
            Ok(command) => {
                if session.send_command(command).is_err() {
                    info!("game loop already stopped; ignoring further input");
                    break;
                }
            }
            Err(err) => warn!("skipping malformed command {line:?}: {err}"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let pursuit = load_config(args.config.as_deref())?;
    let mut config = SimConfig {
        pursuit,
        ..SimConfig::default()
    };
    if let Some(speed) = args.runner_speed {
        config.runner_speed = speed.max(0.0);
    }

    let schedule = if args.interactive {
        HazardSchedule::default()
    } else {
        let density = HazardDensity {
            allow_fatal: args.fatal,
            ..HazardDensity::default()
        };
        HazardSchedule::generate(args.seed, args.ticks, density)
    };
    info!(
        "simulating {} ticks with {} scripted hazards (seed {})",
        args.ticks,
        schedule.entries.len(),
        args.seed
    );

    // Typed commands need wall-clock pacing to land mid-run.
    let options = LoopOptions {
        max_ticks: Some(args.ticks),
        realtime: args.realtime || args.interactive,
    };
    let mut session = Session::new();
    session.start(config, schedule, options)?;
    if args.interactive {
        pump_stdin(&session)?;
    }
    let summary = session.finish()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} ticks: {} chases, {} temporary chases, {} captures, {} disappearances, {} capture sequences; ended {:?}",
            summary.ticks,
            summary.chases_started,
            summary.temporary_chases_started,
            summary.captures,
            summary.disappearances,
            summary.capture_sequences,
            summary.final_state,
        );
    }
    Ok(())
}
