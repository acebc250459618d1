//! Game loop thread: runs the pursuit engine at the fixed tick rate.
//!
//! The engine is created inside this thread; its observers and view test
//! are not `Send`. Commands arrive via an `mpsc` channel, scripted hazards
//! come from the `HazardSchedule`, and every snapshot is stored in shared
//! state for polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::Serialize;

use runner_core::constants::TICK_RATE;
use runner_core::enums::PursuitState;
use runner_core::events::PursuitEvent;
use runner_core::state::PursuitSnapshot;
use runner_sim::engine::{RunnerEngine, SimConfig};

use crate::scenario::HazardSchedule;
use crate::state::GameLoopCommand;

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    /// Stop after this many loop iterations. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
    /// Sleep between ticks to match wall-clock time.
    pub realtime: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            max_ticks: Some(60 * TICK_RATE as u64),
            realtime: false,
        }
    }
}

/// Event tallies for one run, returned when the loop exits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoopSummary {
    pub ticks: u64,
    pub captures: u32,
    pub disappearances: u32,
    pub capture_sequences: u32,
    pub state_changes: u32,
    pub chases_started: u32,
    pub temporary_chases_started: u32,
    pub final_state: PursuitState,
}

impl LoopSummary {
    fn record(&mut self, snapshot: &PursuitSnapshot) {
        self.ticks += 1;
        self.final_state = snapshot.state;
        for event in &snapshot.events {
            match event {
                PursuitEvent::Captured => self.captures += 1,
                PursuitEvent::EntityDisappeared => self.disappearances += 1,
                PursuitEvent::CaptureSequenceFinished => self.capture_sequences += 1,
                PursuitEvent::StateChanged { to, .. } => {
                    self.state_changes += 1;
                    match to {
                        PursuitState::Chasing => self.chases_started += 1,
                        PursuitState::TemporaryChasing => self.temporary_chases_started += 1,
                        _ => {}
                    }
                }
                PursuitEvent::AnimationChanged { .. } => {}
            }
        }
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the handle that yields the run summary.
pub fn spawn_game_loop(
    config: SimConfig,
    schedule: HazardSchedule,
    options: LoopOptions,
    latest_snapshot: Arc<Mutex<Option<PursuitSnapshot>>>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<LoopSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("runner-game-loop".into())
        .spawn(move || run_game_loop(config, schedule, options, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, channel disconnect, or the tick limit.
fn run_game_loop(
    config: SimConfig,
    mut schedule: HazardSchedule,
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<PursuitSnapshot>>,
) -> LoopSummary {
    let mut engine = RunnerEngine::new(config);
    engine.subscribe(|event| debug!("pursuit event: {event:?}"));
    let mut summary = LoopSummary::default();
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Command(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => return finish(summary),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return finish(summary),
            }
        }

        // 2. Scripted hazards due this tick
        engine.queue_commands(schedule.due(engine.time().tick));

        // 3. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        summary.record(&snapshot);

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if options.max_ticks.is_some_and(|max| summary.ticks >= max) {
            return finish(summary);
        }
        if !options.realtime {
            continue;
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale as f64)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

fn finish(summary: LoopSummary) -> LoopSummary {
    info!(
        "game loop stopped after {} ticks in {:?}",
        summary.ticks, summary.final_state
    );
    summary
}
