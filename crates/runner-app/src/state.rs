//! Session state shared between the driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use log::debug;

use runner_core::commands::PursuitCommand;
use runner_core::state::PursuitSnapshot;
use runner_sim::engine::SimConfig;

use crate::game_loop::{self, LoopOptions, LoopSummary};
use crate::scenario::HazardSchedule;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A pursuit command to forward to the engine.
    Command(PursuitCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// One running simulation.
///
/// The engine itself stays on the loop thread; the session only holds the
/// channel into it and the latest snapshot it published.
pub struct Session {
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    latest_snapshot: Arc<Mutex<Option<PursuitSnapshot>>>,
    handle: Option<JoinHandle<LoopSummary>>,
    /// The running loop stops by itself at its tick limit.
    bounded: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            handle: None,
            bounded: false,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the game loop. Fails if this session already started one.
    pub fn start(
        &mut self,
        config: SimConfig,
        schedule: HazardSchedule,
        options: LoopOptions,
    ) -> Result<()> {
        if self.handle.is_some() {
            return Err(anyhow!("simulation already running"));
        }
        let (cmd_tx, handle) = game_loop::spawn_game_loop(
            config,
            schedule,
            options,
            Arc::clone(&self.latest_snapshot),
        )
        .context("failed to spawn game loop thread")?;

        let mut tx_lock = self
            .command_tx
            .lock()
            .map_err(|e| anyhow!("command channel poisoned: {e}"))?;
        *tx_lock = Some(cmd_tx);
        self.handle = Some(handle);
        self.bounded = options.max_ticks.is_some();
        Ok(())
    }

    /// Forward a pursuit command to the running loop.
    pub fn send_command(&self, command: PursuitCommand) -> Result<()> {
        self.send(GameLoopCommand::Command(command))
    }

    /// Latest published snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> Result<Option<PursuitSnapshot>> {
        let lock = self
            .latest_snapshot
            .lock()
            .map_err(|e| anyhow!("snapshot poisoned: {e}"))?;
        Ok(lock.clone())
    }

    /// End the run and collect its summary.
    ///
    /// A bounded run is left to reach its tick limit; an unbounded one is
    /// told to shut down first.
    pub fn finish(&mut self) -> Result<LoopSummary> {
        if !self.bounded {
            self.request_shutdown()?;
        }
        self.wait()
    }

    /// Block until the loop thread exits on its own.
    pub fn wait(&mut self) -> Result<LoopSummary> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("simulation not started"))?;
        handle
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))
    }

    fn request_shutdown(&self) -> Result<()> {
        let tx_lock = self
            .command_tx
            .lock()
            .map_err(|e| anyhow!("command channel poisoned: {e}"))?;
        let tx = tx_lock
            .as_ref()
            .ok_or_else(|| anyhow!("simulation not started"))?;
        if tx.send(GameLoopCommand::Shutdown).is_err() {
            // Receiver dropped: the loop has already returned.
            debug!("game loop already stopped before shutdown request");
        }
        Ok(())
    }

    fn send(&self, command: GameLoopCommand) -> Result<()> {
        let tx_lock = self
            .command_tx
            .lock()
            .map_err(|e| anyhow!("command channel poisoned: {e}"))?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(command)
                .map_err(|e| anyhow!("failed to send command: {e}")),
            None => Err(anyhow!("simulation not started")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::HazardDensity;

    #[test]
    fn test_session_creation() {
        let session = Session::new();
        assert!(!session.is_running());
        assert!(session.snapshot().unwrap().is_none());
        assert!(session.send_command(PursuitCommand::Pause).is_err());
    }

    #[test]
    fn test_finish_without_start_fails() {
        let mut session = Session::new();
        assert!(session.finish().is_err());
    }

    #[test]
    fn test_bounded_run_publishes_snapshot() {
        let mut session = Session::new();
        let options = LoopOptions {
            max_ticks: Some(120),
            realtime: false,
        };
        session
            .start(SimConfig::default(), HazardSchedule::default(), options)
            .unwrap();
        assert!(session
            .start(SimConfig::default(), HazardSchedule::default(), options)
            .is_err());

        let summary = session.finish().unwrap();
        assert_eq!(summary.ticks, 120);
        let snapshot = session.snapshot().unwrap().unwrap();
        assert_eq!(snapshot.time.tick, 120);
    }

    #[test]
    fn test_finish_runs_seeded_hazards_to_the_tick_limit() {
        let ticks = 3_600;
        let mut session = Session::new();
        let schedule = HazardSchedule::generate(5, ticks, HazardDensity::default());
        assert!(!schedule.entries.is_empty());
        let options = LoopOptions {
            max_ticks: Some(ticks),
            realtime: false,
        };
        session
            .start(SimConfig::default(), schedule, options)
            .unwrap();

        let summary = session.finish().unwrap();
        assert_eq!(summary.ticks, ticks);
        assert!(summary.state_changes > 0);
        assert!(!session.is_running());
    }

    #[test]
    fn test_finish_stops_unbounded_run() {
        let mut session = Session::new();
        let options = LoopOptions {
            max_ticks: None,
            realtime: true,
        };
        session
            .start(SimConfig::default(), HazardSchedule::default(), options)
            .unwrap();
        session
            .send_command(PursuitCommand::StartContinuousChase)
            .unwrap();

        let summary = session.finish().unwrap();
        let published = session.snapshot().unwrap();
        assert_eq!(summary.ticks, published.map_or(0, |s| s.time.tick));
    }

    #[test]
    fn test_commands_after_bounded_run_fail() {
        let mut session = Session::new();
        let options = LoopOptions {
            max_ticks: Some(10),
            realtime: false,
        };
        session
            .start(SimConfig::default(), HazardSchedule::default(), options)
            .unwrap();
        let summary = session.wait().unwrap();
        assert_eq!(summary.ticks, 10);
        // Loop thread is gone, so its receiver is dropped.
        assert!(session.send_command(PursuitCommand::Pause).is_err());
    }
}
