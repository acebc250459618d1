//! Hazard schedule: scripted obstacles that drive the pursuit in a headless run.
//!
//! A seeded ChaCha8 stream decides when the runner clips an obstacle and what
//! kind it was, so the same seed always replays the same run.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use runner_core::commands::PursuitCommand;
use runner_core::constants::TICK_RATE;

/// What the runner ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Small obstacle: a temporary scare, or a hit if a chase is on.
    MinorObstacle,
    /// Something loud enough to wake the chaser for good.
    ChaserWakes,
    /// Stumble during a chase.
    Stumble,
    /// Run-ending obstacle.
    FatalObstacle,
}

impl HazardKind {
    pub fn command(self) -> PursuitCommand {
        match self {
            HazardKind::MinorObstacle => PursuitCommand::StartTemporaryChase,
            HazardKind::ChaserWakes => PursuitCommand::StartContinuousChase,
            HazardKind::Stumble => PursuitCommand::NotifyHitWhileChasing,
            HazardKind::FatalObstacle => PursuitCommand::TriggerFatalCapture,
        }
    }
}

/// Spacing and mix of generated hazards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardDensity {
    /// Shortest gap between two hazards (seconds).
    pub min_gap_secs: f32,
    /// Longest gap between two hazards (seconds).
    pub max_gap_secs: f32,
    /// Whether a fatal obstacle can appear.
    pub allow_fatal: bool,
}

impl Default for HazardDensity {
    fn default() -> Self {
        Self {
            min_gap_secs: 1.5,
            max_gap_secs: 6.0,
            allow_fatal: false,
        }
    }
}

/// A single scheduled hazard.
#[derive(Debug, Clone)]
pub struct HazardEntry {
    /// Tick at which the runner hits it.
    pub fire_at_tick: u64,
    pub kind: HazardKind,
    pub fired: bool,
}

/// Ordered hazards for one run.
#[derive(Debug, Clone, Default)]
pub struct HazardSchedule {
    pub entries: Vec<HazardEntry>,
}

impl HazardSchedule {
    /// Generate hazards covering `total_ticks`.
    pub fn generate(seed: u64, total_ticks: u64, density: HazardDensity) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let min_gap = density.min_gap_secs.max(1.0 / TICK_RATE as f32);
        let max_gap = density.max_gap_secs.max(min_gap);

        let mut entries = Vec::new();
        let mut at = 0u64;
        loop {
            let gap_secs = if max_gap > min_gap {
                rng.gen_range(min_gap..max_gap)
            } else {
                min_gap
            };
            at += ((gap_secs * TICK_RATE as f32).round() as u64).max(1);
            if at >= total_ticks {
                break;
            }
            entries.push(HazardEntry {
                fire_at_tick: at,
                kind: pick_kind(&mut rng, density.allow_fatal),
                fired: false,
            });
        }

        Self { entries }
    }

    /// Commands for every hazard due at `current_tick` that hasn't fired yet.
    pub fn due(&mut self, current_tick: u64) -> Vec<PursuitCommand> {
        let mut commands = Vec::new();
        for entry in &mut self.entries {
            if !entry.fired && current_tick >= entry.fire_at_tick {
                entry.fired = true;
                commands.push(entry.kind.command());
            }
        }
        commands
    }

    pub fn remaining(&self) -> usize {
        self.entries.iter().filter(|e| !e.fired).count()
    }

    pub fn count(&self, kind: HazardKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

fn pick_kind(rng: &mut ChaCha8Rng, allow_fatal: bool) -> HazardKind {
    let roll: f32 = rng.gen();
    match roll {
        r if r < 0.45 => HazardKind::MinorObstacle,
        r if r < 0.65 => HazardKind::ChaserWakes,
        r if r < 0.95 || !allow_fatal => HazardKind::Stumble,
        _ => HazardKind::FatalObstacle,
    }
}
