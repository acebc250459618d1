//! Commands sent from gameplay code to the pursuit engine.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::Pose;

/// All actions the game can request from the pursuit subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PursuitCommand {
    // --- Pursuit control ---
    /// Begin the continuous distance contest.
    StartContinuousChase,
    /// End the continuous chase and remove the chaser.
    StopContinuousChase,
    /// Start a scripted scare (counts as a hit during a continuous chase).
    StartTemporaryChase,
    /// The runner hit a minor hazard while being chased.
    NotifyHitWhileChasing,
    /// The runner died: play the capture cut-scene.
    TriggerFatalCapture,
    /// Take over a chaser placed by the intro sequence and start chasing.
    AdoptExternalChaser { pose: Pose },
    /// Park the chaser at a narrative position without chasing.
    PlaceChaser { pose: Pose },

    // --- Runner control ---
    /// Change the runner's forward speed (units/s).
    SetRunnerSpeed { speed: f32 },

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, 0.0 = paused).
    SetTimeScale { scale: f32 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
