//! Enumeration types used throughout the pursuit subsystem.

use serde::{Deserialize, Serialize};

/// Top-level pursuit state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuitState {
    /// No maneuver running.
    #[default]
    Idle,
    /// Continuous distance contest that ends in capture or escape.
    Chasing,
    /// Scripted scare: approach, linger, then retreat.
    TemporaryChasing,
    /// Scripted fatal capture cut-scene.
    Capturing,
    /// Decelerating exit until off screen.
    Retreating,
}

/// What the animation layer should be playing on the chaser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationIntent {
    #[default]
    Idle,
    Running,
    /// Intro roar played when a temporary chase spawns the chaser.
    Roaring,
}

/// Outcome of one distance-contest step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestOutcome {
    /// Contest continues.
    Ongoing,
    /// Distance reached the catch threshold.
    Caught,
    /// Distance reached the give-up threshold.
    Escaped,
}

impl PursuitState {
    /// Whether a maneuver is driving the chaser in this state.
    pub fn is_active(self) -> bool {
        !matches!(self, PursuitState::Idle)
    }
}
