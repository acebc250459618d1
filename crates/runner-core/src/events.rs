//! Notifications emitted by the pursuit subsystem for UI, audio and camera.

use serde::{Deserialize, Serialize};

use crate::enums::{AnimationIntent, PursuitState};

/// Fired synchronously at the point of the transition that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PursuitEvent {
    /// The continuous chase caught the runner.
    Captured,
    /// The chaser was removed from the world.
    EntityDisappeared,
    /// The capture cut-scene reached its final pose.
    CaptureSequenceFinished,
    /// The pursuit state changed.
    StateChanged {
        from: PursuitState,
        to: PursuitState,
    },
    /// The chaser's animation should change.
    AnimationChanged { intent: AnimationIntent },
}
