//! Chaser maneuvers for the lane-runner pursuit subsystem.
//!
//! Each maneuver is a resumable state object with a `tick` method that the
//! owning controller calls once per frame. Maneuvers operate on plain data
//! (a chaser `Pose` and a `TargetPose`) and know nothing about entities.

pub mod capture;
pub mod distance;
pub mod pose;
pub mod retreat;
pub mod temporary;

pub use capture::CaptureManeuver;
pub use distance::DistanceDynamics;
pub use retreat::{RetreatManeuver, ViewTest};
pub use temporary::TemporaryChaseManeuver;

pub use runner_core as core;

/// Result of ticking a maneuver once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverStatus {
    /// Still running; tick again next frame.
    Continue,
    /// Finished; the controller performs the follow-up transition.
    Complete,
}

#[cfg(test)]
mod tests;
