//! Pursuit snapshot: the visible state handed to presentation layers each tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::{AnimationIntent, PursuitState};
use crate::events::PursuitEvent;
use crate::types::{SimTime, TargetPose};

/// Complete pursuit state produced after each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PursuitSnapshot {
    pub time: SimTime,
    pub paused: bool,
    pub state: PursuitState,
    pub runner: TargetPose,
    pub chaser: Option<ChaserView>,
    /// Present only while `Chasing`.
    pub contest: Option<ContestView>,
    /// Events fired since the previous snapshot, oldest first.
    pub events: Vec<PursuitEvent>,
}

/// The chaser as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaserView {
    pub position: Vec3,
    pub facing: Quat,
    pub animation: AnimationIntent,
    /// Straight-line distance to the runner.
    pub distance_to_runner: f32,
}

/// Distance contest values for the UI danger meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContestView {
    pub current_distance: f32,
    pub safe_timer: f32,
    pub catch_distance: f32,
    pub max_distance: f32,
}

impl ContestView {
    /// 0.0 at max distance, 1.0 at catch distance.
    pub fn danger(&self) -> f32 {
        let span = self.max_distance - self.catch_distance;
        if span <= 0.0 {
            return 1.0;
        }
        (1.0 - (self.current_distance - self.catch_distance) / span).clamp(0.0, 1.0)
    }
}
