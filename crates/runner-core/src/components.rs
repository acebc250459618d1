//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behavior.
//! `Pose` and `AnimationIntent` are also attached to the chaser directly.

use serde::{Deserialize, Serialize};

/// Marks the pursuing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chaser {
    /// Template the entity was spawned from.
    pub template: String,
    /// Tick on which the entity was spawned or adopted.
    pub spawned_tick: u64,
}
