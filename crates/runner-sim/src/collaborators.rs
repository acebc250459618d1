//! Interfaces the pursuit controller consumes from the rest of the game.

use glam::Vec3;

use runner_core::types::TargetPose;
use runner_pursuit::pose::ground_forward;

pub use runner_pursuit::ViewTest;

/// The runner being chased, as seen by the pursuit subsystem.
pub trait Target {
    fn position(&self) -> Vec3;
    fn forward(&self) -> Vec3;
    fn current_speed(&self) -> f32;
    /// Called once when the continuous chase catches the runner.
    /// Game-over handling belongs to the implementor.
    fn notify_captured(&mut self);

    /// Snapshot of the values read each tick.
    fn pose(&self) -> TargetPose {
        TargetPose::new(
            self.position(),
            ground_forward(self.forward()),
            self.current_speed(),
        )
    }
}
