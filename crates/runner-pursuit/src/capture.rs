//! Fatal capture cut-scene.
//!
//! The chaser spawns far behind the runner, runs to a point just behind
//! it (shifted by an offset in the runner's local frame), snaps into the
//! final pose and blends from running to idle. The approach is capped at
//! `max_duration` so the cut-scene length is bounded no matter how the
//! runner moves.

use glam::Vec3;

use runner_core::config::CaptureTuning;
use runner_core::enums::AnimationIntent;
use runner_core::types::{Pose, TargetPose};

use crate::pose::{behind, facing_rotation, local_to_world, look_at, move_towards, turn_towards};
use crate::ManeuverStatus;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CapturePhase {
    Approach,
    Settling { remaining: f32 },
    Done,
}

/// Resumable state of one capture cut-scene.
#[derive(Debug, Clone)]
pub struct CaptureManeuver {
    tuning: CaptureTuning,
    turn_rate: f32,
    speed: f32,
    elapsed: f32,
    phase: CapturePhase,
}

/// Capture point for the current target pose.
pub fn capture_point(tuning: &CaptureTuning, target: &TargetPose) -> Vec3 {
    behind(target, tuning.stop_distance) + local_to_world(target, tuning.local_offset)
}

impl CaptureManeuver {
    /// Start a capture. Returns the maneuver and the pose to spawn the chaser at.
    ///
    /// The run speed is raised when the runner's current speed would otherwise
    /// stretch the approach past `max_duration`.
    pub fn start(tuning: CaptureTuning, turn_rate: f32, target: &TargetPose) -> (Self, Pose) {
        let spawn = Pose::new(
            behind(target, tuning.spawn_distance),
            facing_rotation(target.forward),
        );
        let gap = spawn.position.distance(capture_point(&tuning, target));
        let needed = if tuning.max_duration > 0.0 {
            target.speed.max(0.0) + gap / tuning.max_duration
        } else {
            0.0
        };
        let maneuver = Self {
            tuning,
            turn_rate,
            speed: tuning.run_speed.max(needed),
            elapsed: 0.0,
            phase: CapturePhase::Approach,
        };
        (maneuver, spawn)
    }

    /// Effective run speed chosen at start.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.phase, CapturePhase::Settling { .. })
    }

    pub fn animation(&self) -> AnimationIntent {
        match self.phase {
            CapturePhase::Approach => AnimationIntent::Running,
            CapturePhase::Settling { .. } | CapturePhase::Done => AnimationIntent::Idle,
        }
    }

    pub fn tick(&mut self, dt: f32, chaser: &mut Pose, target: &TargetPose) -> ManeuverStatus {
        match self.phase {
            CapturePhase::Approach => {
                self.elapsed += dt;
                let goal = capture_point(&self.tuning, target);
                let next = move_towards(chaser.position, goal, self.speed * dt);
                if let Some(heading) = look_at(chaser.position, next) {
                    chaser.facing = turn_towards(chaser.facing, heading, self.turn_rate, dt);
                }
                chaser.position = next;

                let arrived = next.distance(goal) <= self.tuning.arrival_tolerance;
                if arrived || self.elapsed >= self.tuning.max_duration {
                    self.snap(chaser, target);
                    if self.tuning.blend_delay <= 0.0 {
                        self.phase = CapturePhase::Done;
                        return ManeuverStatus::Complete;
                    }
                    self.phase = CapturePhase::Settling {
                        remaining: self.tuning.blend_delay,
                    };
                }
                ManeuverStatus::Continue
            }
            CapturePhase::Settling { remaining } => {
                self.elapsed += dt;
                self.snap(chaser, target);
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.phase = CapturePhase::Done;
                    ManeuverStatus::Complete
                } else {
                    self.phase = CapturePhase::Settling { remaining };
                    ManeuverStatus::Continue
                }
            }
            CapturePhase::Done => ManeuverStatus::Complete,
        }
    }

    /// Pin the chaser to the exact capture point, facing the runner.
    fn snap(&self, chaser: &mut Pose, target: &TargetPose) {
        chaser.position = capture_point(&self.tuning, target);
        chaser.facing = look_at(chaser.position, target.position)
            .unwrap_or_else(|| facing_rotation(target.forward));
    }
}
