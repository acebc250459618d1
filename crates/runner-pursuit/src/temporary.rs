//! Temporary chase: a short scare that ends in a retreat.
//!
//! Roar at the spawn point, run up to `stop_distance` behind the runner,
//! loosely follow there for `display_duration`, then complete so the
//! controller can hand the chaser to a `RetreatManeuver`.

use log::debug;

use runner_core::config::TemporaryTuning;
use runner_core::enums::AnimationIntent;
use runner_core::types::{Pose, TargetPose};

use crate::pose::{behind, facing_rotation, look_at, move_towards, smooth_toward, turn_towards};
use crate::ManeuverStatus;

/// Distance to the holding point that counts as arrived.
const HOLD_ARRIVAL_EPSILON: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TemporaryPhase {
    Roaring { remaining: f32 },
    Approach { elapsed: f32 },
    Linger { remaining: f32 },
    Done,
}

/// Resumable state of one temporary chase.
#[derive(Debug, Clone)]
pub struct TemporaryChaseManeuver {
    tuning: TemporaryTuning,
    turn_rate: f32,
    phase: TemporaryPhase,
}

impl TemporaryChaseManeuver {
    /// Start from the spawn step. Returns the maneuver and the pose to place the chaser at.
    pub fn start(tuning: TemporaryTuning, turn_rate: f32, target: &TargetPose) -> (Self, Pose) {
        let spawn = Pose::new(
            behind(target, tuning.spawn_distance),
            facing_rotation(target.forward),
        );
        let phase = if tuning.roar_duration > 0.0 {
            TemporaryPhase::Roaring {
                remaining: tuning.roar_duration,
            }
        } else {
            TemporaryPhase::Approach { elapsed: 0.0 }
        };
        let maneuver = Self {
            tuning,
            turn_rate,
            phase,
        };
        (maneuver, spawn)
    }

    /// Distance the chaser holds at; the follow-up retreat measures from here.
    pub fn stop_distance(&self) -> f32 {
        self.tuning.stop_distance
    }

    pub fn is_lingering(&self) -> bool {
        matches!(self.phase, TemporaryPhase::Linger { .. })
    }

    pub fn animation(&self) -> AnimationIntent {
        match self.phase {
            TemporaryPhase::Roaring { .. } => AnimationIntent::Roaring,
            TemporaryPhase::Approach { .. } | TemporaryPhase::Linger { .. } => {
                AnimationIntent::Running
            }
            TemporaryPhase::Done => AnimationIntent::Idle,
        }
    }

    pub fn tick(&mut self, dt: f32, chaser: &mut Pose, target: &TargetPose) -> ManeuverStatus {
        let hold_point = behind(target, self.tuning.stop_distance);
        match self.phase {
            TemporaryPhase::Roaring { remaining } => {
                if let Some(heading) = look_at(chaser.position, target.position) {
                    chaser.facing = turn_towards(chaser.facing, heading, self.turn_rate, dt);
                }
                let remaining = remaining - dt;
                self.phase = if remaining <= 0.0 {
                    TemporaryPhase::Approach { elapsed: 0.0 }
                } else {
                    TemporaryPhase::Roaring { remaining }
                };
                ManeuverStatus::Continue
            }
            TemporaryPhase::Approach { elapsed } => {
                let elapsed = elapsed + dt;
                let next = move_towards(chaser.position, hold_point, self.tuning.run_speed * dt);
                if let Some(heading) = look_at(chaser.position, next) {
                    chaser.facing = turn_towards(chaser.facing, heading, self.turn_rate, dt);
                }
                chaser.position = next;

                let within = target.distance_to(next) <= self.tuning.stop_distance
                    || next.distance(hold_point) <= HOLD_ARRIVAL_EPSILON;
                if within || elapsed >= self.tuning.approach_timeout {
                    debug!("temporary chase holding after {elapsed:.2}s");
                    self.phase = TemporaryPhase::Linger {
                        remaining: self.tuning.display_duration,
                    };
                } else {
                    self.phase = TemporaryPhase::Approach { elapsed };
                }
                ManeuverStatus::Continue
            }
            TemporaryPhase::Linger { remaining } => {
                chaser.position = smooth_toward(
                    chaser.position,
                    hold_point,
                    self.tuning.follow_smoothing * dt,
                );
                chaser.facing = turn_towards(
                    chaser.facing,
                    facing_rotation(target.forward),
                    self.turn_rate,
                    dt,
                );
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.phase = TemporaryPhase::Done;
                    ManeuverStatus::Complete
                } else {
                    self.phase = TemporaryPhase::Linger { remaining };
                    ManeuverStatus::Continue
                }
            }
            TemporaryPhase::Done => ManeuverStatus::Complete,
        }
    }
}
