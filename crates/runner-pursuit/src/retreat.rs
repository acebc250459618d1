//! Retreat: the chaser backs off with decaying speed until it leaves view.

use glam::Vec3;
use log::debug;

use runner_core::config::RetreatTuning;
use runner_core::enums::AnimationIntent;
use runner_core::types::{Pose, TargetPose};

use crate::pose::{ground_forward, look_at, turn_towards};
use crate::ManeuverStatus;

/// Reports whether a world position is outside the current view frustum.
pub trait ViewTest {
    fn is_off_screen(&self, point: Vec3) -> bool;
}

impl<F> ViewTest for F
where
    F: Fn(Vec3) -> bool,
{
    fn is_off_screen(&self, point: Vec3) -> bool {
        self(point)
    }
}

/// Why a retreat stopped fleeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetreatExit {
    OffScreen,
    FallbackDistance,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RetreatPhase {
    Fleeing,
    Vanishing { remaining: f32 },
    Done,
}

/// Resumable state of one retreat.
#[derive(Debug, Clone)]
pub struct RetreatManeuver {
    tuning: RetreatTuning,
    stop_distance: f32,
    turn_rate: f32,
    speed: f32,
    elapsed: f32,
    exit: Option<RetreatExit>,
    phase: RetreatPhase,
}

impl RetreatManeuver {
    /// `stop_distance` is the distance the chaser was holding before retreating;
    /// the fallback exit fires at `stop_distance + fallback_extra_distance`.
    pub fn new(tuning: RetreatTuning, stop_distance: f32, turn_rate: f32) -> Self {
        Self {
            tuning,
            stop_distance,
            turn_rate,
            speed: tuning.start_speed,
            elapsed: 0.0,
            exit: None,
            phase: RetreatPhase::Fleeing,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Set once the chaser stops fleeing.
    pub fn exit(&self) -> Option<RetreatExit> {
        self.exit
    }

    pub fn fallback_distance(&self) -> f32 {
        self.stop_distance + self.tuning.fallback_extra_distance
    }

    pub fn animation(&self) -> AnimationIntent {
        match self.phase {
            RetreatPhase::Fleeing => AnimationIntent::Running,
            RetreatPhase::Vanishing { .. } | RetreatPhase::Done => AnimationIntent::Idle,
        }
    }

    /// Complete means the chaser should be despawned now.
    pub fn tick(
        &mut self,
        dt: f32,
        chaser: &mut Pose,
        target: &TargetPose,
        view: Option<&dyn ViewTest>,
    ) -> ManeuverStatus {
        match self.phase {
            RetreatPhase::Fleeing => {
                self.elapsed += dt;
                self.speed = (self.speed - self.tuning.deceleration * dt).max(self.tuning.min_speed);

                let backward = -ground_forward(target.forward);
                chaser.position += backward * self.speed * dt;
                if let Some(heading) = look_at(chaser.position, target.position) {
                    chaser.facing = turn_towards(chaser.facing, heading, self.turn_rate, dt);
                }

                let Some(exit) = self.check_exit(chaser.position, target, view) else {
                    return ManeuverStatus::Continue;
                };
                debug!(
                    "retreat exit {exit:?} after {:.2}s at distance {:.1}",
                    self.elapsed,
                    target.distance_to(chaser.position)
                );
                self.exit = Some(exit);
                if self.tuning.vanish_delay <= 0.0 {
                    self.phase = RetreatPhase::Done;
                    return ManeuverStatus::Complete;
                }
                self.phase = RetreatPhase::Vanishing {
                    remaining: self.tuning.vanish_delay,
                };
                ManeuverStatus::Continue
            }
            RetreatPhase::Vanishing { remaining } => {
                self.elapsed += dt;
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.phase = RetreatPhase::Done;
                    ManeuverStatus::Complete
                } else {
                    self.phase = RetreatPhase::Vanishing { remaining };
                    ManeuverStatus::Continue
                }
            }
            RetreatPhase::Done => ManeuverStatus::Complete,
        }
    }

    fn check_exit(
        &self,
        position: Vec3,
        target: &TargetPose,
        view: Option<&dyn ViewTest>,
    ) -> Option<RetreatExit> {
        let seen_out = match view {
            Some(view) => view.is_off_screen(position).then_some(RetreatExit::OffScreen),
            None => (target.distance_to(position) > self.fallback_distance())
                .then_some(RetreatExit::FallbackDistance),
        };
        seen_out.or_else(|| (self.elapsed > self.tuning.timeout_secs).then_some(RetreatExit::Timeout))
    }
}
