//! Distance contest that drives the continuous chase.
//!
//! The logical pursuit distance shrinks slowly while the runner keeps
//! getting hit and grows once the runner has stayed clean for
//! `safe_duration` seconds. The chaser's visible position trails the
//! logical distance through exponential smoothing.

use runner_core::config::ChaseTuning;
use runner_core::enums::ContestOutcome;
use runner_core::state::ContestView;
use runner_core::types::{Pose, TargetPose};

use crate::pose::{behind, facing_rotation, smooth_toward, turn_towards};

/// Distance state for one continuous chase.
#[derive(Debug, Clone)]
pub struct DistanceDynamics {
    tuning: ChaseTuning,
    current_distance: f32,
    safe_timer: f32,
}

impl DistanceDynamics {
    /// Fresh contest at the configured start distance.
    pub fn new(tuning: ChaseTuning) -> Self {
        Self::with_distance(tuning, tuning.start_distance)
    }

    /// Contest starting from an arbitrary distance, clamped to `[0, max_distance]`.
    pub fn with_distance(tuning: ChaseTuning, distance: f32) -> Self {
        Self {
            tuning,
            current_distance: distance.clamp(0.0, tuning.max_distance),
            safe_timer: 0.0,
        }
    }

    pub fn current_distance(&self) -> f32 {
        self.current_distance
    }

    pub fn safe_timer(&self) -> f32 {
        self.safe_timer
    }

    /// Whether the runner has stayed clean long enough to pull away.
    pub fn is_safe(&self) -> bool {
        self.safe_timer >= self.tuning.safe_duration
    }

    /// A hit closes the gap and restarts the safe window.
    pub fn notify_hit(&mut self) {
        self.current_distance = (self.current_distance - self.tuning.acceleration_on_hit).max(0.0);
        self.safe_timer = 0.0;
    }

    /// Advance the numeric contest by `dt` without touching any pose.
    pub fn step(&mut self, dt: f32) -> ContestOutcome {
        let t = &self.tuning;
        self.safe_timer += dt;

        if self.is_safe() {
            self.current_distance += t.return_speed * dt;
        } else {
            let closed = self.current_distance - t.chase_speed * dt * t.close_factor;
            // A hit may already have pushed us inside the standoff; don't push back out.
            let floor = t.min_standoff.min(self.current_distance);
            self.current_distance = closed.max(floor);
        }

        self.current_distance = self.current_distance.max(0.0);

        if self.current_distance <= t.catch_distance {
            ContestOutcome::Caught
        } else if self.current_distance >= t.max_distance {
            self.current_distance = t.max_distance;
            ContestOutcome::Escaped
        } else {
            ContestOutcome::Ongoing
        }
    }

    /// Pull the chaser toward its trailing point, then advance the contest.
    pub fn tick(
        &mut self,
        dt: f32,
        chaser: &mut Pose,
        target: &TargetPose,
        turn_rate: f32,
    ) -> ContestOutcome {
        let goal = behind(target, self.current_distance);
        chaser.position = smooth_toward(chaser.position, goal, self.tuning.chase_speed * dt);
        chaser.facing = turn_towards(
            chaser.facing,
            facing_rotation(target.forward),
            turn_rate,
            dt,
        );
        self.step(dt)
    }

    pub fn view(&self) -> ContestView {
        ContestView {
            current_distance: self.current_distance,
            safe_timer: self.safe_timer,
            catch_distance: self.tuning.catch_distance,
            max_distance: self.tuning.max_distance,
        }
    }
}
