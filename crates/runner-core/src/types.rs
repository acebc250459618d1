//! Fundamental geometric and simulation types.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space pose of an entity.
/// x = right, y = up, z = forward along the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub facing: Quat,
}

/// Read-only view of the target for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPose {
    pub position: Vec3,
    /// Unit forward direction on the ground plane.
    pub forward: Vec3,
    /// Forward speed (units/s).
    pub speed: f32,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, facing: Quat) -> Self {
        Self { position, facing }
    }

    /// Pose at `position` looking along `+Z`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            facing: Quat::IDENTITY,
        }
    }

    /// Direction the pose is facing.
    pub fn forward(&self) -> Vec3 {
        self.facing * Vec3::Z
    }
}

impl Default for TargetPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
            speed: 0.0,
        }
    }
}

impl TargetPose {
    pub fn new(position: Vec3, forward: Vec3, speed: f32) -> Self {
        Self {
            position,
            forward,
            speed,
        }
    }

    /// Straight-line distance from the target to `point`.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f32 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += f64::from(self.dt());
    }
}
