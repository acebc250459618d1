//! Minimal runner body used by the headless engine.
//!
//! Lane changes, jumps and slides live elsewhere; this only moves the
//! runner straight down the track at a configurable speed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collaborators::Target;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerBody {
    pub position: Vec3,
    pub forward: Vec3,
    pub speed: f32,
    /// Number of capture notifications received.
    pub captures: u32,
}

impl RunnerBody {
    pub fn new(position: Vec3, forward: Vec3, speed: f32) -> Self {
        Self {
            position,
            forward,
            speed,
            captures: 0,
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captures > 0
    }

    /// Integrate forward motion: position += forward * speed * dt.
    pub fn advance(&mut self, dt: f32) {
        self.position += self.forward * self.speed * dt;
    }
}

impl Target for RunnerBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn current_speed(&self) -> f32 {
        self.speed
    }

    fn notify_captured(&mut self) {
        self.captures += 1;
        self.speed = 0.0;
    }
}
