//! Pursuit simulation for the lane runner.
//!
//! Owns the chaser entity, runs the pursuit state machine at a fixed tick
//! rate, and produces `PursuitSnapshot`s for presentation layers.

pub mod collaborators;
pub mod controller;
pub mod engine;
pub mod runner;

pub use collaborators::{Target, ViewTest};
pub use controller::PursuitController;
pub use engine::{RunnerEngine, SimConfig};
pub use runner_core as core;
