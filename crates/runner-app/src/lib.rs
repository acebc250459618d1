//! Headless driver for the lane-runner pursuit simulation.
//!
//! Runs the engine on its own thread, feeds it scripted hazards or commands
//! read from stdin, and reports what happened.

pub mod game_loop;
pub mod logging;
pub mod scenario;
pub mod state;

pub use logging::init as init_logging;
pub use runner_core as core;
pub use runner_sim as sim;
