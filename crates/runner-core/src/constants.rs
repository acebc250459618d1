//! Pursuit constants and tuning defaults.
//!
//! Distances are in world units (roughly meters), speeds in units/s,
//! durations in seconds. `PursuitConfig::default()` is built from these.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Continuous chase ---

/// Distance behind the target at which a continuous chase starts.
pub const CHASE_START_DISTANCE: f32 = 15.0;

/// At or below this distance the target is captured.
pub const CHASE_CATCH_DISTANCE: f32 = 1.0;

/// At or above this distance the chaser disengages.
pub const CHASE_MAX_DISTANCE: f32 = 30.0;

/// Seconds without a hit after which the target starts pulling away.
pub const CHASE_SAFE_DURATION: f32 = 3.0;

/// Distance regained per second once the safe timer has run out.
pub const CHASE_RETURN_SPEED: f32 = 2.0;

/// Positional smoothing rate; also drives the slow closing rate.
pub const CHASE_SPEED: f32 = 5.0;

/// Fraction of `CHASE_SPEED` used as the closing rate while in contest.
pub const CHASE_CLOSE_FACTOR: f32 = 0.1;

/// Distance removed from the contest by one hit.
pub const CHASE_ACCELERATION_ON_HIT: f32 = 5.0;

/// Closest the chaser drifts on its own without a hit.
pub const CHASE_MIN_STANDOFF: f32 = 2.0;

// --- Fatal capture ---

/// Distance behind the target the capture point sits at.
pub const CAPTURE_STOP_DISTANCE: f32 = 1.5;

/// Distance behind the target the chaser spawns at.
pub const CAPTURE_SPAWN_DISTANCE: f32 = 20.0;

/// Minimum run speed during the capture approach.
pub const CAPTURE_RUN_SPEED: f32 = 12.0;

/// Hard bound on the approach phase.
pub const CAPTURE_MAX_DURATION: f32 = 2.5;

/// Offset from the capture point, in the target's local frame (x right, y up, z forward).
pub const CAPTURE_LOCAL_OFFSET: [f32; 3] = [0.0, 0.0, -3.0];

/// Distance at which the approach counts as arrived.
pub const CAPTURE_ARRIVAL_TOLERANCE: f32 = 0.5;

/// Delay between switching Running -> Idle and signalling completion.
pub const CAPTURE_BLEND_DELAY: f32 = 0.25;

// --- Retreat ---

/// Speed at the start of a retreat.
pub const RETREAT_START_SPEED: f32 = 14.0;

/// Speed lost per second while retreating.
pub const RETREAT_DECELERATION: f32 = 6.0;

/// Retreat speed never drops below this.
pub const RETREAT_MIN_SPEED: f32 = 4.0;

/// Extra distance beyond the stop distance used when no view test exists.
pub const RETREAT_FALLBACK_EXTRA_DISTANCE: f32 = 10.0;

/// Safety bound on a retreat.
pub const RETREAT_TIMEOUT_SECS: f32 = 6.0;

/// Delay between leaving the screen and despawning.
pub const RETREAT_VANISH_DELAY: f32 = 0.3;

// --- Temporary chase ---

/// Distance behind the target a temporary chase spawns at.
pub const TEMP_SPAWN_DISTANCE: f32 = 25.0;

/// Distance behind the target a temporary chase holds at.
pub const TEMP_STOP_DISTANCE: f32 = 10.0;

/// Seconds spent lingering at the stop distance.
pub const TEMP_DISPLAY_DURATION: f32 = 2.0;

/// Speed of the approach run, relative to the ground.
pub const TEMP_RUN_SPEED: f32 = 18.0;

/// Safety bound on the approach run.
pub const TEMP_APPROACH_TIMEOUT: f32 = 4.0;

/// Positional easing rate while lingering.
pub const TEMP_FOLLOW_SMOOTHING: f32 = 4.0;

/// Length of the spawn roar before running.
pub const TEMP_ROAR_DURATION: f32 = 0.4;

// --- Facing ---

/// Slerp rate for chaser rotation (per second).
pub const TURN_RATE: f32 = 8.0;
