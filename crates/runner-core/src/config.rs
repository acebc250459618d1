//! Tuning configuration for the pursuit maneuvers.
//!
//! Every struct is `#[serde(default)]`, so a JSON file only needs to name
//! the values it overrides.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::PursuitError;

/// Continuous chase (distance contest) tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseTuning {
    pub start_distance: f32,
    pub catch_distance: f32,
    pub max_distance: f32,
    pub safe_duration: f32,
    pub return_speed: f32,
    pub chase_speed: f32,
    pub close_factor: f32,
    pub acceleration_on_hit: f32,
    pub min_standoff: f32,
}

/// Fatal capture cut-scene tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureTuning {
    pub stop_distance: f32,
    pub spawn_distance: f32,
    pub run_speed: f32,
    pub max_duration: f32,
    /// Offset in the target's local frame (x right, y up, z forward).
    pub local_offset: Vec3,
    pub arrival_tolerance: f32,
    pub blend_delay: f32,
}

/// Retreat tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetreatTuning {
    pub start_speed: f32,
    pub deceleration: f32,
    pub min_speed: f32,
    pub fallback_extra_distance: f32,
    pub timeout_secs: f32,
    pub vanish_delay: f32,
}

/// Temporary chase (scare) tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporaryTuning {
    pub spawn_distance: f32,
    pub stop_distance: f32,
    pub display_duration: f32,
    pub run_speed: f32,
    pub approach_timeout: f32,
    pub follow_smoothing: f32,
    pub roar_duration: f32,
}

/// What the controller spawns when it needs a chaser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaserTemplate {
    /// Asset name handed to the presentation layer.
    pub name: String,
}

/// Full pursuit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    pub chase: ChaseTuning,
    pub capture: CaptureTuning,
    pub retreat: RetreatTuning,
    pub temporary: TemporaryTuning,
    /// Facing slerp rate (per second).
    pub turn_rate: f32,
    /// `None` means the chaser cannot be spawned; spawning requests become no-ops.
    pub template: Option<ChaserTemplate>,
}

impl Default for ChaseTuning {
    fn default() -> Self {
        Self {
            start_distance: CHASE_START_DISTANCE,
            catch_distance: CHASE_CATCH_DISTANCE,
            max_distance: CHASE_MAX_DISTANCE,
            safe_duration: CHASE_SAFE_DURATION,
            return_speed: CHASE_RETURN_SPEED,
            chase_speed: CHASE_SPEED,
            close_factor: CHASE_CLOSE_FACTOR,
            acceleration_on_hit: CHASE_ACCELERATION_ON_HIT,
            min_standoff: CHASE_MIN_STANDOFF,
        }
    }
}

impl Default for CaptureTuning {
    fn default() -> Self {
        Self {
            stop_distance: CAPTURE_STOP_DISTANCE,
            spawn_distance: CAPTURE_SPAWN_DISTANCE,
            run_speed: CAPTURE_RUN_SPEED,
            max_duration: CAPTURE_MAX_DURATION,
            local_offset: Vec3::from_array(CAPTURE_LOCAL_OFFSET),
            arrival_tolerance: CAPTURE_ARRIVAL_TOLERANCE,
            blend_delay: CAPTURE_BLEND_DELAY,
        }
    }
}

impl Default for RetreatTuning {
    fn default() -> Self {
        Self {
            start_speed: RETREAT_START_SPEED,
            deceleration: RETREAT_DECELERATION,
            min_speed: RETREAT_MIN_SPEED,
            fallback_extra_distance: RETREAT_FALLBACK_EXTRA_DISTANCE,
            timeout_secs: RETREAT_TIMEOUT_SECS,
            vanish_delay: RETREAT_VANISH_DELAY,
        }
    }
}

impl Default for TemporaryTuning {
    fn default() -> Self {
        Self {
            spawn_distance: TEMP_SPAWN_DISTANCE,
            stop_distance: TEMP_STOP_DISTANCE,
            display_duration: TEMP_DISPLAY_DURATION,
            run_speed: TEMP_RUN_SPEED,
            approach_timeout: TEMP_APPROACH_TIMEOUT,
            follow_smoothing: TEMP_FOLLOW_SMOOTHING,
            roar_duration: TEMP_ROAR_DURATION,
        }
    }
}

impl Default for ChaserTemplate {
    fn default() -> Self {
        Self {
            name: "chaser".to_string(),
        }
    }
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            chase: ChaseTuning::default(),
            capture: CaptureTuning::default(),
            retreat: RetreatTuning::default(),
            temporary: TemporaryTuning::default(),
            turn_rate: TURN_RATE,
            template: Some(ChaserTemplate::default()),
        }
    }
}

impl PursuitConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, PursuitError> {
        let config: PursuitConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tunings that would break the state machine's invariants.
    pub fn validate(&self) -> Result<(), PursuitError> {
        let chase = &self.chase;
        if chase.catch_distance < 0.0 || chase.catch_distance >= chase.max_distance {
            return Err(PursuitError::InvalidConfig(format!(
                "catch_distance {} must be in [0, max_distance {})",
                chase.catch_distance, chase.max_distance
            )));
        }
        if chase.start_distance <= chase.catch_distance || chase.start_distance >= chase.max_distance
        {
            return Err(PursuitError::InvalidConfig(format!(
                "start_distance {} must lie strictly between catch and max distance",
                chase.start_distance
            )));
        }
        if chase.safe_duration < 0.0 || chase.return_speed <= 0.0 {
            return Err(PursuitError::InvalidConfig(
                "safe_duration must be >= 0 and return_speed > 0".to_string(),
            ));
        }
        if self.capture.max_duration <= 0.0 || self.retreat.timeout_secs <= 0.0 {
            return Err(PursuitError::InvalidConfig(
                "capture.max_duration and retreat.timeout_secs must be > 0".to_string(),
            ));
        }
        if self.temporary.approach_timeout <= 0.0 {
            return Err(PursuitError::InvalidConfig(
                "temporary.approach_timeout must be > 0".to_string(),
            ));
        }
        if self.retreat.min_speed < 0.0 || self.retreat.min_speed > self.retreat.start_speed {
            return Err(PursuitError::InvalidConfig(format!(
                "retreat.min_speed {} must be in [0, start_speed {}]",
                self.retreat.min_speed, self.retreat.start_speed
            )));
        }
        Ok(())
    }
}
