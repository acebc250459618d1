//! Pose helpers: ground projection, interpolation and facing.

use glam::{Quat, Vec3};

use runner_core::types::TargetPose;

/// Below this length a direction is treated as zero.
const DIRECTION_EPSILON: f32 = 1e-4;

/// Project `dir` onto the ground plane and normalize. Falls back to `+Z`.
pub fn ground_forward(dir: Vec3) -> Vec3 {
    let flat = Vec3::new(dir.x, 0.0, dir.z);
    if flat.length() < DIRECTION_EPSILON {
        Vec3::Z
    } else {
        flat.normalize()
    }
}

/// Yaw rotation that turns `+Z` onto the ground projection of `dir`.
pub fn facing_rotation(dir: Vec3) -> Quat {
    let flat = ground_forward(dir);
    Quat::from_rotation_y(flat.x.atan2(flat.z))
}

/// Rotation looking from `from` to `to` on the ground plane, if they are apart.
pub fn look_at(from: Vec3, to: Vec3) -> Option<Quat> {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if delta.length() < DIRECTION_EPSILON {
        None
    } else {
        Some(facing_rotation(delta))
    }
}

/// Point `distance` units behind the target along its forward direction.
pub fn behind(target: &TargetPose, distance: f32) -> Vec3 {
    target.position - ground_forward(target.forward) * distance
}

/// Rotate an offset expressed in the target's local frame into world space.
pub fn local_to_world(target: &TargetPose, local_offset: Vec3) -> Vec3 {
    facing_rotation(target.forward) * local_offset
}

/// Step from `current` toward `goal` by at most `max_step`, never overshooting.
pub fn move_towards(current: Vec3, goal: Vec3, max_step: f32) -> Vec3 {
    let delta = goal - current;
    let dist = delta.length();
    if dist <= max_step || dist < DIRECTION_EPSILON {
        goal
    } else {
        current + delta / dist * max_step
    }
}

/// Exponential smoothing toward `goal`; `factor` is clamped to `[0, 1]`.
pub fn smooth_toward(current: Vec3, goal: Vec3, factor: f32) -> Vec3 {
    current.lerp(goal, factor.clamp(0.0, 1.0))
}

/// Slerp `current` toward `desired` at `rate` per second.
pub fn turn_towards(current: Quat, desired: Quat, rate: f32, dt: f32) -> Quat {
    current.slerp(desired, (rate * dt).clamp(0.0, 1.0)).normalize()
}
