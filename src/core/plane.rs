//! Helpers for the gameplay plane.
//!
//! Physics runs in 3D with Z translation locked; every gameplay decision
//! (distances, directions, facing) happens on the XY plane.

use bevy::prelude::*;

/// Velocities below this squared magnitude are treated as standing still.
pub const STILL_EPSILON_SQ: f32 = 0.0001;

/// Project a world position onto the gameplay plane.
pub fn to_plane(position: Vec3) -> Vec2 {
    position.truncate()
}

/// Lift a plane vector back into the world, keeping `z`.
pub fn from_plane(v: Vec2, z: f32) -> Vec3 {
    v.extend(z)
}

/// Normalize `v`, substituting `fallback` when `v` is degenerate.
pub fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.length_squared() < STILL_EPSILON_SQ {
        fallback.normalize_or(Vec2::NEG_X)
    } else {
        v.normalize()
    }
}

/// Rotate a plane direction by `degrees` counter-clockwise.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Rotation that points local +X along `direction`.
pub fn facing_rotation(direction: Vec2) -> Quat {
    Quat::from_rotation_z(direction.y.atan2(direction.x))
}
