//! Entity transform.
//!
//! [`Transform`] represents position, scale, and orientation in 3D space.
//! Every entity owns exactly one; it is stored on the entity itself rather
//! than alongside the other components.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Number of scalars in the flattened form produced by [`Transform::to_array`].
pub const FLAT_LEN: usize = 10;

/// A 3D transform with per-axis scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Orientation as a unit quaternion.
    pub orientation: Quat,
}

impl Transform {
    /// The identity transform: origin, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        scale: Vec3::ONE,
        orientation: Quat::IDENTITY,
    };

    /// Create a new transform with the given position and default scale/orientation.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a new transform from all three parts.
    #[must_use]
    pub fn new(position: Vec3, scale: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            scale,
            orientation,
        }
    }

    /// Apply a uniform scale factor.
    #[must_use]
    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale *= factor;
        self
    }

    /// Flatten into `[px, py, pz, sx, sy, sz, qx, qy, qz, qw]`.
    #[must_use]
    pub fn to_array(&self) -> [f32; FLAT_LEN] {
        let p = self.position;
        let s = self.scale;
        let q = self.orientation;
        [p.x, p.y, p.z, s.x, s.y, s.z, q.x, q.y, q.z, q.w]
    }

    /// Inverse of [`Transform::to_array`]. The quaternion is taken as-is and
    /// not renormalised.
    #[must_use]
    pub fn from_array(a: [f32; FLAT_LEN]) -> Self {
        Self {
            position: Vec3::new(a[0], a[1], a[2]),
            scale: Vec3::new(a[3], a[4], a[5]),
            orientation: Quat::from_xyzw(a[6], a[7], a[8], a[9]),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
