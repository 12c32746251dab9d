//! # engine_math
//!
//! Math types for the engine. Re-exports [`glam`] for linear algebra and
//! defines the [`Transform`] every entity carries.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{BVec2, BVec3, BVec4, EulerRot, Mat2, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use transform::Transform;
