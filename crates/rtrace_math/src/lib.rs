//! rtrace math types.
//!
//! Everything runs in double precision: shading compares lengths and
//! distances at scales where `f32` loses the epsilon guards.

// Re-export glam's double precision vector as the workspace vector type
pub use glam::DVec3 as Vec3;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// A position in world space.
pub type Point3 = Vec3;

/// Linear RGB color. Channels are unclamped until the image is written.
pub type Color = Vec3;

/// Shared tolerance for near-parallel rejection and secondary ray offsets.
pub const EPSILON: f64 = 1e-6;

/// Returns `v` scaled to unit length.
///
/// The caller guarantees `v` is non-zero; a zero vector yields NaN components.
#[inline]
pub fn unit_vec(v: Vec3) -> Vec3 {
    v / v.length()
}

/// Determinant of the 3x3 matrix whose columns are `a`, `b` and `c`.
#[inline]
pub fn determinant(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    a.x * (b.y * c.z - c.y * b.z) + a.y * (c.x * b.z - c.z * b.x) + a.z * (b.x * c.y - b.y * c.x)
}
