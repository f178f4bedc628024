//! Triangle primitive for ray tracing.
//!
//! Solves `o + t·d = a + β(b − a) + γ(c − a)` with Cramer's rule.

use rtrace_math::{determinant, Interval, Point3, Ray, Vec3, EPSILON};

/// Barycentric range accepted for β and γ.
const UNIT: Interval = Interval::new(0.0, 1.0);

/// Result of a successful ray/triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the hit
    pub t: f64,
    /// Barycentric weight of `v1`
    pub beta: f64,
    /// Barycentric weight of `v2`
    pub gamma: f64,
    /// Face normal, not normalized; its sign follows the vertex winding
    pub normal: Vec3,
}

/// A triangle given by three positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3,
    pub v1: Point3,
    pub v2: Point3,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Face normal `(v1 − v0) × (v2 − v0)`, not normalized.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(self.v2 - self.v0)
    }

    /// Intersect `ray` with the triangle, accepting only `t` strictly inside `ray_t`.
    ///
    /// Near-parallel rays (|det| below `EPSILON`) never hit.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<TriangleHit> {
        let d = ray.direction();
        let a_b = self.v0 - self.v1;
        let a_c = self.v0 - self.v2;

        let det_a = determinant(a_b, a_c, d);
        if det_a.abs() < EPSILON {
            return None;
        }

        let a_o = self.v0 - ray.origin();
        let inv_det = 1.0 / det_a;

        let beta = determinant(a_o, a_c, d) * inv_det;
        if !UNIT.contains(beta) {
            return None;
        }

        let gamma = determinant(a_b, a_o, d) * inv_det;
        if gamma < 0.0 || beta + gamma > 1.0 {
            return None;
        }

        let t = determinant(a_b, a_c, a_o) * inv_det;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(TriangleHit {
            t,
            beta,
            gamma,
            normal: self.normal(),
        })
    }
}

impl From<[Point3; 3]> for Triangle {
    fn from([v0, v1, v2]: [Point3; 3]) -> Self {
        Self::new(v0, v1, v2)
    }
}
