use rtrace_math::{Color, Point3};
use serde::{Deserialize, Serialize};

/// An isotropic point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Point3,
    /// Radiant intensity at unit distance
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Point3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Irradiance arriving at `distance` from the light (inverse-square falloff).
    #[inline]
    pub fn irradiance(&self, distance: f64) -> Color {
        self.intensity / (distance * distance)
    }
}
