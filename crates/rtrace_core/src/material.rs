//! Phong material with a mirror term.

use rtrace_math::Color;
use serde::{Deserialize, Serialize};

/// Blinn-Phong reflectance coefficients plus perfect mirror reflectance.
///
/// All channels are non-negative. A zero `mirror_reflectance` means the
/// surface spawns no reflection rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    #[serde(default)]
    pub mirror_reflectance: Color,
    pub phong_exponent: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            mirror_reflectance: Color::ZERO,
            phong_exponent: 1.0,
        }
    }
}

impl Material {
    /// Create a non-reflective material.
    pub fn new(ambient: Color, diffuse: Color, specular: Color, phong_exponent: f64) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            mirror_reflectance: Color::ZERO,
            phong_exponent,
        }
    }

    /// Set the mirror reflectance.
    pub fn with_mirror(mut self, mirror_reflectance: Color) -> Self {
        self.mirror_reflectance = mirror_reflectance;
        self
    }

    /// Check if this material reflects rays.
    pub fn is_reflective(&self) -> bool {
        self.mirror_reflectance.length() > 0.0
    }

    /// Check every channel is a finite, non-negative value.
    pub fn is_physical(&self) -> bool {
        [
            self.ambient,
            self.diffuse,
            self.specular,
            self.mirror_reflectance,
        ]
        .iter()
        .all(|c| c.is_finite() && c.min_element() >= 0.0)
            && self.phong_exponent.is_finite()
    }
}
