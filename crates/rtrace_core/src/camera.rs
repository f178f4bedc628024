//! Pinhole camera and eye-ray generation.

use rtrace_math::{unit_vec, Point3, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// Extents of the near plane in camera space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearPlane {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl NearPlane {
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }
}

/// A pinhole camera with an explicit `u, v, w` basis.
///
/// `w` points away from the gaze direction, `v` is up and `u = v × w` is
/// right, so the basis is right-handed. Image row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CameraSettings", into = "CameraSettings")]
pub struct Camera {
    pub position: Point3,
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
    pub near_plane: NearPlane,
    pub near_distance: f64,
    /// Horizontal resolution in pixels
    pub nx: u32,
    /// Vertical resolution in pixels
    pub ny: u32,
}

impl Camera {
    /// Build a camera from a gaze direction and an up vector.
    ///
    /// Both are normalized; `u` is derived as `cross(v, w)`.
    pub fn look(
        position: Point3,
        gaze: Vec3,
        up: Vec3,
        near_plane: NearPlane,
        near_distance: f64,
        resolution: (u32, u32),
    ) -> Self {
        let w = -unit_vec(gaze);
        let v = unit_vec(up);
        let u = v.cross(w);

        Self {
            position,
            u,
            v,
            w,
            near_plane,
            near_distance,
            nx: resolution.0,
            ny: resolution.1,
        }
    }

    /// Direction the camera looks at.
    pub fn gaze(&self) -> Vec3 {
        -self.w
    }

    /// Total number of pixels in the output image.
    pub fn pixel_count(&self) -> usize {
        self.nx as usize * self.ny as usize
    }

    /// Generate the eye ray through the center of pixel (i, j).
    ///
    /// `i` counts columns from the left, `j` counts rows from the top.
    pub fn ray_to_pixel(&self, i: u32, j: u32) -> Ray {
        let np = &self.near_plane;

        // Near-plane center, then its top-left corner
        let m = self.position - self.w * self.near_distance;
        let q = m + np.left * self.u + np.top * self.v;

        let s_u = (i as f64 + 0.5) * (np.right - np.left) / self.nx as f64;
        let s_v = (j as f64 + 0.5) * (np.top - np.bottom) / self.ny as f64;
        let s = q + s_u * self.u - s_v * self.v;

        Ray::new(self.position, s - self.position)
    }

    /// Check the camera can produce an image.
    pub fn validate(&self) -> SceneResult<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(SceneError::InvalidCamera(format!(
                "image resolution {}x{} has no pixels",
                self.nx, self.ny
            )));
        }
        if !self.near_distance.is_finite() || self.near_distance <= 0.0 {
            return Err(SceneError::InvalidCamera(format!(
                "near distance must be positive, got {}",
                self.near_distance
            )));
        }
        let basis_ok = [self.u, self.v, self.w]
            .iter()
            .all(|axis| axis.is_finite() && axis.length_squared() > 0.0);
        if !basis_ok || self.u.cross(self.v).dot(self.w) <= 0.0 {
            return Err(SceneError::InvalidCamera(
                "gaze and up must be non-zero and not parallel".to_string(),
            ));
        }
        Ok(())
    }
}

/// Serialized form of a camera, matching the way scene files describe it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CameraSettings {
    position: Point3,
    gaze: Vec3,
    up: Vec3,
    near_plane: NearPlane,
    near_distance: f64,
    resolution: [u32; 2],
}

impl From<CameraSettings> for Camera {
    fn from(s: CameraSettings) -> Self {
        Camera::look(
            s.position,
            s.gaze,
            s.up,
            s.near_plane,
            s.near_distance,
            (s.resolution[0], s.resolution[1]),
        )
    }
}

impl From<Camera> for CameraSettings {
    fn from(c: Camera) -> Self {
        Self {
            position: c.position,
            gaze: c.gaze(),
            up: c.v,
            near_plane: c.near_plane,
            near_distance: c.near_distance,
            resolution: [c.nx, c.ny],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_camera(n: u32) -> Camera {
        Camera::look(
            Vec3::ZERO,
            Vec3::NEG_Z,
            Vec3::Y,
            NearPlane::new(-1.0, 1.0, -1.0, 1.0),
            1.0,
            (n, n),
        )
    }

    #[test]
    fn test_camera_basis() {
        let camera = square_camera(4);

        assert_eq!(camera.w, Vec3::Z);
        assert_eq!(camera.v, Vec3::Y);
        assert_eq!(camera.u, Vec3::X);
        assert_eq!(camera.gaze(), Vec3::NEG_Z);
        assert!(camera.validate().is_ok());
    }

    #[test]
    fn test_center_ray_points_along_gaze() {
        // Odd resolution puts a pixel center exactly on the optical axis
        let camera = square_camera(5);
        let ray = camera.ray_to_pixel(2, 2);

        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((unit_vec(ray.direction()) - Vec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_top_left_pixel_is_up_and_left() {
        let camera = square_camera(2);
        let ray = camera.ray_to_pixel(0, 0);
        let d = ray.direction();

        assert!((d - Vec3::new(-0.5, 0.5, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_bottom_right_pixel_is_down_and_right() {
        let camera = square_camera(2);
        let d = camera.ray_to_pixel(1, 1).direction();

        assert!((d - Vec3::new(0.5, -0.5, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_asymmetric_near_plane() {
        let camera = Camera::look(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::NEG_Z,
            Vec3::Y,
            NearPlane::new(0.0, 2.0, -1.0, 0.0),
            2.0,
            (2, 1),
        );
        let ray = camera.ray_to_pixel(1, 0);

        // Column 1 of 2 samples u = 1.5, the single row samples v = -0.5
        let expected = Vec3::new(1.5, -0.5, 3.0);
        assert!((ray.at(1.0) - expected).length() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_empty_image() {
        let camera = square_camera(0);
        assert!(matches!(
            camera.validate(),
            Err(SceneError::InvalidCamera(_))
        ));
    }

    #[test]
    fn test_validate_rejects_parallel_up() {
        let camera = Camera::look(
            Vec3::ZERO,
            Vec3::Y,
            Vec3::Y,
            NearPlane::new(-1.0, 1.0, -1.0, 1.0),
            1.0,
            (4, 4),
        );
        assert!(camera.validate().is_err());
    }

    #[test]
    fn test_camera_json_uses_gaze_and_up() {
        let camera = square_camera(3);
        let json = serde_json::to_value(camera).unwrap();

        assert_eq!(json["gaze"], serde_json::json!([0.0, 0.0, -1.0]));
        assert_eq!(json["resolution"], serde_json::json!([3, 3]));

        let back: Camera = serde_json::from_value(json).unwrap();
        assert_eq!(back, camera);
    }
}
