//! Render configuration and the top-level render entry point.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;

use rtrace_core::Scene;
use rtrace_math::{Color, EPSILON};

use crate::error::{RenderError, RenderResult};
use crate::image_buffer::ImageBuffer;
use crate::scheduler::{fan_out, partition, render_range};
use crate::shading::ray_color;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Worker count; `None` uses the available parallelism
    pub workers: Option<usize>,
    /// Overrides the scene's mirror recursion depth
    pub max_depth: Option<u32>,
    /// Offset applied to shadow and reflection ray origins
    pub ray_epsilon: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workers: None,
            max_depth: None,
            ray_epsilon: EPSILON,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_ray_epsilon(mut self, ray_epsilon: f64) -> Self {
        self.ray_epsilon = ray_epsilon;
        self
    }

    /// Number of workers to fan out to, at least one.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(workers) => workers.max(1),
            None => thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }

    /// Check the ray offset is finite and positive.
    ///
    /// A zero or negative offset starts secondary rays on or behind the
    /// surface they leave, so they hit their own triangle.
    pub fn validate(&self) -> RenderResult<()> {
        if !self.ray_epsilon.is_finite() || self.ray_epsilon <= 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "ray epsilon must be finite and positive, got {}",
                self.ray_epsilon
            )));
        }
        Ok(())
    }

    /// Mirror recursion depth to start eye rays with.
    pub fn depth_for(&self, scene: &Scene) -> u32 {
        self.max_depth.unwrap_or(scene.max_depth)
    }
}

/// Shade the pixel at column `x`, row `y` (row 0 is the top).
pub fn render_pixel(scene: &Scene, x: u32, y: u32, config: &RenderConfig) -> Color {
    let ray = scene.camera.ray_to_pixel(x, y);
    ray_color(&ray, scene, config.depth_for(scene), config)
}

/// Render the scene into an image buffer.
///
/// The configuration and scene are validated first. Pixels are split into one contiguous range
/// per worker and rendered on a dedicated rayon pool; nothing is returned
/// unless every range finishes.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    config.validate()?;
    scene.validate()?;

    let (width, height) = (scene.camera.nx, scene.camera.ny);
    let ranges = partition(scene.camera.pixel_count(), config.worker_count());

    log::info!(
        "Rendering {}x{} ({} pixels) on {} workers, max depth {}",
        width,
        height,
        scene.camera.pixel_count(),
        ranges.len(),
        config.depth_for(scene)
    );
    let start = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ranges.len().max(1))
        .thread_name(|index| format!("rtrace-worker-{}", index))
        .build()?;

    let pixels = fan_out(&pool, &ranges, |range| render_range(range, scene, config))?;

    log::info!("Rendering completed in {:.3}s", start.elapsed().as_secs_f64());

    Ok(ImageBuffer::from_pixels(width, height, pixels))
}
