//! Pixel range scheduling.
//!
//! The image is flattened to `nx * ny` row-major pixel indices and split
//! into one contiguous range per worker. Ranges are rendered in parallel
//! on a rayon pool and stitched back together in range order.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rtrace_core::Scene;
use rtrace_math::Color;

use crate::error::{RenderError, RenderResult};
use crate::renderer::{render_pixel, RenderConfig};

/// A contiguous run of row-major pixel indices assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRange {
    /// Position of this range in the output order
    pub index: usize,
    /// First pixel index
    pub start: usize,
    /// Number of pixels
    pub len: usize,
}

impl PixelRange {
    pub fn new(index: usize, start: usize, len: usize) -> Self {
        Self { index, start, len }
    }

    /// Pixel indices covered by this range.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Split `total` pixels across `workers` ranges.
///
/// Each range gets `total / workers` pixels and the remainder goes to the
/// last one. The worker count is clamped to `1..=total`, so no range is
/// empty; an empty image yields no ranges.
pub fn partition(total: usize, workers: usize) -> Vec<PixelRange> {
    if total == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, total);
    let base = total / workers;

    let mut ranges: Vec<PixelRange> = (0..workers)
        .map(|index| PixelRange::new(index, index * base, base))
        .collect();
    if let Some(last) = ranges.last_mut() {
        last.len += total - base * workers;
    }

    ranges
}

/// Map a row-major pixel index to `(x, y)`.
#[inline]
pub fn pixel_coords(index: usize, nx: u32) -> (u32, u32) {
    let nx = nx as usize;
    ((index % nx) as u32, (index / nx) as u32)
}

/// Render every pixel of a range into a private buffer.
pub fn render_range(range: &PixelRange, scene: &Scene, config: &RenderConfig) -> Vec<Color> {
    log::debug!(
        "Range {}: pixels {}..{}",
        range.index,
        range.start,
        range.start + range.len
    );

    range
        .indices()
        .map(|index| {
            let (x, y) = pixel_coords(index, scene.camera.nx);
            render_pixel(scene, x, y, config)
        })
        .collect()
}

/// Run `f` on every range inside `pool` and concatenate the results in
/// range order. A panic in any range fails the whole fan-out.
pub fn fan_out<T, F>(pool: &rayon::ThreadPool, ranges: &[PixelRange], f: F) -> RenderResult<Vec<T>>
where
    T: Send,
    F: Fn(&PixelRange) -> Vec<T> + Sync,
{
    let results: Vec<RenderResult<Vec<T>>> = pool.install(|| {
        ranges
            .par_iter()
            .map(|range| {
                panic::catch_unwind(AssertUnwindSafe(|| f(range))).map_err(|payload| {
                    RenderError::WorkerPanicked(format!(
                        "range {}: {}",
                        range.index,
                        panic_message(payload.as_ref())
                    ))
                })
            })
            .collect()
    });

    let mut output = Vec::with_capacity(ranges.iter().map(|r| r.len).sum());
    for result in results {
        output.extend(result?);
    }
    Ok(output)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
