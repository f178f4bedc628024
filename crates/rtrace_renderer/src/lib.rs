//! rtrace renderer - Whitted-style CPU ray tracing.
//!
//! Renders a validated [`rtrace_core::Scene`] with:
//! - Cramer's-rule ray/triangle intersection
//! - Ambient and Blinn-Phong direct lighting with hard shadows
//! - Recursive mirror reflection bounded by the scene's max depth
//! - Contiguous pixel ranges fanned out over a rayon pool
//!
//! # Example
//!
//! ```ignore
//! use rtrace_core::load_scene;
//! use rtrace_renderer::{render, RenderConfig};
//!
//! let scene = load_scene("scenes/simple.xml")?;
//! let image = render(&scene, &RenderConfig::default().with_workers(4))?;
//! image.save("out.ppm")?;
//! ```

mod error;
mod hittable;
mod image_buffer;
mod renderer;
mod scheduler;
mod shading;
mod triangle;

pub use error::{RenderError, RenderResult};
pub use hittable::{closest_hit, occluded, HitRecord, Hittable};
pub use image_buffer::{channel_to_u8, color_to_rgb, ImageBuffer};
pub use renderer::{render, render_pixel, RenderConfig};
pub use scheduler::{fan_out, partition, pixel_coords, render_range, PixelRange};
pub use shading::ray_color;
pub use triangle::{Triangle, TriangleHit};

/// Re-export math types from rtrace_math
pub use rtrace_math::{Color, Interval, Point3, Ray, Vec3};
