use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rtrace_core::load_scene;
use rtrace_renderer::{render, RenderConfig};

/// Default output path when none is given.
const DEFAULT_OUTPUT: &str = "rtrace_out.ppm";

#[derive(Parser, Debug)]
#[command(name = "rtrace")]
#[command(about = "Whitted-style ray tracer for triangle-mesh scenes", long_about = None)]
struct Cli {
    /// Scene file (.xml, or .json for the serde form)
    scene: PathBuf,

    /// Output image; .ppm writes plain P3, other extensions go through the image encoder
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Number of render workers (defaults to available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Override the scene's maximum mirror recursion depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Offset applied to shadow and reflection ray origins
    #[arg(long, value_parser = parse_epsilon)]
    epsilon: Option<f64>,
}

/// Accept only finite, positive offsets.
fn parse_epsilon(value: &str) -> Result<f64, String> {
    let epsilon: f64 = value
        .parse()
        .map_err(|_| format!("{:?} is not a number", value))?;
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(epsilon)
    } else {
        Err(format!("{} must be finite and positive", epsilon))
    }
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::default();
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth);
        }
        if let Some(epsilon) = self.epsilon {
            config = config.with_ray_epsilon(epsilon);
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let scene = load_scene(&cli.scene)
        .with_context(|| format!("Failed to load scene {}", cli.scene.display()))?;

    let image = render(&scene, &cli.render_config()).context("Render failed")?;

    image
        .save(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}
