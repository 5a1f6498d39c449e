//! lux - render a JSON scene description to a PPM image.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lux_core::load_description;
use lux_renderer::{build_renderer, render_config, RenderConfig};

#[derive(Parser, Debug)]
#[command(name = "lux")]
#[command(about = "Monte Carlo path tracer", long_about = None)]
struct Cli {
    /// Scene description (.json)
    scene: PathBuf,

    /// Output image (default: <scene name>.ppm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Samples per pixel, overriding the scene's `spp`
    #[arg(long)]
    spp: Option<u32>,

    /// Worker threads (default: all cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Base seed for the random streams
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Exponent applied before 8-bit quantization
    #[arg(long)]
    gamma: Option<f64>,
}

impl Cli {
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(spp) = self.spp {
            config.samples_per_pixel = spp;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        config.threads = self.threads;
        config.seed = self.seed;
    }

    fn output_path(&self, scene_name: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.ppm", scene_name)))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let description = load_description(&cli.scene)
        .with_context(|| format!("failed to load scene {}", cli.scene.display()))?;
    log::info!(
        "Loaded '{}': {}x{}, {} primitives",
        description.name,
        description.width,
        description.height,
        description.primitive_count()
    );

    let mut config = render_config(&description);
    cli.apply(&mut config);

    let start = Instant::now();
    let tracer = build_renderer(&description, config).context("failed to build scene")?;
    log::info!("Scene built in {:.2?}", start.elapsed());

    let image = tracer.render().context("render failed")?;

    let output = cli.output_path(&description.name);
    image
        .save_ppm(&output, tracer.config().gamma)
        .with_context(|| format!("failed to write {}", output.display()))?;

    Ok(())
}
