use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod scenes;

use cli::Args;
use ember_tracer::write_png;

fn init_logger(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    log::info!("Starting Ember {}", env!("CARGO_PKG_VERSION"));

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    let scenes::Setup { scene, mut camera } =
        scenes::build(args.scene, args.texture.as_deref(), args.seed)?;

    if let Some(width) = args.width {
        camera.image_width = width;
    }
    if let Some(samples) = args.samples {
        camera.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        camera.max_depth = max_depth;
    }
    camera.tone_map = args.tone_map.into();
    camera.seed = args.seed;

    log::info!("Scene {:?}: {} materials", args.scene, scene.materials().len());
    let image = camera.render(&scene);

    write_png(&args.output, &image, camera.tone_map)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}
