use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ember_tracer::ToneMap;
use log::LevelFilter;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Display transform applied when writing the PNG
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ToneMapArg {
    /// Clamp and quantize linear radiance
    Linear,
    /// Square root before quantizing
    #[value(name = "gamma2")]
    Gamma2,
}

impl From<ToneMapArg> for ToneMap {
    fn from(arg: ToneMapArg) -> Self {
        match arg {
            ToneMapArg::Linear => ToneMap::Linear,
            ToneMapArg::Gamma2 => ToneMap::Gamma2,
        }
    }
}

/// Built-in demo scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Random small spheres on a checkered ground, some in motion
    BouncingSpheres,
    /// Two large checkered spheres
    CheckeredSpheres,
    /// Image-mapped globe (needs --texture)
    TexturedSphere,
    /// Five colored quads around the camera
    Quads,
    /// Pass-through sphere over a checkered ground
    Transparency,
    /// Sphere mixing two diffuse colors
    Mix,
    /// Quad cut out by a texture's alpha channel (needs --texture)
    AlphaCutout,
    /// Sphere lit by a single area light
    SimpleLight,
    /// Cornell box with a mirror box and a diffuse box
    CornellBox,
    /// Cornell box shaded by surface normals
    CornellNormals,
    /// Cornell box with a floating sphere casting a soft shadow
    SimpleShadows,
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Offline Monte Carlo path tracer", version)]
pub struct Args {
    /// Scene to render
    #[arg(value_enum, default_value = "cornell-box")]
    pub scene: SceneKind,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Image width in pixels (scene default if omitted)
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Samples per pixel (scene default if omitted)
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounces per path (scene default if omitted)
    #[arg(short = 'd', long)]
    pub max_depth: Option<u32>,

    /// Display transform for the PNG
    #[arg(long, value_enum, default_value = "linear")]
    pub tone_map: ToneMapArg,

    /// Seed for scene generation and sampling
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Worker threads (all cores if omitted)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Image for the textured scenes
    #[arg(short, long)]
    pub texture: Option<PathBuf>,

    /// Logging level; RUST_LOG takes precedence per module
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
