//! dcolor - display color pipeline inspector
//!
//! Builds the same pipelines a compositor would and shows what they do.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, prelude::*};

use dcolor_pipeline::PipelineConfig;
use dcolor_primaries::RenderingIntent;

mod commands;

#[derive(Parser)]
#[command(name = "dcolor")]
#[command(author, version, about = "Display color pipeline inspector")]
#[command(long_about = "
Builds fused color pipelines between color descriptions and evaluates,
prints or serializes them.

Descriptions are written as <colorimetry>:<transfer>, or one of the
presets 'srgb' and 'hdr10'.

Examples:
  dcolor map 1 1 1 --from srgb --to hdr10
  dcolor map 0.75 0.75 0.75 --from hdr10 --to srgb --intent perceptual
  dcolor pipeline --from bt2020:pq --from-max 4000 --to display-p3:gamma22 --to-ref 200
  dcolor uniforms --from hdr10 --to srgb
  dcolor shader > color_pipeline.wgsl
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Pipeline settings (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never insert a tone mapper
    #[arg(long, global = true)]
    no_tonemapping: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one RGB value
    #[command(visible_alias = "m")]
    Map(MapArgs),

    /// Print the fused operation list
    #[command(visible_alias = "p")]
    Pipeline(ConversionArgs),

    /// Serialize to shader uniforms and report slot usage
    #[command(visible_alias = "u")]
    Uniforms(ConversionArgs),

    /// Print the WGSL evaluator
    Shader,
}

/// Source, destination and intent of a conversion.
#[derive(Args, Clone)]
struct ConversionArgs {
    /// Source description (<colorimetry>:<transfer> or preset)
    #[arg(long, default_value = "srgb")]
    from: String,

    /// Destination description (<colorimetry>:<transfer> or preset)
    #[arg(long, default_value = "srgb")]
    to: String,

    /// Rendering intent: perceptual, relative, absolute, relative-bpc
    #[arg(short, long, default_value = "perceptual")]
    intent: RenderingIntent,

    /// Source reference luminance (nits), relative curves are rescaled to it
    #[arg(long)]
    from_ref: Option<f32>,

    /// Source black level (nits)
    #[arg(long)]
    from_min: Option<f32>,

    /// Source peak luminance (nits)
    #[arg(long)]
    from_max: Option<f32>,

    /// Destination reference luminance (nits), relative curves are rescaled to it
    #[arg(long)]
    to_ref: Option<f32>,

    /// Destination black level (nits)
    #[arg(long)]
    to_min: Option<f32>,

    /// Destination peak luminance (nits)
    #[arg(long)]
    to_max: Option<f32>,
}

#[derive(Args)]
struct MapArgs {
    /// Red
    #[arg(allow_hyphen_values = true)]
    r: f32,

    /// Green
    #[arg(allow_hyphen_values = true)]
    g: f32,

    /// Blue
    #[arg(allow_hyphen_values = true)]
    b: f32,

    #[command(flatten)]
    conversion: ConversionArgs,
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(filter());

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let file_log = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            tracing_subscriber::registry().with(stderr_log).with(file_log).init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(stderr_log).init();
            Ok(None)
        }
    }
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PipelineConfig::from_env(),
    };
    if cli.no_tonemapping {
        config.tonemapping = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_ref())?;
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Map(args) => commands::map::run(args, &config),
        Commands::Pipeline(args) => commands::pipeline::run(args, &config),
        Commands::Uniforms(args) => commands::uniforms::run(args, &config),
        Commands::Shader => commands::shader::run(),
    }
}
