use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod log;
mod model;
mod pipeline;
mod render;

use model::Metric;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "hashbench-plot")]
#[command(about = "Plot hash table benchmark timings against thread count", long_about = None)]
struct Cli {
    /// JSON file with rendering settings (sizes, fonts, margins).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert, retrieve and total time PNG charts for original, mutex and spinlock.
    Raster {
        #[arg(long, default_value = pipeline::RASTER_LOG)]
        log: PathBuf,

        #[arg(short = 'o', long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// One SVG chart comparing original and mutex; repeated timings are summed.
    Svg {
        #[arg(long, default_value = pipeline::VECTOR_LOG)]
        log: PathBuf,

        #[arg(long, value_enum, default_value_t = Metric::Retrieve)]
        metric: Metric,

        #[arg(short = 'o', long, default_value = pipeline::VECTOR_OUT)]
        out: PathBuf,
    },

    /// Print the parsed timings as JSON.
    Dump {
        #[arg(long, default_value = pipeline::RASTER_LOG)]
        log: PathBuf,

        /// Sum repeated timings instead of keeping the last one.
        #[arg(long)]
        accumulate: bool,
    },
}

fn main() -> Result<()> {
    // Diagnostics on stderr; stdout is reserved for results.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let render_config = config::RenderConfig::load(cli.config.as_deref())?;

    match cli.cmd {
        Commands::Raster { log, out_dir } => {
            pipeline::run_raster(&pipeline::RasterJob {
                log,
                out_dir,
                config: render_config.raster,
            })?;
        }
        Commands::Svg { log, metric, out } => {
            pipeline::run_vector(&pipeline::VectorJob {
                log,
                out,
                metric,
                config: render_config.vector,
            })?;
        }
        Commands::Dump { log, accumulate } => {
            let strategy = if accumulate {
                crate::log::MergeStrategy::Accumulate
            } else {
                crate::log::MergeStrategy::Overwrite
            };
            println!("{}", pipeline::dump(&log, strategy)?);
        }
    }

    Ok(())
}
