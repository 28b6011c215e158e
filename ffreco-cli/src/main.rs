//! Command-line driver for far-forward neutral reconstruction.
//!
//! Events are read as JSON (an array of per-region cluster collections per
//! event); reconstructed records are written back as JSON.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use ffreco_algorithms::NeutralsReconstruction;
use ffreco_core::{
    EventInput, EventOutput, ParticleTable, ReconstructionConfig, ReconstructionStatistics,
    StaticGeometry,
};
use log::info;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] ffreco_core::Error),
}

/// Far-forward Λ and Σ⁰ reconstruction from calorimeter clusters.
#[derive(Parser)]
#[command(name = "ffreco")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct events from a JSON cluster file
    Process {
        /// Input events (JSON array)
        input: PathBuf,

        /// Output file path (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Reconstruction configuration (JSON); defaults if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Geometry constants (JSON object of name to value in mm)
        #[arg(short, long)]
        geometry: Option<PathBuf>,

        /// Check configuration values before processing
        #[arg(long)]
        validate: bool,
    },

    /// Write the default configuration as JSON
    Config {
        /// Output file; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about an event file
    Info {
        /// Input events (JSON array)
        input: PathBuf,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn load_config(path: Option<&Path>) -> Result<ReconstructionConfig> {
    path.map_or_else(|| Ok(ReconstructionConfig::default()), read_json)
}

fn load_geometry(path: Option<&Path>) -> Result<StaticGeometry> {
    let Some(path) = path else {
        return Ok(StaticGeometry::new());
    };
    let constants: HashMap<String, f64> = read_json(path)?;
    Ok(constants
        .into_iter()
        .fold(StaticGeometry::new(), |geometry, (name, value)| {
            geometry.with_constant(name, value)
        }))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Runs the reconstruction over every event in `input`.
fn process(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    geometry: Option<&Path>,
    validate: bool,
) -> Result<ReconstructionStatistics> {
    let config = load_config(config)?;
    if validate {
        config.validate()?;
    }
    let geometry = load_geometry(geometry)?;
    let particles = ParticleTable::standard();
    let reconstruction = NeutralsReconstruction::new(config, &particles, &geometry)?;

    let events: Vec<EventInput> = read_json(input)?;
    info!("Read {} events from {}", events.len(), input.display());

    let outputs: Vec<EventOutput> = reconstruction.process_events(&events)?;
    write_json(output, &outputs)?;
    info!("Wrote {} event records to {}", outputs.len(), output.display());

    Ok(outputs.iter().collect())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            geometry,
            validate,
        } => {
            let start = Instant::now();
            let stats = process(
                &input,
                &output,
                config.as_deref(),
                geometry.as_deref(),
                validate,
            )?;
            let elapsed = start.elapsed();

            println!(
                "Processed {} events in {:.2}s",
                stats.events,
                elapsed.as_secs_f64()
            );
            println!("Photon candidates: {}", stats.photons);
            println!("Neutron candidates: {}", stats.neutrons);
            println!("Pi0 pairs: {}", stats.pi0_pairs);
            println!(
                "Lambdas: {} ({:.1}% of events)",
                stats.lambdas,
                stats.lambda_efficiency() * 100.0
            );
            println!("Sigma0s: {}", stats.sigma0s);
        }

        Commands::Config { output } => {
            let config = ReconstructionConfig::default();
            match output {
                Some(path) => write_json(&path, &config)?,
                None => println!("{}", serde_json::to_string_pretty(&config)?),
            }
        }

        Commands::Info { input } => {
            let events: Vec<EventInput> = read_json(&input)?;
            let clusters: usize = events.iter().map(EventInput::cluster_count).sum();
            let regions = events.iter().map(|e| e.regions.len()).max().unwrap_or(0);

            println!("File: {}", input.display());
            println!("Events: {}", events.len());
            println!("Regions: {}", regions);
            println!("Clusters: {}", clusters);
            if !events.is_empty() {
                println!(
                    "Mean clusters per event: {:.2}",
                    clusters as f64 / events.len() as f64
                );
            }
        }
    }

    Ok(())
}
