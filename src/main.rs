//! Headless dive runner
//!
//! Replays a dive profile through the decompression simulation and prints a
//! report of saturation, safe depth, warnings and damage.

use clap::Parser;
use decompression::core::config::DecompressionConfig;
use decompression::core::error::{DiveError, Result};
use decompression::simulation::{run_profile, DiveProfile, DiveSimulation, RunSettings, SaveData};
use std::path::PathBuf;

/// Headless Dive Runner - replay a depth profile and report the consequences
#[derive(Parser, Debug)]
#[command(name = "decompression")]
#[command(about = "Replay a dive profile through the decompression simulation")]
struct Args {
    /// Dive profile TOML; the built-in deep bounce when omitted
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Decompression config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for the bends damage roll
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured difficulty (0 = Normal, 1 = Hard, 2 = Deadly)
    #[arg(long)]
    difficulty: Option<u8>,

    /// Fixed tick length in seconds
    #[arg(long, default_value_t = 0.02)]
    fixed_dt: f32,

    /// Frame tick length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    variable_dt: f32,

    /// Seconds between report samples
    #[arg(long, default_value_t = 5.0)]
    sample_interval: f32,

    /// Resume from save data before running
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write save data after the run
    #[arg(long)]
    save: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Debug-level simulation logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "decompression=debug"
    } else {
        "decompression=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => DecompressionConfig::load(path)?,
        None => DecompressionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }

    let profile = match &args.profile {
        Some(path) => DiveProfile::load(path)?,
        None => DiveProfile::deep_bounce(),
    };

    let mut sim = DiveSimulation::new(config)?;
    if let Some(path) = &args.resume {
        sim.restore(&SaveData::read_from(path)?);
    }

    let settings = RunSettings {
        fixed_dt: args.fixed_dt,
        variable_dt: args.variable_dt,
        sample_interval: args.sample_interval,
    };
    let report = run_profile(&mut sim, &profile, settings)?;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "text" => {
            println!("Dive Report: {}", report.profile);
            println!("=============");
            println!("Duration: {:.0}s", report.duration);
            println!("Max saturation: {:.1}", report.max_saturation);
            println!("Max safe depth: {:.1}m", report.max_safe_depth);
            println!("Decompression damage: {:.1}", report.decompression_damage);
            println!("Barotrauma damage: {:.1}", report.barotrauma_damage);
            println!("Final health: {:.1}", report.final_health);
            println!();
            println!("Status changes:");
            for change in &report.status_changes {
                println!("  {:>7.1}s  {:?}", change.time, change.status);
            }
            println!("Warnings:");
            for warning in &report.warnings {
                println!("  {:>7.1}s  {:?}", warning.time, warning.category);
            }
            println!();
            println!("   time   depth    sat   safe  ascent  health");
            for sample in &report.samples {
                println!(
                    "{:>7.1} {:>7.1} {:>6.1} {:>6.1} {:>7.2} {:>7.1}",
                    sample.time,
                    sample.snapshot.depth,
                    sample.snapshot.saturation,
                    sample.snapshot.safe_depth,
                    sample.snapshot.ascent_rate,
                    sample.health
                );
            }
        }
        other => {
            return Err(DiveError::InvalidArgument(format!(
                "unknown output format '{}', expected json or text",
                other
            )));
        }
    }

    if let Some(path) = &args.save {
        sim.save_data().write_to(path)?;
    }

    Ok(())
}
