//! Track preview - generate a RunRun track and print its layout
//!
//! # Usage
//!
//! ```bash
//! # Step the generator one section at a time (as a game tick would)
//! track-preview --catalog assets/sections.toml --config assets/track.toml
//!
//! # Bulk generation with a fixed seed, JSON output
//! track-preview --catalog assets/sections.toml --mode bulk --seed 7 --json
//! ```
//!
//! Set `RUST_LOG=debug` to log every placement.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use runrun_track::{
    ContentRate, RoadSection, RoadSectionFactory, SectionCatalog, TrackConfig, TrackGenerator,
};

/// Generation entry point to exercise
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Pre-spawn the configured buffer, then one `spawn_next` per tick
    Step,
    /// One `spawn_all` call
    Bulk,
}

/// Generate a RunRun track from a section catalog
#[derive(Parser)]
#[command(name = "track-preview")]
#[command(version)]
struct Cli {
    /// Section catalog (TOML)
    #[arg(long)]
    catalog: PathBuf,

    /// Generation settings (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured length budget
    #[arg(long)]
    max_length: Option<f32>,

    #[arg(long, value_enum, default_value_t = Mode::Step)]
    mode: Mode,

    /// Print the layout as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = SectionCatalog::load(&cli.catalog)
        .with_context(|| format!("Failed to load catalog {}", cli.catalog.display()))?;
    let mut config = match &cli.config {
        Some(path) => TrackConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TrackConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(max_length) = cli.max_length {
        config.max_length = max_length;
    }

    let mut track = TrackGenerator::seeded(catalog, config, RoadSectionFactory)
        .context("Invalid track configuration")?;

    match cli.mode {
        Mode::Step => {
            track.pre_spawn_default();
            let mut ticks = 0u32;
            while track.spawn_next() {
                ticks += 1;
            }
            tracing::info!("Track finished after {} ticks", ticks);
        }
        Mode::Bulk => {
            let rate = ContentRate::new(track.config().coin_rate)?;
            track.spawn_all(rate);
        }
    }

    if cli.json {
        let layout = track.layout();
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    println!(
        "{:>4}  {:<14} {:>28}  {:>7}  {:>5}  {}",
        "#", "section", "entry", "length", "coins", "notes"
    );
    for (index, instance) in track.sections().iter().enumerate() {
        let road: &RoadSection = instance.section();
        let p = instance.entry().position;
        let notes = if road.is_trimmed() {
            format!("trimmed to {:.2}", road.visible_length())
        } else {
            String::new()
        };
        println!(
            "{:>4}  {:<14} {:>28}  {:>7.2}  {:>5}  {}",
            index,
            instance.descriptor().id(),
            format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z),
            instance.length(),
            road.coins().len(),
            notes
        );
    }
    println!(
        "\n{} sections, length {:.2} (trimmed {:.2}) of {:.2}",
        track.sections().len(),
        track.length(),
        track.trimmed_length(),
        track.max_length()
    );

    Ok(())
}
