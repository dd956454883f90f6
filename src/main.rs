//! # Delve Map Exporter
//!
//! Headless command-line front end for the generation core: resolves a
//! preset and style, generates a dungeon, and prints (or writes) the JSON
//! artifact.

use clap::Parser;
use delve::{generate_seeded, DelveResult, MapStyle, SizePreset, StockingConfig};
use log::info;
use std::fs;

/// Command line arguments for the Delve map exporter.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Procedural dungeon-map generator for tabletop RPG tools")]
#[command(version)]
struct Args {
    /// Size preset (small, medium, large)
    #[arg(short, long, default_value = "medium")]
    preset: String,

    /// Map style (classic, cavern, fortress, crypt)
    #[arg(short, long, default_value = "classic")]
    style: String,

    /// Random seed for reproducible maps
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Object density multiplier for stocking
    #[arg(long, default_value_t = 1.0)]
    density: f64,

    /// Disable room templates when stocking
    #[arg(long)]
    no_templates: bool,

    /// Pretty-print the JSON artifact
    #[arg(long)]
    pretty: bool,

    /// Write the artifact to a file instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> DelveResult<()> {
    env_logger::init();
    let args = Args::parse();

    let preset: SizePreset = args.preset.parse()?;
    let style: MapStyle = args.style.parse()?;
    let stocking = StockingConfig {
        object_density: args.density,
        use_templates: !args.no_templates,
        ..StockingConfig::default()
    };

    info!(
        "delve v{}: generating {:?}/{:?} with seed {}",
        delve::VERSION,
        preset,
        style,
        args.seed
    );
    let artifact = generate_seeded(preset, style, None, &stocking, args.seed)?;
    info!(
        "generated {} rooms, {} cells, {} objects",
        artifact.metadata.room_count,
        artifact.cells.len(),
        artifact.objects.len()
    );

    let json = if args.pretty {
        artifact.to_json_pretty()?
    } else {
        artifact.to_json()?
    };
    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            info!("artifact written to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
