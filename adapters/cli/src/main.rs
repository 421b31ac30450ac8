#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Hillside experience.

mod session;
mod terrain_transfer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hillside_core::TileCoord;
use hillside_rendering_macroquad::{MacroquadBackend, Palette};
use hillside_system_worldgen::{generate, GenerationConfig};
use hillside_world::WorldConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::session::Session;

/// Side length of a world tile in world units (16-pixel art at 3x scale).
const TILE_LENGTH: f32 = 48.0;

#[derive(Debug, Parser)]
#[command(name = "hillside", about = "Procedurally generated side-scrolling sandbox")]
struct Args {
    /// Seed driving terrain generation and world randomness.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of tile columns to generate.
    #[arg(long, default_value_t = 70)]
    columns: u32,

    /// Enable the free-camera toggle capability.
    #[arg(long)]
    free_camera: bool,

    /// Render as fast as possible instead of syncing to the display.
    #[arg(long)]
    no_vsync: bool,

    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,

    /// Simulate the given number of frames without opening a window.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,

    /// Print the terrain as a transfer string and exit.
    #[arg(long)]
    export_terrain: bool,

    /// Install a terrain from a transfer string instead of generating one.
    #[arg(long, value_name = "CODE")]
    terrain: Option<String>,

    /// Load tile and entity colors from a palette manifest.
    #[arg(long, value_name = "PATH")]
    palette: Option<PathBuf>,
}

/// Entry point for the Hillside command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let layout = match &args.terrain {
        Some(code) => terrain_transfer::decode(code)
            .context("failed to decode the provided terrain transfer string")?,
        None => {
            let generation = GenerationConfig::new(TileCoord::new(args.columns), TILE_LENGTH)
                .context("invalid generation parameters")?;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            generate(&generation, &mut rng)
        }
    };
    log::info!(
        "seed {seed}: {} tiles across {} columns",
        layout.tiles().len(),
        layout.columns().get()
    );

    if args.export_terrain {
        println!("{}", terrain_transfer::encode(&layout));
        return Ok(());
    }

    let config = WorldConfig::new(layout.columns(), layout.tile_length(), seed)
        .context("invalid world configuration")?
        .with_free_camera(args.free_camera);
    let mut session = Session::new(config, layout);
    println!("{}", session.banner());

    if let Some(frames) = args.headless {
        println!("{}", session.run_headless(frames));
        return Ok(());
    }

    let palette = match &args.palette {
        Some(path) => Palette::from_manifest_path(path)?,
        None => Palette::default(),
    };
    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_palette(palette.clone());
    session.run_windowed(backend, palette.background())
}
