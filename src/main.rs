// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The Gingerbread Village
//!
//! A desktop zoom tour through a gingerbread village, plus an animated
//! story scene of the villagers' holiday mishaps.

mod app;
mod io;
mod models;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::{AppConfig, Mode, VillageApp};
use clap::Parser;
use models::tour::Tour;
use std::path::PathBuf;

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "gingerbread", version, about = "The Gingerbread Village")]
struct Cli {
    /// Tour file (YAML or JSON). Defaults to the built-in village tour.
    #[arg(long)]
    tour: Option<PathBuf>,

    /// Directory that relative media paths resolve against.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Initial mode.
    #[arg(long, value_enum, default_value_t = Mode::Tour)]
    mode: Mode,

    /// Initial snow intensity.
    #[arg(long, default_value_t = 1.0, value_parser = parse_snow)]
    snow: f32,

    /// Start with sound on.
    #[arg(long)]
    sound: bool,

    /// Seed for the snow field.
    #[arg(long, default_value_t = 2024)]
    seed: u64,
}

fn parse_snow(value: &str) -> Result<f32, String> {
    let snow: f32 = value.parse().map_err(|e| format!("{}", e))?;
    if (0.1..=2.0).contains(&snow) {
        Ok(snow)
    } else {
        Err(format!("snow intensity must be within 0.1..=2.0, got {}", snow))
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let tour = match &cli.tour {
        Some(path) => io::serialization::import_tour(path)
            .with_context(|| format!("Could not load tour {}", path.display()))?,
        None => Tour::village(),
    };

    let config = AppConfig {
        tour,
        assets: cli.assets,
        mode: cli.mode,
        snow: cli.snow,
        sound: cli.sound,
        seed: cli.seed,
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("The Gingerbread Village"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "The Gingerbread Village",
        options,
        Box::new(|_cc| Ok(Box::new(VillageApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
