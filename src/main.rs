mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use app::BandCompareApp;
use clap::Parser;
use config::AnalysisConfig;
use data::session::Session;
use eframe::egui;
use state::AppState;

/// Compare per-electrode EEG band power across subject groups.
#[derive(Parser)]
#[command(name = "eeg-band-compare", version, about, long_about = None)]
struct Cli {
    /// Band-power table to open at startup (.csv, .tsv, .parquet, .json)
    path: Option<PathBuf>,

    /// JSON file with band prefixes, montage and grouping column
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the grouping column (overrides the config file)
    #[arg(long)]
    group_column: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(column) = cli.group_column {
        config.group_column = column;
        config.validate()?;
    }

    // A dataset named on the command line must load before any window opens.
    let session = cli
        .path
        .as_deref()
        .map(|path| Session::open(path, &config))
        .transpose()?;
    let state = AppState::new(config, session);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "EEG Band Compare",
        options,
        Box::new(|_cc| Ok(Box::new(BandCompareApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the viewer: {e}"))
}
