mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::anyhow;
use app::HrDashboardApp;
use clap::Parser;
use config::AppConfig;
use eframe::egui;

/// Interactive HR analytics dashboard.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// HR data file (csv, json or parquet); overrides the configured one.
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.config.as_deref(), cli.data)?;
    log::info!("Starting with data file {}", config.data_file.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let title = config.app_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(HrDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
