mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, ClientConfig};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{StartupConfig, ViewerApp};

#[derive(Parser, Debug)]
#[command(about = "Browse catalog episodes and the characters appearing in them")]
struct Args {
    /// Catalog API root, e.g. https://rickandmortyapi.com/api
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn resolve_config(args: &Args) -> ClientConfig {
    let mut config = match load_settings() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("ignoring settings file: {err}");
            ClientConfig::default()
        }
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.request_timeout_secs = timeout_secs;
    }
    config
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args);
    tracing::info!(base_url = %config.base_url, "starting episode viewer");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let startup = StartupConfig {
        base_url: config.base_url.clone(),
    };
    backend_bridge::runtime::launch(cmd_rx, ui_tx, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Episode Viewer")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([820.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Episode Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::new(cmd_tx, ui_rx, startup)))),
    )
}
