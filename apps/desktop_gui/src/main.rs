use std::path::PathBuf;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use client_core::Route;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::CreatorverseApp;

#[derive(Debug, Parser)]
#[command(name = "creatorverse", about = "Browse and curate your favourite content creators")]
struct Args {
    /// Base URL of the creators backend (a Supabase project or the bundled server).
    #[arg(long)]
    backend_url: Option<String>,
    /// Key sent as `apikey` and bearer token.
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Page to open first, e.g. `/new` or `/creators/3`.
    #[arg(long, default_value = "/")]
    route: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let settings = config::load_settings(&args.config, args.backend_url, args.api_key);
    let start = Route::parse(&args.route);
    tracing::info!(backend = %settings.backend_url, %start, "starting creatorverse");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    backend_bridge::runtime::launch(settings.backend_config(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Creatorverse")
            .with_inner_size([1080.0, 760.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Creatorverse",
        options,
        Box::new(move |_cc| Ok(Box::new(CreatorverseApp::new(cmd_tx, ui_rx, start)))),
    )
    .map_err(|err| anyhow!("creatorverse window failed: {err}"))
}
