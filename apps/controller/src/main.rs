use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::ControllerSession;
use shared::domain::{CommandState, Endpoint};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod shutdown;

use config::load_settings;
use console::{ConsoleView, HELP};

#[derive(Parser, Debug)]
#[command(name = "car-controller", about = "Drive an RC car over a WebSocket control channel")]
struct Args {
    /// Vehicle address, `host:port` or a ws:// URL
    #[arg(long)]
    endpoint: Option<String>,
    /// Settings file (defaults to ./controller.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    let raw_endpoint = args.endpoint.unwrap_or(settings.endpoint);
    let endpoint = Endpoint::parse(&raw_endpoint)
        .with_context(|| format!("invalid vehicle endpoint '{raw_endpoint}'"))?;
    let initial = CommandState::with_initial(settings.initial_speed, settings.battery);

    let session = ControllerSession::connect(endpoint, initial);
    let view = ConsoleView::new(session.subscribe_snapshots(), session.subscribe_status());
    println!("{HELP}");
    println!("{}", view.render());

    let (intents_tx, intents_rx) = mpsc::channel(64);
    let updates = tokio::spawn(view.clone().print_updates());
    let input = tokio::spawn(console::forward_intents(
        console::spawn_line_reader(),
        intents_tx,
        view,
    ));

    let final_state = session.run(intents_rx, shutdown::shutdown_signal()).await;
    input.abort();
    updates.abort();

    tracing::info!(
        direction = %final_state.direction(),
        speed = final_state.speed(),
        "controller stopped"
    );
    Ok(())
}
