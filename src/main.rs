// Clipray terminal client entry point
//
// Wires together the launcher pieces: CLI flags, config resolution,
// logging, the host bridge (daemon socket or in-process demo) and the TUI.

mod cli;
mod config;
mod history;
mod host;
mod logging;
mod model;
mod projection;
mod theme;
mod tui;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use config::Config;
use host::demo::DemoHost;
use host::socket::SocketBridge;
use host::HostBridge;
use logging::LogBuffer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    let log_buffer = LogBuffer::new();
    let _log_guard = logging::init(&config.log_dir, &config.log_filter, log_buffer.clone())
        .context("initializing logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "clipray starting");

    let bridge: Arc<dyn HostBridge> = if config.demo {
        tracing::info!("running with the in-process demo host");
        let host = Arc::new(DemoHost::seeded());
        host.spawn_capture_loop();
        host
    } else {
        tracing::info!(socket = %config.socket_path.display(), "connecting to host daemon");
        Arc::new(
            SocketBridge::connect(&config.socket_path)
                .await
                .context("is the Clipray daemon running? (try --demo)")?,
        )
    };

    // Taken once here, released when the UI returns
    let subscription = bridge.subscribe();

    tui::run(bridge, subscription, log_buffer).await
}
