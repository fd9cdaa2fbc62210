//! wpfx RPC Server - JSON-RPC backend for the prefix launcher UI.
//!
//! This binary provides a JSON-RPC 2.0 server that wraps the wpfx-core library,
//! plus a server-sent-events stream of application events.

mod events;
mod handlers;
mod server;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wpfx_core::WpfxApi;

#[derive(Parser, Debug)]
#[command(name = "wpfx-rpc")]
#[command(about = "JSON-RPC server for wpfx")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    info!("Starting wpfx RPC Server");

    let builder = match args.settings {
        Some(path) => WpfxApi::builder().settings_file(path),
        None => WpfxApi::builder(),
    };
    let api = builder.build().await?;

    let addr = server::start_server(api, &args.host, args.port).await?;

    // Print port for the UI process to read (intentional stdout for IPC)
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
