//! HTTP server command
//!
//! Connects to the database, then serves the JSON API until Ctrl+C/SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use osb_server::http::{run_server, ServerConfig};

use super::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Address to bind the API to
    #[arg(long, short = 'b', env = "OSB_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db = args.db.connect().await?;

    tracing::info!("Starting OSB API on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
    };

    // Run server (blocks until shutdown)
    run_server(db, config).await.context("Server error")?;

    Ok(())
}
