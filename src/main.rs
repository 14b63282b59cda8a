//! RPC-to-HTTP bridge (v1)
//!
//! Wraps a resource-oriented HTTP service behind Execute / Compensate /
//! HealthCheck RPC operations.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                    RPC BRIDGE                      │
//!                          │                                                    │
//!   Execute / Compensate   │  ┌────────┐   ┌──────────┐   ┌──────────────┐     │
//!   ───────────────────────┼─▶│  http  │──▶│ routing  │──▶│   invoker    │─────┼──▶ Downstream
//!                          │  │ server │   │ registry │   │ (deadline)   │     │    HTTP API
//!                          │  └────────┘   │ binder   │   └──────┬───────┘     │
//!                          │       ▲       │ verb     │          │             │
//!   RpcResult              │       │       └──────────┘          ▼             │
//!   ◀──────────────────────┼───────┴──────────────────── ┌──────────────┐      │
//!                          │                             │  normalize   │      │
//!                          │                             │  + errors    │      │
//!                          │                             └──────────────┘      │
//!                          │  ┌──────────────────────────────────────────────┐ │
//!                          │  │ config │ health probe │ observability │ life- │ │
//!                          │  │        │              │               │ cycle │ │
//!                          │  └──────────────────────────────────────────────┘ │
//!                          └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use rpc_bridge::config::{load_config, BridgeConfig};
use rpc_bridge::lifecycle;
use rpc_bridge::observability::logging;

#[derive(Parser)]
#[command(name = "rpc-bridge")]
#[command(about = "Serve a resource-oriented HTTP API as Execute/Compensate/HealthCheck RPCs", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(long)]
    bind: Option<String>,

    /// Override downstream.base_url
    #[arg(long)]
    downstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(downstream) = args.downstream {
        config.downstream.base_url = downstream;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        downstream = %config.downstream.base_url,
        request_timeout_secs = config.downstream.request_timeout_secs,
        "rpc-bridge starting"
    );

    lifecycle::start(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
