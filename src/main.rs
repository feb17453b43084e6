//! Multisig gateway.
//!
//! ```text
//!   Client ──HTTP──▶ axum router ──▶ handlers ──▶ MultisigSubmitter ──JSON-RPC──▶ chain
//!                       │                              │
//!                       │                              ├─ MultisigAbi (multisig_abi.json)
//!                       │                              └─ Wallet (GATEWAY_SIGNER_PRIVATE_KEY)
//!                       └─ /health, /docs (no chain access)
//! ```
//!
//! Usage: `multisig-gateway [CONFIG_PATH]` (default `gateway.toml`; a missing
//! default file means built-in defaults plus environment overrides).

use std::path::PathBuf;

use tokio::net::TcpListener;

use multisig_gateway::config::load_config;
use multisig_gateway::lifecycle::{build_state, signals, Shutdown};
use multisig_gateway::observability::{logging, metrics};
use multisig_gateway::HttpServer;

const DEFAULT_CONFIG_PATH: &str = "gateway.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let explicit_path = std::env::args().nth(1).map(PathBuf::from);
    let allow_missing = explicit_path.is_none();
    let config_path = explicit_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match load_config(&config_path, allow_missing) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            tracing::error!(path = %config_path.display(), error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("multisig-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        contract = %config.multisig.contract_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let state = build_state(config).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    HttpServer::new(state).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
