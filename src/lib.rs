//! Multisig gateway library.
//!
//! HTTP facade over an EVM JSON-RPC endpoint: reads the latest block height
//! and queues `submitTransaction` calls on a multisig wallet contract,
//! signed by one configured owner.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
