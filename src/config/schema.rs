//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Public LUKSO testnet JSON-RPC endpoint.
pub const LUKSO_TESTNET_RPC: &str = "https://rpc.testnet.lukso.network";

/// LUKSO testnet chain ID.
pub const LUKSO_TESTNET_CHAIN_ID: u64 = 4201;

/// Sequential RPC calls one submission makes in the worst case.
pub const SUBMISSION_RPC_CALLS: u64 = 8;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Chain RPC settings.
    pub blockchain: BlockchainConfig,

    /// Multisig contract settings.
    pub multisig: MultisigConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl GatewayConfig {
    /// Longest a submission can spend on RPC before every call times out.
    pub fn submission_rpc_budget_secs(&self) -> u64 {
        self.blockchain
            .rpc_timeout_secs
            .saturating_mul(SUBMISSION_RPC_CALLS)
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 90 }
    }
}

/// Chain RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Expected chain ID. Zero disables the chain ID guard.
    pub chain_id: u64,

    /// Deadline for each outbound RPC call, in seconds.
    pub rpc_timeout_secs: u64,

    /// Multiplier applied to the latest base fee (1.0 = base fee as reported).
    pub base_fee_multiplier: f64,

    /// Maximum fee cap in gwei (protection against spikes).
    pub max_fee_per_gas_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: LUKSO_TESTNET_RPC.to_string(),
            chain_id: LUKSO_TESTNET_CHAIN_ID,
            rpc_timeout_secs: 10,
            base_fee_multiplier: 1.0,
            max_fee_per_gas_gwei: 500,
        }
    }
}

/// Multisig wallet contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MultisigConfig {
    /// Deployed address of the multisig wallet contract.
    pub contract_address: String,

    /// Path to the contract's JSON ABI.
    pub abi_path: String,
}

impl Default for MultisigConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            abi_path: "multisig_abi.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 256 * 1024,
        }
    }
}
