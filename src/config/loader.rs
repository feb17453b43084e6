//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `blockchain.rpc_url`.
pub const RPC_URL_ENV_VAR: &str = "GATEWAY_RPC_URL";
/// Overrides `multisig.contract_address`.
pub const MULTISIG_ADDRESS_ENV_VAR: &str = "GATEWAY_MULTISIG_ADDRESS";
/// Overrides `multisig.abi_path`.
pub const ABI_PATH_ENV_VAR: &str = "GATEWAY_ABI_PATH";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, apply environment overrides, validate.
///
/// A missing file is not an error when `allow_missing` is set; defaults are
/// used instead.
pub fn load_config(path: &Path, allow_missing: bool) -> Result<GatewayConfig, ConfigError> {
    let config = if allow_missing && !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        GatewayConfig::default()
    } else {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    if config.timeouts.request_secs <= config.submission_rpc_budget_secs() {
        tracing::warn!(
            request_secs = config.timeouts.request_secs,
            rpc_budget_secs = config.submission_rpc_budget_secs(),
            "Request deadline can expire before a slow submission finishes its RPC calls"
        );
    }

    Ok(config)
}

/// Overlay values from the environment onto a parsed config.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> GatewayConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(RPC_URL_ENV_VAR).filter(|v| !v.is_empty()) {
        config.blockchain.rpc_url = url;
    }
    if let Some(address) = lookup(MULTISIG_ADDRESS_ENV_VAR).filter(|v| !v.is_empty()) {
        config.multisig.contract_address = address;
    }
    if let Some(path) = lookup(ABI_PATH_ENV_VAR).filter(|v| !v.is_empty()) {
        config.multisig.abi_path = path;
    }
    config
}
