//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the signing identity from the environment
//! - Load the contract ABI
//! - Connect the chain RPC client
//! - Assemble the immutable [`AppState`]
//!
//! Any error here is fatal; the process does not start serving.

use std::path::Path;
use std::sync::Arc;

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::{
    AbiError, BlockchainError, ChainRpc, MultisigAbi, MultisigSubmitter, RpcClient, Wallet,
};
use crate::config::GatewayConfig;
use crate::http::AppState;

/// Reasons the gateway cannot start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("signing key: {0}")]
    Wallet(#[source] BlockchainError),

    #[error("contract ABI: {0}")]
    Abi(#[from] AbiError),

    #[error("invalid multisig address '{0}'")]
    ContractAddress(String),

    #[error("RPC client: {0}")]
    Rpc(#[source] BlockchainError),
}

/// Build application state from a validated config and the environment.
pub async fn build_state(config: GatewayConfig) -> Result<AppState, StartupError> {
    let wallet = Wallet::from_env().map_err(StartupError::Wallet)?;
    let client = RpcClient::new(config.blockchain.clone())
        .await
        .map_err(StartupError::Rpc)?;

    assemble_state(config, Arc::new(client), wallet)
}

/// Wire state around an existing chain client and wallet.
pub fn assemble_state(
    config: GatewayConfig,
    chain: Arc<dyn ChainRpc>,
    wallet: Wallet,
) -> Result<AppState, StartupError> {
    let abi = MultisigAbi::load(Path::new(&config.multisig.abi_path))?;

    let contract: Address = config
        .multisig
        .contract_address
        .parse()
        .map_err(|_| StartupError::ContractAddress(config.multisig.contract_address.clone()))?;

    let submitter = MultisigSubmitter::new(
        chain.clone(),
        Arc::new(abi),
        wallet,
        contract,
        config.blockchain.clone(),
    );
    tracing::info!(
        contract = %submitter.contract(),
        signer = %submitter.signer(),
        "Multisig submitter ready"
    );

    Ok(AppState::new(config, chain, submitter))
}
