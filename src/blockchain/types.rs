//! Chain-specific types and error definitions.

use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// RPC returned something that is not what the method promises.
    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Contract call could not be encoded or its output decoded.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Fee cap exceeded maximum allowed.
    #[error("Fee cap {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    FeeTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Latest block carries no base fee (pre-London chain).
    #[error("Latest block has no base fee")]
    MissingBaseFee,

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// EIP-1559 fee parameters for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeParams {
    /// Fee cap (`maxFeePerGas`) in wei.
    pub max_fee_per_gas: u128,
    /// Tip (`maxPriorityFeePerGas`) in wei.
    pub max_priority_fee_per_gas: u128,
}

impl FeeParams {
    /// Derive fee parameters from the latest base fee and the suggested tip.
    ///
    /// `maxFeePerGas = baseFee * multiplier + tip`, rejected when it exceeds
    /// `max_fee_gwei`.
    pub fn from_base_fee(
        base_fee: u128,
        priority_fee: u128,
        multiplier: f64,
        max_fee_gwei: u64,
    ) -> BlockchainResult<Self> {
        let scaled_base = if multiplier == 1.0 {
            base_fee
        } else {
            (base_fee as f64 * multiplier) as u128
        };
        let max_fee_per_gas = scaled_base.saturating_add(priority_fee);

        let max_fee_wei = max_fee_gwei as u128 * 1_000_000_000;
        if max_fee_per_gas > max_fee_wei {
            return Err(BlockchainError::FeeTooHigh {
                current_gwei: u64::try_from(max_fee_per_gas / 1_000_000_000).unwrap_or(u64::MAX),
                max_gwei: max_fee_gwei,
            });
        }

        Ok(Self {
            max_fee_per_gas,
            max_priority_fee_per_gas: priority_fee,
        })
    }
}
