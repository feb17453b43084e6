//! Multisig transaction submission.
//!
//! # Responsibilities
//! - Validate the caller's request before any network I/O
//! - Verify the signing identity is an owner of the multisig
//! - Derive EIP-1559 fees, estimate gas, fetch the pending nonce
//! - Sign `submitTransaction(to, value, data)` and broadcast it
//!
//! # Data Flow
//! ```text
//! MultisigCall (validated)
//!     → getOwners (logged)
//!     → isOwner(signer) ── false ──▶ NotOwner (no further calls)
//!     → chainId, priority fee, base fee
//!     → encode submitTransaction → estimateGas
//!     → [submission lock] pending nonce → sign → sendRawTransaction
//!     → SubmissionReceipt
//! ```

use std::str::FromStr;
use std::sync::Arc;

use alloy::consensus::{TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};
use thiserror::Error;

use crate::blockchain::abi::MultisigAbi;
use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{BlockchainConfig, BlockchainError, FeeParams};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Why a submission failed.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Caller input is malformed.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The signing identity is not a registered owner of the multisig.
    #[error("address {0} is not an owner")]
    NotOwner(Address),

    /// A downstream step failed.
    #[error("{step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: BlockchainError,
    },
}

impl SubmitError {
    fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Short outcome label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Validation { .. } => "invalid",
            SubmitError::NotOwner(_) => "not_owner",
            SubmitError::Step { .. } => "failed",
        }
    }
}

/// Attach step context to a blockchain error.
trait StepContext<T> {
    fn step(self, step: &'static str) -> Result<T, SubmitError>;
}

impl<T, E: Into<BlockchainError>> StepContext<T> for Result<T, E> {
    fn step(self, step: &'static str) -> Result<T, SubmitError> {
        self.map_err(|e| SubmitError::Step {
            step,
            source: e.into(),
        })
    }
}

/// A validated request to queue a call on the multisig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigCall {
    /// Final destination of the multisig transaction.
    pub to: Address,
    /// Native value in wei.
    pub value: U256,
    /// Calldata forwarded by the multisig.
    pub data: Bytes,
}

impl MultisigCall {
    /// Validate raw request fields.
    ///
    /// `value` is a base-10 integer in wei; `data` is hex with an optional
    /// `0x` prefix and may be empty.
    pub fn parse(to: &str, value: &str, data: &str) -> Result<Self, SubmitError> {
        let to = Address::from_str(to.trim())
            .map_err(|e| SubmitError::validation("to", e.to_string()))?;

        let value = value.trim();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SubmitError::validation(
                "value",
                format!("{value:?} is not a base-10 integer"),
            ));
        }
        let value = U256::from_str_radix(value, 10)
            .map_err(|e| SubmitError::validation("value", e.to_string()))?;

        let data = data.trim();
        let data = if data.is_empty() || data == "0x" {
            Bytes::new()
        } else {
            alloy::hex::decode(data)
                .map(Bytes::from)
                .map_err(|e| SubmitError::validation("data", e.to_string()))?
        };

        Ok(Self { to, value, data })
    }
}

/// Result of a successful broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Hash of the broadcast transaction.
    pub tx_hash: TxHash,
    /// Address that signed it.
    pub signer: Address,
    /// Nonce it was sent with.
    pub nonce: u64,
}

/// Submits calls to a multisig wallet on behalf of one owner.
pub struct MultisigSubmitter {
    chain: Arc<dyn ChainRpc>,
    abi: Arc<MultisigAbi>,
    wallet: Wallet,
    contract: Address,
    config: BlockchainConfig,
}

impl MultisigSubmitter {
    pub fn new(
        chain: Arc<dyn ChainRpc>,
        abi: Arc<MultisigAbi>,
        wallet: Wallet,
        contract: Address,
        config: BlockchainConfig,
    ) -> Self {
        Self {
            chain,
            abi,
            wallet,
            contract,
            config,
        }
    }

    /// Address of the multisig contract.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Address of the signing identity.
    pub fn signer(&self) -> Address {
        self.wallet.address()
    }

    /// Run the full submission. No step is retried.
    pub async fn submit(&self, call: MultisigCall) -> Result<SubmissionReceipt, SubmitError> {
        let result = self.submit_inner(&call).await;
        match &result {
            Ok(receipt) => {
                metrics::record_submission("submitted");
                tracing::info!(
                    tx_hash = %receipt.tx_hash,
                    nonce = receipt.nonce,
                    to = %call.to,
                    value = %call.value,
                    "Transaction submitted"
                );
            }
            Err(e) => {
                metrics::record_submission(e.kind());
                tracing::warn!(error = %e, to = %call.to, "Submission failed");
            }
        }
        result
    }

    async fn submit_inner(&self, call: &MultisigCall) -> Result<SubmissionReceipt, SubmitError> {
        let signer = self.wallet.address();

        let owners = self.owners().await.step("failed to get owners")?;
        tracing::info!(contract = %self.contract, ?owners, "Multisig owners");

        let is_owner = self.is_owner(signer).await.step("failed to check owner")?;
        tracing::info!(signer = %signer, is_owner, "Ownership check");
        if !is_owner {
            return Err(SubmitError::NotOwner(signer));
        }

        let chain_id = self.chain.chain_id().await.step("failed to fetch chain ID")?;
        if self.config.chain_id != 0 && chain_id.0 != self.config.chain_id {
            return Err(SubmitError::Step {
                step: "refusing to sign",
                source: BlockchainError::ChainMismatch {
                    expected: self.config.chain_id,
                    actual: chain_id.0,
                },
            });
        }

        let priority_fee = self
            .chain
            .max_priority_fee_per_gas()
            .await
            .step("failed to fetch gas tip cap")?;
        let base_fee = self
            .chain
            .latest_base_fee()
            .await
            .step("failed to fetch latest block")?;
        let fees = FeeParams::from_base_fee(
            base_fee,
            priority_fee,
            self.config.base_fee_multiplier,
            self.config.max_fee_per_gas_gwei,
        )
        .step("fee cap rejected")?;

        let input = self
            .abi
            .encode_submit_transaction(call.to, call.value, &call.data)
            .step("failed to pack call data")?;

        let gas_limit = self
            .chain
            .estimate_gas(signer, self.contract, input.clone())
            .await
            .step("failed to estimate gas")?;

        let _guard = self.wallet.lock_submissions().await;

        let nonce = self
            .chain
            .pending_nonce(signer)
            .await
            .step("failed to fetch nonce")?;

        let tx = TxEip1559 {
            chain_id: chain_id.0,
            nonce,
            gas_limit,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
            to: TxKind::Call(self.contract),
            value: U256::ZERO,
            access_list: Default::default(),
            input,
        };
        tracing::debug!(
            nonce,
            gas_limit,
            max_fee_per_gas = fees.max_fee_per_gas,
            max_priority_fee_per_gas = fees.max_priority_fee_per_gas,
            "Signing transaction"
        );

        let signed = self.wallet.sign_transaction(tx).step("failed to sign transaction")?;
        let envelope = TxEnvelope::from(signed);
        let raw = Bytes::from(envelope.encoded_2718());
        let local_hash = *envelope.tx_hash();

        let tx_hash = self
            .chain
            .send_raw_transaction(raw)
            .await
            .step("failed to send transaction")?;
        if tx_hash != local_hash {
            tracing::warn!(%tx_hash, %local_hash, "Node reported a different transaction hash");
        }

        Ok(SubmissionReceipt {
            tx_hash: local_hash,
            signer,
            nonce,
        })
    }

    async fn owners(&self) -> Result<Vec<Address>, BlockchainError> {
        let output = self
            .chain
            .call(self.contract, self.abi.encode_get_owners()?)
            .await?;
        Ok(self.abi.decode_get_owners(&output)?)
    }

    async fn is_owner(&self, address: Address) -> Result<bool, BlockchainError> {
        let output = self
            .chain
            .call(self.contract, self.abi.encode_is_owner(address)?)
            .await?;
        Ok(self.abi.decode_is_owner(&output)?)
    }
}
