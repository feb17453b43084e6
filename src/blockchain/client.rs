//! Chain RPC client with per-call deadlines.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (block number, chain ID, fees, nonce)
//! - Read-call contracts and estimate gas
//! - Broadcast signed transactions
//! - Bound every call with a timeout so nothing hangs

use std::future::IntoFuture;
use std::time::{Duration, Instant};

use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::observability::metrics;

/// The chain operations the gateway needs.
///
/// Implemented by [`RpcClient`] against a live endpoint; tests substitute
/// their own implementation.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Latest block number.
    async fn block_number(&self) -> BlockchainResult<u64>;

    /// Chain ID reported by the node.
    async fn chain_id(&self) -> BlockchainResult<ChainId>;

    /// Suggested priority fee (tip) in wei.
    async fn max_priority_fee_per_gas(&self) -> BlockchainResult<u128>;

    /// Base fee of the latest block in wei.
    async fn latest_base_fee(&self) -> BlockchainResult<u128>;

    /// Read-only `eth_call` against `to` at the latest block.
    async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes>;

    /// Gas estimate for a call from `from` to `to` carrying `data`.
    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> BlockchainResult<u64>;

    /// Nonce of `address` including pending transactions.
    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64>;

    /// Broadcast an EIP-2718 encoded signed transaction.
    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash>;
}

/// Parse an `eth_blockNumber` result (`0x`-prefixed hex quantity).
pub fn parse_block_number(raw: &str) -> BlockchainResult<u64> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| BlockchainError::MalformedResponse(format!("missing 0x prefix: {raw:?}")))?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(BlockchainError::MalformedResponse(format!(
            "not a hex quantity: {raw:?}"
        )));
    }

    u64::from_str_radix(digits, 16).map_err(|e| {
        BlockchainError::MalformedResponse(format!("block number {raw:?} out of range: {e}"))
    })
}

/// JSON-RPC backed [`ChainRpc`].
#[derive(Clone)]
pub struct RpcClient {
    provider: DynProvider,
    config: BlockchainConfig,
    /// Deadline applied to every call.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Build a client for the configured endpoint without touching the network.
    pub fn connect(config: BlockchainConfig) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        })
    }

    /// Build a client and probe the endpoint's chain ID.
    ///
    /// A failed or mismatching probe is logged, not returned, so the gateway
    /// can still start while the endpoint is down.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let client = Self::connect(config)?;

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %client.config.rpc_url,
                    chain_id = client.config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.chain_id().await?;
        if self.config.chain_id != 0 && chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Await an RPC future under the configured deadline.
    async fn bounded<F, T, E>(&self, method: &'static str, call: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start = Instant::now();
        let result = match timeout(self.timeout_duration, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{method}: {e}")))
            }
            Err(_) => {
                tracing::warn!(method, timeout_secs = self.timeout_duration.as_secs(), "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        };
        metrics::record_rpc_call(method, result.is_ok(), start);
        result
    }
}

#[async_trait]
impl ChainRpc for RpcClient {
    async fn block_number(&self) -> BlockchainResult<u64> {
        let raw: String = self
            .bounded(
                "eth_blockNumber",
                self.provider
                    .raw_request::<_, String>("eth_blockNumber".into(), ()),
            )
            .await?;
        parse_block_number(&raw)
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.bounded("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn max_priority_fee_per_gas(&self) -> BlockchainResult<u128> {
        self.bounded(
            "eth_maxPriorityFeePerGas",
            self.provider.get_max_priority_fee_per_gas(),
        )
        .await
    }

    async fn latest_base_fee(&self) -> BlockchainResult<u128> {
        let block = self
            .bounded(
                "eth_getBlockByNumber",
                self.provider.get_block_by_number(BlockNumberOrTag::Latest),
            )
            .await?
            .ok_or_else(|| BlockchainError::MalformedResponse("latest block not found".into()))?;

        block
            .header
            .base_fee_per_gas
            .map(u128::from)
            .ok_or(BlockchainError::MissingBaseFee)
    }

    async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        self.bounded("eth_call", self.provider.call(tx)).await
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> BlockchainResult<u64> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);
        self.bounded("eth_estimateGas", self.provider.estimate_gas(tx))
            .await
    }

    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64> {
        self.bounded(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let pending = self
            .bounded(
                "eth_sendRawTransaction",
                self.provider.send_raw_transaction(&raw),
            )
            .await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
