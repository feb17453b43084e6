//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) → wallet.rs (key loading, signing)
//! multisig_abi.json                   → abi.rs (call encoding/decoding)
//! Config (RPC URL)                    → client.rs (RPC calls with timeouts)
//!                                     → transaction.rs (ownership check,
//!                                       fees, sign, broadcast)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod abi;
pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use abi::{AbiError, MultisigAbi};
pub use client::{ChainRpc, RpcClient};
pub use transaction::{MultisigCall, MultisigSubmitter, SubmissionReceipt, SubmitError};
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId, FeeParams};
pub use wallet::Wallet;
