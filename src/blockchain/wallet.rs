//! Signing identity and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use std::sync::Arc;

use alloy::consensus::{SignableTransaction, Signed, TxEip1559};
use alloy::network::TxSignerSync;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tokio::sync::{Mutex, MutexGuard};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "GATEWAY_SIGNER_PRIVATE_KEY";

/// The gateway's signing identity.
///
/// Clones share the same submission lock, so every holder of this identity
/// serializes nonce-sensitive work through it.
#[derive(Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Held from nonce lookup through broadcast.
    submission_lock: Arc<Mutex<()>>,
}

impl Wallet {
    /// Parse a hex secp256k1 key, `0x` prefix optional. Only the derived
    /// address is ever logged.
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self {
            signer,
            submission_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Load the signing key from `GATEWAY_SIGNER_PRIVATE_KEY`.
    pub fn from_env() -> BlockchainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Address derived from the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Serialize nonce-sensitive work for this identity.
    pub async fn lock_submissions(&self) -> MutexGuard<'_, ()> {
        self.submission_lock.lock().await
    }

    /// Sign an EIP-1559 transaction. The chain ID set on `tx` is bound into
    /// the signature.
    pub fn sign_transaction(&self, mut tx: TxEip1559) -> BlockchainResult<Signed<TxEip1559>> {
        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;
        Ok(tx.into_signed(signature))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes, TxKind, U256};

    // Anvil account #0
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_tx() -> TxEip1559 {
        TxEip1559 {
            chain_id: 4201,
            nonce: 7,
            gas_limit: 120_000,
            max_fee_per_gas: 8_500_000_000,
            max_priority_fee_per_gas: 1_500_000_000,
            to: TxKind::Call(address!("5FbDB2315678afecb367f032d93F642f64180aa3")),
            value: U256::ZERO,
            access_list: Default::default(),
            input: Bytes::from(vec![0xc6, 0x42, 0x74, 0x74]),
        }
    }

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            wallet.address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(!debug.contains(TEST_PRIVATE_KEY));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let a = wallet.sign_transaction(test_tx()).unwrap();
        let b = wallet.sign_transaction(test_tx()).unwrap();
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_signature_recovers_signer() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let signed = wallet.sign_transaction(test_tx()).unwrap();
        let recovered = signed
            .signature()
            .recover_address_from_prehash(&signed.tx().signature_hash())
            .unwrap();
        assert_eq!(recovered, wallet.address());
    }

    #[test]
    fn test_chain_id_bound_into_hash() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let mut other = test_tx();
        other.chain_id = 42;
        let a = wallet.sign_transaction(test_tx()).unwrap();
        let b = wallet.sign_transaction(other).unwrap();
        assert_ne!(a.hash(), b.hash());
    }

    #[tokio::test]
    async fn test_clones_share_submission_lock() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let clone = wallet.clone();

        let _guard = wallet.lock_submissions().await;
        assert!(clone.submission_lock.try_lock().is_err());
    }
}
