//! Shared fixtures for integration tests: an in-memory chain and HTTP helpers.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, keccak256, Address, Bytes, TxHash};
use alloy::sol_types::SolValue;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use multisig_gateway::blockchain::{BlockchainError, BlockchainResult, ChainId, ChainRpc, Wallet};
use multisig_gateway::config::GatewayConfig;
use multisig_gateway::lifecycle::startup::assemble_state;
use multisig_gateway::{AppState, HttpServer};

/// Well-known development key (first Anvil/Hardhat account).
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_SIGNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

pub const BASE_FEE: u128 = 1_000_000_000;
pub const TIP: u128 = 2_000_000_000;
pub const GAS: u64 = 95_000;
pub const START_NONCE: u64 = 7;
pub const BLOCK_NUMBER: u64 = 1_234_567;

/// In-memory chain that answers every RPC with fixed values and counts calls.
///
/// Methods are counted under their `ChainRpc` name, except read-calls which
/// are counted under the contract function (`getOwners`, `isOwner`).
pub struct MockChain {
    chain_id: u64,
    is_owner: bool,
    owners: Vec<Address>,
    always_failing: HashSet<&'static str>,
    fail_next: Mutex<HashSet<&'static str>>,
    next_nonce: AtomicU64,
    calls: Mutex<HashMap<&'static str, usize>>,
    broadcasts: Mutex<Vec<Bytes>>,
    nonce_held: AtomicBool,
    overlapped: AtomicBool,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            chain_id: 4201,
            is_owner: true,
            owners: vec![TEST_SIGNER],
            always_failing: HashSet::new(),
            fail_next: Mutex::new(HashSet::new()),
            next_nonce: AtomicU64::new(START_NONCE),
            calls: Mutex::new(HashMap::new()),
            broadcasts: Mutex::new(Vec::new()),
            nonce_held: AtomicBool::new(false),
            overlapped: AtomicBool::new(false),
        }
    }
}

impl MockChain {
    pub fn not_owner() -> Self {
        Self {
            is_owner: false,
            owners: vec![address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC")],
            ..Self::default()
        }
    }

    /// A chain reporting `chain_id`.
    pub fn with_chain_id(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Self::default()
        }
    }

    /// A chain whose `method` fails on every call.
    pub fn always_failing(method: &'static str) -> Self {
        Self {
            always_failing: HashSet::from([method]),
            ..Self::default()
        }
    }

    pub fn failing_block_number() -> Self {
        Self::always_failing("block_number")
    }

    /// Make the next call to `method` fail.
    pub fn fail_next(&self, method: &'static str) {
        self.fail_next.lock().unwrap().insert(method);
    }

    /// Number of times `method` was called.
    pub fn count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    /// Total RPC calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Raw transactions accepted by `send_raw_transaction`, in order.
    pub fn broadcasts(&self) -> Vec<Bytes> {
        self.broadcasts.lock().unwrap().clone()
    }

    /// Whether a nonce was handed out while another one was still unbroadcast.
    pub fn saw_overlap(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }

    async fn hit(&self, method: &'static str) -> BlockchainResult<()> {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
        tokio::task::yield_now().await;

        let injected = self.fail_next.lock().unwrap().remove(method);
        if injected || self.always_failing.contains(method) {
            return Err(BlockchainError::Rpc(format!("{method}: connection refused")));
        }
        Ok(())
    }
}

fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn block_number(&self) -> BlockchainResult<u64> {
        self.hit("block_number").await?;
        Ok(BLOCK_NUMBER)
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.hit("chain_id").await?;
        Ok(ChainId(self.chain_id))
    }

    async fn max_priority_fee_per_gas(&self) -> BlockchainResult<u128> {
        self.hit("max_priority_fee_per_gas").await?;
        Ok(TIP)
    }

    async fn latest_base_fee(&self) -> BlockchainResult<u128> {
        self.hit("latest_base_fee").await?;
        Ok(BASE_FEE)
    }

    async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes> {
        assert_eq!(to, CONTRACT, "calls must target the multisig");
        if data.starts_with(&selector("isOwner(address)")) {
            self.hit("isOwner").await?;
            Ok(self.is_owner.abi_encode().into())
        } else if data.starts_with(&selector("getOwners()")) {
            self.hit("getOwners").await?;
            Ok(self.owners.abi_encode().into())
        } else {
            self.hit("call").await?;
            Err(BlockchainError::Rpc("execution reverted".into()))
        }
    }

    async fn estimate_gas(&self, from: Address, to: Address, _data: Bytes) -> BlockchainResult<u64> {
        assert_eq!(from, TEST_SIGNER);
        assert_eq!(to, CONTRACT);
        self.hit("estimate_gas").await?;
        Ok(GAS)
    }

    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64> {
        assert_eq!(address, TEST_SIGNER);
        self.hit("pending_nonce").await?;
        if self.nonce_held.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        Ok(self.next_nonce.load(Ordering::SeqCst))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let outcome = self.hit("send_raw_transaction").await;
        self.nonce_held.store(false, Ordering::SeqCst);
        outcome?;

        let hash = keccak256(&raw);
        self.broadcasts.lock().unwrap().push(raw);
        self.next_nonce.fetch_add(1, Ordering::SeqCst);
        Ok(hash)
    }
}

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap()
}

pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.multisig.contract_address = CONTRACT.to_string();
    config.multisig.abi_path = concat!(env!("CARGO_MANIFEST_DIR"), "/multisig_abi.json").to_string();
    config
}

pub fn test_state(chain: Arc<MockChain>) -> AppState {
    assemble_state(test_config(), chain, test_wallet()).unwrap()
}

pub fn test_router(chain: Arc<MockChain>) -> Router {
    HttpServer::build_router(test_state(chain))
}

/// GET `path`, returning status, headers and the raw body as text.
pub async fn get(router: &Router, path: &str) -> (StatusCode, HeaderMap, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

/// POST a raw body to `path` as JSON.
pub async fn post_raw(router: &Router, path: &str, body: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub async fn post_json(router: &Router, path: &str, body: Value) -> (StatusCode, String) {
    post_raw(router, path, &body.to_string()).await
}
