//! Multisig contract interface, loaded from a JSON ABI.

use std::path::Path;

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, Bytes, U256};
use thiserror::Error;

use crate::blockchain::types::BlockchainError;

/// Functions the gateway calls on the multisig.
pub const GET_OWNERS: &str = "getOwners";
pub const IS_OWNER: &str = "isOwner";
pub const SUBMIT_TRANSACTION: &str = "submitTransaction";

/// Errors raised while loading or using the contract ABI.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("failed to read ABI file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse contract ABI: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("ABI has no function {0}")]
    MissingFunction(&'static str),

    #[error("failed to encode {function}: {reason}")]
    Encode {
        function: &'static str,
        reason: String,
    },

    #[error("failed to decode {function} output: {reason}")]
    Decode {
        function: &'static str,
        reason: String,
    },
}

/// Parsed multisig wallet interface.
///
/// Immutable after load and cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct MultisigAbi {
    get_owners: Function,
    is_owner: Function,
    submit_transaction: Function,
}

impl MultisigAbi {
    /// Read and parse an ABI file.
    pub fn load(path: &Path) -> Result<Self, AbiError> {
        let json = std::fs::read_to_string(path).map_err(|source| AbiError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let abi = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), "Contract ABI loaded");
        Ok(abi)
    }

    /// Parse an ABI from its JSON text, requiring every function the
    /// submitter uses.
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let abi: JsonAbi = serde_json::from_str(json)?;
        Ok(Self {
            get_owners: lookup(&abi, GET_OWNERS)?,
            is_owner: lookup(&abi, IS_OWNER)?,
            submit_transaction: lookup(&abi, SUBMIT_TRANSACTION)?,
        })
    }

    /// Calldata for `getOwners()`.
    pub fn encode_get_owners(&self) -> Result<Bytes, AbiError> {
        encode(&self.get_owners, GET_OWNERS, &[])
    }

    /// Decode the `address[]` returned by `getOwners()`.
    pub fn decode_get_owners(&self, output: &[u8]) -> Result<Vec<Address>, AbiError> {
        let values = decode(&self.get_owners, GET_OWNERS, output)?;
        let invalid = || AbiError::Decode {
            function: GET_OWNERS,
            reason: "expected address[]".into(),
        };

        let owners = values.into_iter().next().ok_or_else(invalid)?;
        let owners = owners.as_array().ok_or_else(invalid)?;
        owners
            .iter()
            .map(|v| v.as_address().ok_or_else(invalid))
            .collect()
    }

    /// Calldata for `isOwner(address)`.
    pub fn encode_is_owner(&self, owner: Address) -> Result<Bytes, AbiError> {
        encode(&self.is_owner, IS_OWNER, &[DynSolValue::Address(owner)])
    }

    /// Decode the `bool` returned by `isOwner(address)`.
    pub fn decode_is_owner(&self, output: &[u8]) -> Result<bool, AbiError> {
        decode(&self.is_owner, IS_OWNER, output)?
            .first()
            .and_then(DynSolValue::as_bool)
            .ok_or(AbiError::Decode {
                function: IS_OWNER,
                reason: "expected bool".into(),
            })
    }

    /// Calldata for `submitTransaction(address,uint256,bytes)`.
    pub fn encode_submit_transaction(
        &self,
        to: Address,
        value: U256,
        data: &Bytes,
    ) -> Result<Bytes, AbiError> {
        encode(
            &self.submit_transaction,
            SUBMIT_TRANSACTION,
            &[
                DynSolValue::Address(to),
                DynSolValue::Uint(value, 256),
                DynSolValue::Bytes(data.to_vec()),
            ],
        )
    }
}

impl From<AbiError> for BlockchainError {
    fn from(e: AbiError) -> Self {
        BlockchainError::Abi(e.to_string())
    }
}

fn lookup(abi: &JsonAbi, name: &'static str) -> Result<Function, AbiError> {
    abi.function(name)
        .and_then(|overloads| overloads.first())
        .cloned()
        .ok_or(AbiError::MissingFunction(name))
}

fn encode(function: &Function, name: &'static str, args: &[DynSolValue]) -> Result<Bytes, AbiError> {
    function
        .abi_encode_input(args)
        .map(Bytes::from)
        .map_err(|e| AbiError::Encode {
            function: name,
            reason: e.to_string(),
        })
}

fn decode(function: &Function, name: &'static str, output: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    function
        .abi_decode_output(output)
        .map_err(|e| AbiError::Decode {
            function: name,
            reason: e.to_string(),
        })
}
