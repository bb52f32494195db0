//! Wallet operation parameter structs and error definitions.
//!
//! The wire protocol requires integer-valued parameters (offsets, limits,
//! block indices, base-unit amounts) to be encoded as decimal strings.
//! Parameter structs do that coercion at construction so that absent
//! optional fields disappear from the payload entirely.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::amount::AmountError;
use crate::rpc::RpcError;

/// Errors from wallet client operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The RPC layer failed (transport, malformed response, or the
    /// service reported an application-level error).
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// A monetary amount failed to convert into the base-unit range.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Parameters for `import_account`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportAccountParams {
    pub mnemonic: String,
    pub key_derivation_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_block_index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_subaddress_index: Option<String>,
    /// Fog account keys, merged into the payload at the top level.
    #[serde(flatten)]
    pub fog_keys: Option<Map<String, Value>>,
}

impl ImportAccountParams {
    /// Parameters with the default key derivation version (2).
    pub fn new(mnemonic: &str) -> Self {
        Self {
            mnemonic: mnemonic.to_string(),
            key_derivation_version: "2".to_string(),
            name: None,
            first_block_index: None,
            next_subaddress_index: None,
            fog_keys: None,
        }
    }

    pub fn key_derivation_version(mut self, version: u64) -> Self {
        self.key_derivation_version = version.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn first_block_index(mut self, index: u64) -> Self {
        self.first_block_index = Some(index.to_string());
        self
    }

    pub fn next_subaddress_index(mut self, index: u64) -> Self {
        self.next_subaddress_index = Some(index.to_string());
        self
    }

    pub fn fog_keys(mut self, keys: Map<String, Value>) -> Self {
        self.fog_keys = Some(keys);
        self
    }
}

/// Parameters for `import_account_from_legacy_root_entropy`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportLegacyAccountParams {
    pub entropy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_block_index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_subaddress_index: Option<String>,
    #[serde(flatten)]
    pub fog_keys: Option<Map<String, Value>>,
}

impl ImportLegacyAccountParams {
    pub fn new(entropy: &str) -> Self {
        Self {
            entropy: entropy.to_string(),
            name: None,
            first_block_index: None,
            next_subaddress_index: None,
            fog_keys: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn first_block_index(mut self, index: u64) -> Self {
        self.first_block_index = Some(index.to_string());
        self
    }

    pub fn next_subaddress_index(mut self, index: u64) -> Self {
        self.next_subaddress_index = Some(index.to_string());
        self
    }

    pub fn fog_keys(mut self, keys: Map<String, Value>) -> Self {
        self.fog_keys = Some(keys);
        self
    }
}

/// Shared parameter shape for building or submitting transactions.
///
/// `addresses_and_values` carries base-unit amounts as decimal strings.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TransactionParams {
    pub account_id: String,
    pub addresses_and_values: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tombstone_block: Option<String>,
}
