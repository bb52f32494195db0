//! Typed wallet operations over the JSON-RPC client.
//!
//! # Responsibilities
//! - Shape parameters (amount conversion, integer-to-string coercion)
//! - Invoke the RPC layer, one remote call per method
//! - Project the documented field out of each result
//!
//! Server-defined structures (accounts, txos, transaction logs, gift codes)
//! pass through as opaque `serde_json::Value`s; only the handful of status
//! fields used by the pollers are ever interpreted.

use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Duration;

use crate::amount;
use crate::rpc::{RpcClient, RpcError};
use crate::wallet::types::{
    ImportAccountParams, ImportLegacyAccountParams, TransactionParams, WalletError, WalletResult,
};

/// High-level client for the remote wallet service.
#[derive(Debug)]
pub struct WalletClient {
    rpc: RpcClient,
}

/// Pull a named field out of an unwrapped result.
fn project(result: Value, key: &str) -> WalletResult<Value> {
    match result.get(key) {
        Some(value) => Ok(value.clone()),
        None => Err(RpcError::MalformedResponse(format!(
            "result is missing the `{}` field",
            key
        ))
        .into()),
    }
}

/// Encode a parameter struct for the wire.
fn encode<T: serde::Serialize>(params: &T) -> WalletResult<Value> {
    serde_json::to_value(params).map_err(|e| {
        WalletError::from(RpcError::MalformedResponse(format!(
            "could not encode params: {}",
            e
        )))
    })
}

impl WalletClient {
    /// Create a client for the given endpoint.
    pub fn new(url: &str, verbose: bool, timeout: Duration) -> WalletResult<Self> {
        Ok(Self {
            rpc: RpcClient::new(url, verbose, timeout)?,
        })
    }

    /// Client against the default local endpoint.
    pub fn default_local() -> Self {
        Self {
            rpc: RpcClient::default_local(),
        }
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        self.rpc.url()
    }

    /// Number of successful calls made through this client.
    pub fn query_count(&self) -> u64 {
        self.rpc.query_count()
    }

    // ========== Accounts ==========

    pub async fn create_account(&self, name: Option<&str>) -> WalletResult<Value> {
        let params = match name {
            Some(name) => json!({ "name": name }),
            None => json!({}),
        };
        let r = self.rpc.call("create_account", Some(params)).await?;
        project(r, "account")
    }

    pub async fn import_account(&self, params: ImportAccountParams) -> WalletResult<Value> {
        let r = self
            .rpc
            .call("import_account", Some(encode(&params)?))
            .await?;
        project(r, "account")
    }

    pub async fn import_account_from_legacy_root_entropy(
        &self,
        params: ImportLegacyAccountParams,
    ) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "import_account_from_legacy_root_entropy",
                Some(encode(&params)?),
            )
            .await?;
        project(r, "account")
    }

    pub async fn get_all_accounts(&self) -> WalletResult<Value> {
        let r = self.rpc.call("get_all_accounts", None).await?;
        project(r, "account_map")
    }

    pub async fn get_account(&self, account_id: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call("get_account", Some(json!({ "account_id": account_id })))
            .await?;
        project(r, "account")
    }

    pub async fn update_account_name(&self, account_id: &str, name: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "update_account_name",
                Some(json!({ "account_id": account_id, "name": name })),
            )
            .await?;
        project(r, "account")
    }

    pub async fn remove_account(&self, account_id: &str) -> WalletResult<Value> {
        Ok(self
            .rpc
            .call("remove_account", Some(json!({ "account_id": account_id })))
            .await?)
    }

    pub async fn export_account_secrets(&self, account_id: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "export_account_secrets",
                Some(json!({ "account_id": account_id })),
            )
            .await?;
        project(r, "account_secrets")
    }

    // ========== Txos, network status, balances ==========

    pub async fn get_all_txos_for_account(&self, account_id: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "get_all_txos_for_account",
                Some(json!({ "account_id": account_id })),
            )
            .await?;
        project(r, "txo_map")
    }

    pub async fn get_txo(&self, txo_id: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call("get_txo", Some(json!({ "txo_id": txo_id })))
            .await?;
        project(r, "txo")
    }

    pub async fn get_network_status(&self) -> WalletResult<Value> {
        let r = self.rpc.call("get_network_status", None).await?;
        project(r, "network_status")
    }

    pub async fn get_balance_for_account(&self, account_id: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "get_balance_for_account",
                Some(json!({ "account_id": account_id })),
            )
            .await?;
        project(r, "balance")
    }

    pub async fn get_balance_for_address(&self, address: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "get_balance_for_address",
                Some(json!({ "address": address })),
            )
            .await?;
        project(r, "balance")
    }

    // ========== Addresses ==========

    /// Assign a new subaddress. `metadata` defaults to the empty string on
    /// the wire; this is the one place the remote contract expects an
    /// empty-string sentinel instead of an absent key.
    pub async fn assign_address_for_account(
        &self,
        account_id: &str,
        metadata: Option<&str>,
    ) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "assign_address_for_account",
                Some(json!({
                    "account_id": account_id,
                    "metadata": metadata.unwrap_or(""),
                })),
            )
            .await?;
        project(r, "address")
    }

    pub async fn get_addresses_for_account(
        &self,
        account_id: &str,
        offset: u64,
        limit: u64,
    ) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "get_addresses_for_account",
                Some(json!({
                    "account_id": account_id,
                    "offset": offset.to_string(),
                    "limit": limit.to_string(),
                })),
            )
            .await?;
        project(r, "address_map")
    }

    // ========== Transactions ==========

    async fn build_and_submit(
        &self,
        account_id: &str,
        amount: Decimal,
        to_address: &str,
        fee: Option<Decimal>,
    ) -> WalletResult<Value> {
        let value = amount::to_base_units(amount)?.to_string();
        let fee = match fee {
            Some(f) => Some(amount::to_base_units(f)?.to_string()),
            None => None,
        };
        let params = TransactionParams {
            account_id: account_id.to_string(),
            addresses_and_values: vec![(to_address.to_string(), value)],
            fee,
            tombstone_block: None,
        };
        Ok(self
            .rpc
            .call("build_and_submit_transaction", Some(encode(&params)?))
            .await?)
    }

    /// Build and submit in one remote call, returning the transaction log.
    pub async fn build_and_submit_transaction(
        &self,
        account_id: &str,
        amount: Decimal,
        to_address: &str,
        fee: Option<Decimal>,
    ) -> WalletResult<Value> {
        let r = self.build_and_submit(account_id, amount, to_address, fee).await?;
        project(r, "transaction_log")
    }

    /// Build and submit in one remote call, returning both the transaction
    /// log and the tx proposal for callers that need the full result.
    pub async fn build_and_submit_transaction_with_proposal(
        &self,
        account_id: &str,
        amount: Decimal,
        to_address: &str,
        fee: Option<Decimal>,
    ) -> WalletResult<(Value, Value)> {
        let r = self.build_and_submit(account_id, amount, to_address, fee).await?;
        let log = project(r.clone(), "transaction_log")?;
        let proposal = project(r, "tx_proposal")?;
        Ok((log, proposal))
    }

    pub async fn build_transaction(
        &self,
        account_id: &str,
        amount: Decimal,
        to_address: &str,
        tombstone_block: Option<u64>,
        fee: Option<Decimal>,
    ) -> WalletResult<Value> {
        let value = amount::to_base_units(amount)?.to_string();
        let fee = match fee {
            Some(f) => Some(amount::to_base_units(f)?.to_string()),
            None => None,
        };
        let params = TransactionParams {
            account_id: account_id.to_string(),
            addresses_and_values: vec![(to_address.to_string(), value)],
            fee,
            tombstone_block: tombstone_block.map(|b| b.to_string()),
        };
        let r = self
            .rpc
            .call("build_transaction", Some(encode(&params)?))
            .await?;
        project(r, "tx_proposal")
    }

    /// Submit a previously built proposal. `account_id` is needed only
    /// when the submission should be logged against a local account; it
    /// is left off the wire entirely when absent.
    pub async fn submit_transaction(
        &self,
        tx_proposal: Value,
        account_id: Option<&str>,
    ) -> WalletResult<Value> {
        let params = match account_id {
            Some(account_id) => json!({
                "tx_proposal": tx_proposal,
                "account_id": account_id,
            }),
            None => json!({ "tx_proposal": tx_proposal }),
        };
        let r = self.rpc.call("submit_transaction", Some(params)).await?;
        project(r, "transaction_log")
    }

    pub async fn get_all_transaction_logs_for_account(
        &self,
        account_id: &str,
    ) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "get_all_transaction_logs_for_account",
                Some(json!({ "account_id": account_id })),
            )
            .await?;
        project(r, "transaction_log_map")
    }

    pub async fn get_transaction_log(&self, transaction_log_id: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "get_transaction_log",
                Some(json!({ "transaction_log_id": transaction_log_id })),
            )
            .await?;
        project(r, "transaction_log")
    }

    // ========== Receipts ==========

    pub async fn create_receiver_receipts(&self, tx_proposal: Value) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "create_receiver_receipts",
                Some(json!({ "tx_proposal": tx_proposal })),
            )
            .await?;
        project(r, "receiver_receipts")
    }

    pub async fn check_receiver_receipt_status(
        &self,
        address: &str,
        receipt: Value,
    ) -> WalletResult<Value> {
        Ok(self
            .rpc
            .call(
                "check_receiver_receipt_status",
                Some(json!({
                    "address": address,
                    "receiver_receipt": receipt,
                })),
            )
            .await?)
    }

    // ========== Gift codes ==========

    pub async fn build_gift_code(
        &self,
        account_id: &str,
        amount: Decimal,
        memo: &str,
    ) -> WalletResult<Value> {
        let value = amount::to_base_units(amount)?.to_string();
        Ok(self
            .rpc
            .call(
                "build_gift_code",
                Some(json!({
                    "account_id": account_id,
                    "value_pmob": value,
                    "memo": memo,
                })),
            )
            .await?)
    }

    pub async fn submit_gift_code(
        &self,
        gift_code_b58: &str,
        tx_proposal: Value,
        from_account_id: &str,
    ) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "submit_gift_code",
                Some(json!({
                    "gift_code_b58": gift_code_b58,
                    "tx_proposal": tx_proposal,
                    "from_account_id": from_account_id,
                })),
            )
            .await?;
        project(r, "gift_code")
    }

    pub async fn get_gift_code(&self, gift_code_b58: &str) -> WalletResult<Value> {
        let r = self
            .rpc
            .call(
                "get_gift_code",
                Some(json!({ "gift_code_b58": gift_code_b58 })),
            )
            .await?;
        project(r, "gift_code")
    }

    pub async fn check_gift_code_status(&self, gift_code_b58: &str) -> WalletResult<Value> {
        Ok(self
            .rpc
            .call(
                "check_gift_code_status",
                Some(json!({ "gift_code_b58": gift_code_b58 })),
            )
            .await?)
    }

    pub async fn get_all_gift_codes(&self) -> WalletResult<Value> {
        let r = self.rpc.call("get_all_gift_codes", None).await?;
        project(r, "gift_codes")
    }

    /// Claim a gift code into an account, returning the claiming txo id.
    pub async fn claim_gift_code(
        &self,
        account_id: &str,
        gift_code_b58: &str,
    ) -> WalletResult<String> {
        let r = self
            .rpc
            .call(
                "claim_gift_code",
                Some(json!({
                    "account_id": account_id,
                    "gift_code_b58": gift_code_b58,
                })),
            )
            .await?;
        let txo_id = project(r, "txo_id")?;
        txo_id
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RpcError::MalformedResponse("`txo_id` is not a string".into()).into())
    }

    pub async fn remove_gift_code(&self, gift_code_b58: &str) -> WalletResult<bool> {
        let r = self
            .rpc
            .call(
                "remove_gift_code",
                Some(json!({ "gift_code_b58": gift_code_b58 })),
            )
            .await?;
        let removed = project(r, "removed")?;
        removed
            .as_bool()
            .ok_or_else(|| RpcError::MalformedResponse("`removed` is not a boolean".into()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_present() {
        let result = json!({"account": {"account_id": "abc"}});
        let account = project(result, "account").unwrap();
        assert_eq!(account["account_id"], "abc");
    }

    #[test]
    fn test_project_missing() {
        let result = json!({"something_else": 1});
        let err = project(result, "account").unwrap_err();
        assert!(err.to_string().contains("account"));
    }
}
