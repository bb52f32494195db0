//! Convergence polling.
//!
//! # Responsibilities
//! - Adapt asynchronously-converging remote state into bounded waits
//! - Retry only the "not yet converged" condition, never real failures
//! - Surface exhaustion as a timeout naming the subject and condition
//!
//! Two tolerances are deliberately distinct: the landing pollers
//! ([`wait_for_transaction`], [`wait_for_txo`]) treat an application-level
//! error from the query as "object not visible yet" and keep going, while a
//! successful result with the wrong status simply loops everywhere. Neither
//! tolerance ever covers transport or malformed-response errors.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;

use crate::rpc::RpcError;
use crate::wallet::{WalletClient, WalletError};

/// Transaction log status reported once a submission has landed.
pub const TX_STATUS_SUCCEEDED: &str = "tx_status_succeeded";

/// Attempt budget for a poller.
///
/// The wall-clock deadline is `attempts * delay`; a poller with zero
/// attempts always fails without issuing a query.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_secs(1),
        }
    }
}

impl PollOptions {
    /// Derive an attempt budget from a maximum wait and an inter-attempt
    /// delay. A zero delay yields a single attempt.
    pub fn for_duration(max_wait: Duration, delay: Duration) -> Self {
        let attempts = if delay.is_zero() {
            1
        } else {
            (max_wait.as_millis() / delay.as_millis()).max(1) as u32
        };
        Self { attempts, delay }
    }
}

/// Errors from convergence polling.
#[derive(Debug, Error)]
pub enum PollError {
    /// The attempt budget ran out before the condition held.
    #[error("timed out waiting for {subject}: {condition}")]
    Timeout { subject: String, condition: String },

    /// The underlying query failed in a way polling does not cover.
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// Result type for polling operations.
pub type PollResult = Result<Value, PollError>;

/// Wait until an account's balance is synced, optionally to a minimum
/// block height. Query errors propagate immediately.
pub async fn wait_for_account_sync(
    client: &WalletClient,
    account_id: &str,
    min_block_height: Option<u64>,
    opts: PollOptions,
) -> PollResult {
    for attempt in 0..opts.attempts {
        let balance = client.get_balance_for_account(account_id).await?;
        if balance_synced(&balance, min_block_height) {
            return Ok(balance);
        }
        if attempt + 1 < opts.attempts {
            sleep(opts.delay).await;
        }
    }
    Err(PollError::Timeout {
        subject: account_id.to_string(),
        condition: match min_block_height {
            Some(height) => format!("balance synced to block height {}", height),
            None => "balance synced".to_string(),
        },
    })
}

fn balance_synced(balance: &Value, min_block_height: Option<u64>) -> bool {
    if balance.get("is_synced").and_then(Value::as_bool) != Some(true) {
        return false;
    }
    match min_block_height {
        None => true,
        Some(min) => balance
            .get("account_block_height")
            .and_then(Value::as_str)
            .and_then(|h| h.parse::<u64>().ok())
            .map(|h| h >= min)
            .unwrap_or(false),
    }
}

/// Wait until a submitted transaction's log reports success.
///
/// The log may not exist yet right after submission, so an application
/// error from the query counts as "not yet landed". A log with any other
/// status keeps looping until the budget runs out.
pub async fn wait_for_transaction(
    client: &WalletClient,
    transaction_log_id: &str,
    opts: PollOptions,
) -> PollResult {
    for attempt in 0..opts.attempts {
        match client.get_transaction_log(transaction_log_id).await {
            Ok(log) => {
                if log.get("status").and_then(Value::as_str) == Some(TX_STATUS_SUCCEEDED) {
                    return Ok(log);
                }
            }
            Err(WalletError::Rpc(RpcError::Application(_))) => {}
            Err(e) => return Err(e.into()),
        }
        if attempt + 1 < opts.attempts {
            sleep(opts.delay).await;
        }
    }
    Err(PollError::Timeout {
        subject: transaction_log_id.to_string(),
        condition: format!("transaction status {}", TX_STATUS_SUCCEEDED),
    })
}

/// Wait until a txo becomes visible, returning it on the first successful
/// query. Only application errors are treated as "not yet landed".
pub async fn wait_for_txo(client: &WalletClient, txo_id: &str, opts: PollOptions) -> PollResult {
    for attempt in 0..opts.attempts {
        match client.get_txo(txo_id).await {
            Ok(txo) => return Ok(txo),
            Err(WalletError::Rpc(RpcError::Application(_))) => {}
            Err(e) => return Err(e.into()),
        }
        if attempt + 1 < opts.attempts {
            sleep(opts.delay).await;
        }
    }
    Err(PollError::Timeout {
        subject: txo_id.to_string(),
        condition: "txo landed".to_string(),
    })
}

/// Wait until a gift code reaches the target status. Query errors
/// propagate immediately.
pub async fn wait_for_gift_code_status(
    client: &WalletClient,
    gift_code_b58: &str,
    target_status: &str,
    opts: PollOptions,
) -> PollResult {
    for attempt in 0..opts.attempts {
        let response = client.check_gift_code_status(gift_code_b58).await?;
        if response.get("gift_code_status").and_then(Value::as_str) == Some(target_status) {
            return Ok(response);
        }
        if attempt + 1 < opts.attempts {
            sleep(opts.delay).await;
        }
    }
    Err(PollError::Timeout {
        subject: gift_code_b58.to_string(),
        condition: format!("gift code status {}", target_status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attempts_from_duration() {
        let opts =
            PollOptions::for_duration(Duration::from_secs(10), Duration::from_secs(1));
        assert_eq!(opts.attempts, 10);

        let opts =
            PollOptions::for_duration(Duration::from_secs(3), Duration::from_millis(500));
        assert_eq!(opts.attempts, 6);

        // Sub-delay wait still gets one attempt.
        let opts =
            PollOptions::for_duration(Duration::from_millis(100), Duration::from_secs(1));
        assert_eq!(opts.attempts, 1);

        let opts = PollOptions::for_duration(Duration::from_secs(5), Duration::ZERO);
        assert_eq!(opts.attempts, 1);
    }

    #[test]
    fn test_balance_predicate() {
        let unsynced = json!({"is_synced": false});
        assert!(!balance_synced(&unsynced, None));

        let synced = json!({"is_synced": true, "account_block_height": "5"});
        assert!(balance_synced(&synced, None));
        assert!(balance_synced(&synced, Some(5)));
        assert!(!balance_synced(&synced, Some(6)));

        // Missing or malformed height never satisfies a minimum.
        let no_height = json!({"is_synced": true});
        assert!(balance_synced(&no_height, None));
        assert!(!balance_synced(&no_height, Some(1)));
    }

    #[tokio::test]
    async fn test_zero_attempts_fails_without_querying() {
        let client = WalletClient::default_local();
        let opts = PollOptions {
            attempts: 0,
            delay: Duration::ZERO,
        };
        let result = wait_for_account_sync(&client, "acct", None, opts).await;
        assert!(matches!(result, Err(PollError::Timeout { .. })));
        assert_eq!(client.query_count(), 0);
    }
}
