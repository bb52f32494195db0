//! Concurrent submission harness.
//!
//! # Responsibilities
//! - Launch many independent submit-then-confirm workflows with a
//!   staggered start, then let them run fully concurrently
//! - Record one terminal [`TaskOutcome`] per task; a failing task never
//!   cancels or fails its siblings
//! - Aggregate outcomes into a [`RunSummary`] once every task is terminal
//!
//! Outcomes travel over an mpsc channel owned by the harness; tasks never
//! share mutable state beyond the wallet client's diagnostic counter.

pub mod types;

pub use types::{RunSummary, TaskOutcome};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::poll::{self, PollOptions};
use crate::wallet::WalletClient;

/// Parameters for one transaction submission task.
#[derive(Debug, Clone)]
pub struct TxJob {
    pub to_address: String,
    /// Display-unit amount.
    pub amount: Decimal,
    /// Optional fee in display units; omitted from the wire when absent.
    pub fee: Option<Decimal>,
}

/// Drives staggered concurrent workflows against one wallet client.
pub struct SubmissionHarness {
    client: Arc<WalletClient>,
    account_id: String,
    launch_interval: Duration,
    confirm: PollOptions,
}

impl SubmissionHarness {
    pub fn new(
        client: Arc<WalletClient>,
        account_id: &str,
        launch_interval: Duration,
        confirm: PollOptions,
    ) -> Self {
        Self {
            client,
            account_id: account_id.to_string(),
            launch_interval,
            confirm,
        }
    }

    /// Submit each job as an independent concurrent task and wait for all
    /// of them to reach a terminal outcome.
    ///
    /// Tasks are launched in job order, one launch per interval; completion
    /// order is unconstrained. Submission is never retried.
    pub async fn send_transactions(&self, jobs: Vec<TxJob>) -> HashMap<String, TaskOutcome> {
        tracing::info!(
            count = jobs.len(),
            interval_ms = self.launch_interval.as_millis() as u64,
            "launching transaction submissions"
        );

        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let mut handles = Vec::with_capacity(jobs.len());

        for (index, job) in jobs.into_iter().enumerate() {
            sleep(self.launch_interval).await;
            let client = Arc::clone(&self.client);
            let account_id = self.account_id.clone();
            let confirm = self.confirm;
            let outcome_tx = outcome_tx.clone();
            handles.push(tokio::spawn(async move {
                let outcome = submit_and_confirm(&client, &account_id, index, job, confirm).await;
                let _ = outcome_tx.send(outcome);
            }));
        }
        drop(outcome_tx);

        collect_outcomes(handles, outcome_rx).await
    }

    /// Assign `count` subaddresses concurrently with a staggered start.
    pub async fn create_addresses(
        &self,
        count: usize,
        interval: Duration,
    ) -> HashMap<String, TaskOutcome> {
        tracing::info!(count, interval_ms = interval.as_millis() as u64, "creating addresses");

        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let mut handles = Vec::with_capacity(count);

        for index in 0..count {
            sleep(interval).await;
            let client = Arc::clone(&self.client);
            let account_id = self.account_id.clone();
            let outcome_tx = outcome_tx.clone();
            handles.push(tokio::spawn(async move {
                let start = Instant::now();
                let name = format!("address{}", index);
                let id = format!("create-{}-at-{}", name, unix_millis());
                let outcome = match client
                    .assign_address_for_account(&account_id, Some(&name))
                    .await
                {
                    Ok(address) => TaskOutcome {
                        id,
                        passed: true,
                        payload: address,
                        runtime: start.elapsed(),
                        metrics: HashMap::new(),
                    },
                    Err(e) => TaskOutcome {
                        id,
                        passed: false,
                        payload: json!({ "error": e.to_string() }),
                        runtime: start.elapsed(),
                        metrics: HashMap::new(),
                    },
                };
                let _ = outcome_tx.send(outcome);
            }));
        }
        drop(outcome_tx);

        collect_outcomes(handles, outcome_rx).await
    }

    /// Summarize a finished run and log the aggregate figures.
    pub fn summarize(
        &self,
        results: &HashMap<String, TaskOutcome>,
        total_runtime: Duration,
    ) -> RunSummary {
        let summary = RunSummary::from_results(results, total_runtime);
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            total_runtime_secs = summary.total_runtime.as_secs_f64(),
            mean_step_runtime_secs = summary.mean_step_runtime.map(|d| d.as_secs_f64()),
            "run summary"
        );
        summary
    }
}

/// One task: submit, then poll for confirmation. Always produces a
/// terminal outcome; a submission failure short-circuits confirmation.
async fn submit_and_confirm(
    client: &WalletClient,
    account_id: &str,
    index: usize,
    job: TxJob,
    confirm: PollOptions,
) -> TaskOutcome {
    let start = Instant::now();
    let id = format!(
        "send-{}-to-{}-at-{}-{}",
        job.amount,
        job.to_address,
        unix_millis(),
        index
    );

    let log = match client
        .build_and_submit_transaction(account_id, job.amount, &job.to_address, job.fee)
        .await
    {
        Ok(log) => log,
        Err(e) => {
            tracing::warn!(task = %id, error = %e, "submission failed");
            return TaskOutcome {
                id,
                passed: false,
                payload: json!({ "error": e.to_string() }),
                runtime: start.elapsed(),
                metrics: HashMap::new(),
            };
        }
    };

    let log_id = match log.get("transaction_log_id").and_then(Value::as_str) {
        Some(log_id) => log_id.to_string(),
        None => {
            return TaskOutcome {
                id,
                passed: false,
                payload: json!({
                    "error": "transaction log has no transaction_log_id",
                    "transaction_log": log,
                }),
                runtime: start.elapsed(),
                metrics: HashMap::new(),
            };
        }
    };

    let confirmation_start = Instant::now();
    let (passed, payload) = match poll::wait_for_transaction(client, &log_id, confirm).await {
        Ok(final_log) => (true, final_log),
        Err(e) => {
            tracing::warn!(task = %id, transaction_log_id = %log_id, error = %e, "confirmation failed");
            (
                false,
                json!({ "error": e.to_string(), "transaction_log_id": log_id }),
            )
        }
    };

    let mut metrics = HashMap::new();
    metrics.insert(
        "confirmation_time".to_string(),
        confirmation_start.elapsed().as_secs_f64(),
    );

    TaskOutcome {
        id,
        passed,
        payload,
        runtime: start.elapsed(),
        metrics,
    }
}

/// Join every task, then drain the outcome channel into a map.
///
/// Task failures are already folded into outcomes; only a panic can make
/// a join fail, and that loses nothing but the panicking task's record.
async fn collect_outcomes(
    handles: Vec<tokio::task::JoinHandle<()>>,
    mut outcome_rx: mpsc::UnboundedReceiver<TaskOutcome>,
) -> HashMap<String, TaskOutcome> {
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "harness task panicked");
        }
    }

    let mut results = HashMap::new();
    while let Some(outcome) = outcome_rx.recv().await {
        results.insert(outcome.id.clone(), outcome);
    }
    results
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
