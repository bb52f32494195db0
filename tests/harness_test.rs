//! Integration tests for the concurrent submission harness.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use wallet_rpc::harness::{RunSummary, SubmissionHarness, TxJob};
use wallet_rpc::poll::PollOptions;
use wallet_rpc::wallet::WalletClient;

mod common;
use common::{method_of, start_mock_wallet, MockResponse};

fn jobs(n: usize) -> Vec<TxJob> {
    (0..n)
        .map(|_| TxJob {
            to_address: "dest-addr".to_string(),
            amount: "0.001".parse().unwrap(),
            fee: None,
        })
        .collect()
}

fn harness(client: Arc<WalletClient>) -> SubmissionHarness {
    SubmissionHarness::new(
        client,
        "acct",
        Duration::from_millis(1),
        PollOptions {
            attempts: 10,
            delay: Duration::from_millis(1),
        },
    )
}

/// Mock wallet where every submission lands and immediately confirms.
fn well_behaved(request: &Value, submissions: &AtomicUsize) -> MockResponse {
    match method_of(request) {
        "build_and_submit_transaction" => {
            let n = submissions.fetch_add(1, Ordering::SeqCst);
            MockResponse::result(json!({
                "transaction_log": {
                    "transaction_log_id": format!("log-{}", n),
                    "status": "tx_status_pending",
                },
                "tx_proposal": {},
            }))
        }
        "get_transaction_log" => {
            let log_id = request["params"]["transaction_log_id"].as_str().unwrap();
            MockResponse::result(json!({
                "transaction_log": {
                    "transaction_log_id": log_id,
                    "status": "tx_status_succeeded",
                }
            }))
        }
        other => MockResponse::error(json!({"message": format!("unexpected method {}", other)})),
    }
}

#[tokio::test]
async fn test_all_tasks_succeed() {
    let submissions = Arc::new(AtomicUsize::new(0));
    let submissions_in_handler = Arc::clone(&submissions);
    let server =
        start_mock_wallet(move |request| well_behaved(request, &submissions_in_handler)).await;
    let client = Arc::new(WalletClient::new(&server.url, false, Duration::from_secs(5)).unwrap());
    let harness = harness(Arc::clone(&client));

    let start = Instant::now();
    let results = harness.send_transactions(jobs(3)).await;
    let summary = harness.summarize(&results, start.elapsed());

    assert_eq!(results.len(), 3);
    assert_eq!(summary.passed, 3);
    assert_eq!(summary.failed, 0);
    assert!(summary.mean_step_runtime.is_some());
    assert_eq!(submissions.load(Ordering::SeqCst), 3);
    for outcome in results.values() {
        assert!(outcome.passed);
        assert!(outcome.metrics.contains_key("confirmation_time"));
        assert_eq!(outcome.payload["status"], "tx_status_succeeded");
    }
}

#[tokio::test]
async fn test_one_failing_submission_is_isolated() {
    let submissions = Arc::new(AtomicUsize::new(0));
    let submissions_in_handler = Arc::clone(&submissions);
    let server = start_mock_wallet(move |request| match method_of(request) {
        "build_and_submit_transaction" => {
            // The third submission the server sees is rejected.
            let n = submissions_in_handler.fetch_add(1, Ordering::SeqCst);
            if n == 2 {
                MockResponse::error(json!({"message": "insufficient funds"}))
            } else {
                MockResponse::result(json!({
                    "transaction_log": {
                        "transaction_log_id": format!("log-{}", n),
                        "status": "tx_status_pending",
                    },
                    "tx_proposal": {},
                }))
            }
        }
        _ => well_behaved(request, &submissions_in_handler),
    })
    .await;
    let client = Arc::new(WalletClient::new(&server.url, false, Duration::from_secs(5)).unwrap());
    let harness = harness(Arc::clone(&client));

    let start = Instant::now();
    let results = harness.send_transactions(jobs(5)).await;
    let summary = harness.summarize(&results, start.elapsed());

    // All five tasks reach a terminal outcome; the failure stays isolated.
    assert_eq!(results.len(), 5);
    assert_eq!(summary.passed, 4);
    assert_eq!(summary.failed, 1);

    let failed: Vec<_> = results.values().filter(|o| !o.passed).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].payload["error"]
        .as_str()
        .unwrap()
        .contains("insufficient funds"));
    // A failed submission never reaches confirmation polling.
    assert!(failed[0].metrics.is_empty());
}

#[tokio::test]
async fn test_empty_run_summary() {
    let server = start_mock_wallet(|_| MockResponse::result(json!({}))).await;
    let client = Arc::new(WalletClient::new(&server.url, false, Duration::from_secs(5)).unwrap());
    let harness = harness(client);

    let results = harness.send_transactions(Vec::new()).await;
    let summary = RunSummary::from_results(&results, Duration::ZERO);

    assert!(results.is_empty());
    assert_eq!(summary.passed, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.mean_step_runtime, None);
}

#[tokio::test]
async fn test_address_fanout() {
    let server = start_mock_wallet(|request| match method_of(request) {
        "assign_address_for_account" => {
            let metadata = request["params"]["metadata"].as_str().unwrap().to_string();
            MockResponse::result(json!({"address": {"metadata": metadata}}))
        }
        other => MockResponse::error(json!({"message": format!("unexpected method {}", other)})),
    })
    .await;
    let client = Arc::new(WalletClient::new(&server.url, false, Duration::from_secs(5)).unwrap());
    let harness = harness(client);

    let results = harness.create_addresses(4, Duration::from_millis(1)).await;

    assert_eq!(results.len(), 4);
    assert!(results.values().all(|o| o.passed));
    let mut names: Vec<_> = results
        .values()
        .map(|o| o.payload["metadata"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["address0", "address1", "address2", "address3"]);
}
