//! JSON-RPC client with per-call transport and error classification.
//!
//! # Responsibilities
//! - Build the request envelope and POST it to the wallet endpoint
//! - Classify failures: transport, malformed response, application error
//! - Unwrap the `result` field on success
//! - Count successful calls for diagnostics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;

use crate::rpc::envelope::JsonRpcRequest;
use crate::rpc::types::{RpcError, RpcResult};

/// Default wallet service endpoint.
pub const DEFAULT_URL: &str = "http://127.0.0.1:9090/wallet";

/// Asynchronous JSON-RPC client for the wallet service.
///
/// Every call opens its own transport (a fresh connection pool dropped on
/// all exit paths); no connection is held across calls. No call is ever
/// retried here, submissions in particular are not safely retryable.
#[derive(Debug)]
pub struct RpcClient {
    url: String,
    verbose: bool,
    timeout: Duration,
    query_count: AtomicU64,
}

impl RpcClient {
    /// Create a client for the given endpoint URL.
    ///
    /// Fails if the URL does not parse.
    pub fn new(url: &str, verbose: bool, timeout: Duration) -> RpcResult<Self> {
        let _: url::Url = url.parse().map_err(|e| RpcError::Transport {
            url: url.to_string(),
            reason: format!("invalid URL: {}", e),
        })?;

        Ok(Self {
            url: url.to_string(),
            verbose,
            timeout,
            query_count: AtomicU64::new(0),
        })
    }

    /// Client with the default endpoint and settings.
    pub fn default_local() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            verbose: false,
            timeout: Duration::from_secs(30),
            query_count: AtomicU64::new(0),
        }
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of successful calls made through this client instance.
    ///
    /// Advisory only; approximate under concurrent use.
    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::Relaxed)
    }

    /// Perform one JSON-RPC call and unwrap its result.
    ///
    /// Returns the `result` value verbatim, or a classified error. The
    /// per-instance call counter increments only on success.
    pub async fn call(&self, method: &str, params: Option<Value>) -> RpcResult<Value> {
        let request = JsonRpcRequest::new(method, params);

        if self.verbose {
            tracing::debug!(
                url = %self.url,
                body = %serde_json::to_string_pretty(&request).unwrap_or_default(),
                "POST"
            );
        }

        // One transport per call; the pool is dropped on every exit path.
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| RpcError::Transport {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let response = http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            return Err(RpcError::MalformedResponse(format!(
                "expected application/json, got status {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RpcError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

        if self.verbose {
            tracing::debug!(
                status = %status,
                body = %serde_json::to_string_pretty(&body).unwrap_or_default(),
                "response"
            );
        }

        // Presence of `result` is the sole success discriminant.
        match body.get("result") {
            Some(result) => {
                self.query_count.fetch_add(1, Ordering::Relaxed);
                Ok(result.clone())
            }
            None => Err(RpcError::Application(body)),
        }
    }
}
