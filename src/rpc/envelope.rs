//! JSON-RPC request and response envelopes.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Protocol constant sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Wallet API version sent with every request.
pub const API_VERSION: &str = "2";

/// Outgoing request envelope.
///
/// Immutable once built; `id` is generated fresh per call and used for
/// diagnostics only, never for matching against the response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub jsonrpc: &'static str,
    pub api_version: &'static str,
    pub id: String,
}

impl JsonRpcRequest {
    /// Build an envelope for `method`, omitting `params` entirely when absent.
    pub fn new(method: &str, params: Option<Value>) -> Self {
        Self {
            method: method.to_string(),
            params,
            jsonrpc: JSONRPC_VERSION,
            api_version: API_VERSION,
            id: Uuid::new_v4().simple().to_string(),
        }
    }
}
