//! RPC error taxonomy.

use thiserror::Error;

/// Errors that can occur during a wallet RPC call.
///
/// Callers can branch on "the service said no" (`Application`) versus
/// "we could not talk to the service" (`Transport`/`MalformedResponse`).
#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection could not be established or was dropped.
    #[error("could not connect to wallet server at {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Response body was not valid JSON or lacked a JSON content type.
    #[error("wallet server returned an invalid response: {0}")]
    MalformedResponse(String),

    /// The service processed the call and reported failure. Carries the
    /// raw response body, error details inside are opaque to this client.
    #[error("wallet server reported an error: {0}")]
    Application(serde_json::Value),
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
