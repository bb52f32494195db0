//! JSON-RPC request/response layer.

pub mod client;
pub mod envelope;
pub mod types;

pub use client::{RpcClient, DEFAULT_URL};
pub use types::{RpcError, RpcResult};
