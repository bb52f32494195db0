//! Wallet service client.

pub mod client;
pub mod types;

pub use client::WalletClient;
pub use types::{ImportAccountParams, ImportLegacyAccountParams, WalletError, WalletResult};
