//! Async client and load harness for a JSON-RPC wallet service.
//!
//! # Architecture Overview
//!
//! ```text
//!   wallet-load (bin)
//!        │
//!        ▼
//!   ┌─────────┐    ┌─────────┐    ┌──────────┐    ┌──────────┐
//!   │ harness │───▶│  poll   │───▶│  wallet  │───▶│   rpc    │──▶ wallet service
//!   └─────────┘    └─────────┘    └──────────┘    └──────────┘
//!                                      │
//!                                      ▼
//!                                  ┌────────┐
//!                                  │ amount │
//!                                  └────────┘
//! ```
//!
//! The harness launches staggered concurrent submit-then-confirm tasks;
//! pollers turn eventually-consistent remote state into bounded waits; the
//! wallet client maps one method to one remote operation; the rpc layer
//! owns the request envelope and error classification; amount converts
//! between display units and on-wire base units.

pub mod amount;
pub mod config;
pub mod harness;
pub mod poll;
pub mod rpc;
pub mod wallet;

pub use config::Config;
pub use harness::{RunSummary, SubmissionHarness, TaskOutcome, TxJob};
pub use poll::{PollError, PollOptions};
pub use rpc::{RpcClient, RpcError};
pub use wallet::{WalletClient, WalletError};
