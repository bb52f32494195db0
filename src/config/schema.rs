//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::rpc::DEFAULT_URL;

/// Root configuration for the wallet client and load harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Transport settings for the wallet service endpoint.
    pub client: ClientConfig,

    /// Load harness settings.
    pub load: LoadConfig,
}

/// Transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Wallet service endpoint URL.
    pub url: String,

    /// Echo request and response bodies to the diagnostic log.
    pub verbose: bool,

    /// Per-call request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            verbose: false,
            request_timeout_secs: 30,
        }
    }
}

/// Load harness configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Delay between task launches in milliseconds.
    pub launch_interval_ms: u64,

    /// Confirmation poll attempt budget per task.
    pub confirm_attempts: u32,

    /// Delay between confirmation poll attempts in milliseconds.
    pub confirm_delay_ms: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            launch_interval_ms: 100,
            confirm_attempts: 60,
            confirm_delay_ms: 500,
        }
    }
}
