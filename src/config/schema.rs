//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TxGuardConfig {
    /// Guard service settings.
    pub guard: GuardServiceConfig,

    /// Chain RPC settings.
    pub chain: ChainConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Guard service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardServiceConfig {
    /// Guard base URL. When unset the provider's RPC endpoint is used.
    pub endpoint: Option<String>,

    /// Timeout for each guard HTTP request in seconds.
    pub request_timeout_secs: u64,

    /// Pause after a temp account is created, in milliseconds.
    pub temp_account_settle_ms: u64,

    /// Permission assigned to actions that carry no authorization.
    pub default_permission: String,
}

impl Default for GuardServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout_secs: 10,
            temp_account_settle_ms: 1000,
            default_permission: "active".to_string(),
        }
    }
}

/// Chain RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8888".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
