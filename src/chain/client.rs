//! Chain RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Query account resource limits (`/v1/chain/get_account`)
//! - Handle timeouts and network errors gracefully
//! - Fall back to secondary nodes when the primary is unreachable

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

use crate::chain::types::{AccountResources, ChainConfig, ChainError, ChainResult};

/// The slice of a chain RPC node the guard depends on.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Base URL of the node. The guard service is co-hosted here by default.
    fn endpoint(&self) -> &str;

    /// Fetch current CPU/NET availability for `account`.
    async fn get_account(&self, account: &str) -> ChainResult<AccountResources>;
}

/// HTTP JSON-RPC client for EOSIO-style nodes.
#[derive(Clone)]
pub struct HttpChainClient {
    /// Primary endpoint followed by failovers.
    endpoints: Vec<String>,
    http: reqwest::Client,
    timeout_duration: Duration,
}

impl HttpChainClient {
    /// Create a new chain client.
    ///
    /// Invalid failover URLs are skipped with a warning; an invalid primary
    /// URL is an error.
    pub fn new(config: &ChainConfig) -> ChainResult<Self> {
        url::Url::parse(&config.rpc_url).map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let mut endpoints = vec![trim_endpoint(&config.rpc_url)];
        for url_str in &config.failover_urls {
            if url::Url::parse(url_str).is_ok() {
                endpoints.push(trim_endpoint(url_str));
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ChainError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            rpc_url = %config.rpc_url,
            failovers = endpoints.len() - 1,
            "Chain client initialized"
        );

        Ok(Self {
            endpoints,
            http,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    async fn get_account_from(&self, endpoint: &str, account: &str) -> ChainResult<AccountResources> {
        let response = self
            .http
            .post(format!("{}/v1/chain/get_account", endpoint))
            .json(&serde_json::json!({ "account_name": account }))
            .send()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        if !status.is_success() {
            if text.contains("unknown key") {
                return Err(ChainError::AccountNotFound(account.to_string()));
            }
            return Err(ChainError::Rpc(format!("Node returned status {}: {}", status, text)));
        }

        serde_json::from_str(&text).map_err(|e| ChainError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ChainRpc for HttpChainClient {
    fn endpoint(&self) -> &str {
        &self.endpoints[0]
    }

    async fn get_account(&self, account: &str) -> ChainResult<AccountResources> {
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            let fut = self.get_account_from(endpoint, account);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(resources)) => return Ok(resources),
                // The account is missing everywhere; asking another node won't help.
                Ok(Err(ChainError::AccountNotFound(name))) => {
                    return Err(ChainError::AccountNotFound(name))
                }
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, error = %e, "RPC error, trying next endpoint");
                }
                Err(_) => {
                    tracing::warn!(
                        endpoint_idx = i,
                        timeout_secs = self.timeout_duration.as_secs(),
                        "RPC timeout, trying next endpoint"
                    );
                }
            }
        }
        Err(ChainError::Rpc("All RPC endpoints failed to get account".to_string()))
    }
}

impl std::fmt::Debug for HttpChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChainClient")
            .field("endpoints", &self.endpoints)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

fn trim_endpoint(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
