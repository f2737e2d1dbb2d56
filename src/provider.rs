//! Wallet-provider capability surface consumed by the guard.
//!
//! The guard never touches a concrete wallet SDK. It needs an account
//! name, a chain RPC handle, an optional temp-account proof, and read access
//! to one cookie; everything else stays with the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::{ChainConfig, ChainResult, ChainRpc, HttpChainClient};

/// Cookie holding the invite code sent along with temp-account creation.
pub const TEMP_ACCOUNT_CODE_COOKIE: &str = "temp-account:code";

/// Signed login proof used to create a temporary account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProof {
    pub account_name: String,
    pub message: String,
    pub signature: String,
}

/// Errors raised by a wallet provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider cannot perform this operation at all.
    #[error("Provider does not support {0}")]
    Unsupported(&'static str),

    /// The wallet refused or failed to produce a proof.
    #[error("Proof generation failed: {0}")]
    Proof(String),

    /// Key resolution failed.
    #[error("Key resolution failed: {0}")]
    Keys(String),
}

/// What the guard needs from a wallet provider.
#[async_trait]
pub trait GuardProvider: Send + Sync {
    /// The account the transaction is signed for.
    fn account_name(&self) -> &str;

    /// True while the user is on a provisional account that may not exist
    /// on chain yet.
    fn is_temp(&self) -> bool {
        false
    }

    /// The chain RPC client backing this provider.
    fn rpc(&self) -> &dyn ChainRpc;

    /// Sign `nonce` to prove control of the account.
    async fn wax_proof(&self, nonce: &str, verify: bool) -> Result<AccountProof, ProviderError>;

    /// Read a cookie by name.
    fn cookie(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Provider backed by a plain RPC client, for tooling without a wallet.
///
/// It is never a temp account and cannot produce proofs.
#[derive(Debug, Clone)]
pub struct RpcProvider {
    account: String,
    rpc: HttpChainClient,
}

impl RpcProvider {
    pub fn new(account: impl Into<String>, config: &ChainConfig) -> ChainResult<Self> {
        Ok(Self {
            account: account.into(),
            rpc: HttpChainClient::new(config)?,
        })
    }
}

#[async_trait]
impl GuardProvider for RpcProvider {
    fn account_name(&self) -> &str {
        &self.account
    }

    fn rpc(&self) -> &dyn ChainRpc {
        &self.rpc
    }

    async fn wax_proof(&self, _nonce: &str, _verify: bool) -> Result<AccountProof, ProviderError> {
        Err(ProviderError::Unsupported("account proofs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proof_wire_format() {
        let proof = AccountProof {
            account_name: "abcde.wam".to_string(),
            message: "nonce".to_string(),
            signature: "SIG_K1_xyz".to_string(),
        };
        let value = serde_json::to_value(&proof).unwrap();
        assert_eq!(value["accountName"], "abcde.wam");
        assert_eq!(value["signature"], "SIG_K1_xyz");
    }

    #[tokio::test]
    async fn test_rpc_provider_has_no_proofs() {
        let provider = RpcProvider::new("alice", &ChainConfig::default()).unwrap();
        assert_eq!(provider.account_name(), "alice");
        assert!(!provider.is_temp());
        assert!(provider.cookie(TEMP_ACCOUNT_CODE_COOKIE).is_none());
        assert_eq!(provider.rpc().endpoint(), "http://localhost:8888");

        let err = provider.wax_proof("n", false).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unsupported(_)));
    }
}
