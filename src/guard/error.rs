//! Guard error taxonomy.

use thiserror::Error;

use crate::chain::ChainError;
use crate::guard::PreparedTransaction;
use crate::provider::ProviderError;

/// Errors that can occur while preparing a transaction.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The guard endpoint could not be reached.
    #[error("Guard unreachable: {0}")]
    GuardUnreachable(String),

    /// The guard answered, but not with a usable policy.
    #[error("Unable to handle guard response: {0}")]
    GuardRejected(String),

    /// Temp-account creation failed.
    #[error("Temp account creation failed: {0}")]
    TempAccountFailed(String),

    /// Account resources could not be read from the chain node.
    #[error("Chain RPC failed: {0}")]
    ChainRpc(String),

    #[error("Guard error: {0}")]
    Unknown(String),
}

impl GuardError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GuardError::GuardUnreachable(_) => "guard_unreachable",
            GuardError::GuardRejected(_) => "guard_rejected",
            GuardError::TempAccountFailed(_) => "temp_account_failed",
            GuardError::ChainRpc(_) => "chain_rpc",
            GuardError::Unknown(_) => "unknown",
        }
    }
}

impl From<ChainError> for GuardError {
    fn from(err: ChainError) -> Self {
        GuardError::ChainRpc(err.to_string())
    }
}

impl From<ProviderError> for GuardError {
    fn from(err: ProviderError) -> Self {
        GuardError::TempAccountFailed(err.to_string())
    }
}

/// Result type for guard operations.
pub type GuardResult<T> = Result<T, GuardError>;

/// A failed `prepare` run.
///
/// `fallback` holds the transaction with default authorizations applied, so
/// callers that want to proceed unsponsored can sign it as is.
#[derive(Debug)]
pub struct GuardFailure {
    pub error: GuardError,
    pub fallback: PreparedTransaction,
}

impl GuardFailure {
    /// Drop the error and continue with the unsponsored transaction.
    pub fn into_fallback(self) -> PreparedTransaction {
        self.fallback
    }
}

impl std::fmt::Display for GuardFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for GuardFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
