//! Key resolution that ignores the sponsor's permission.
//!
//! The sponsor signs out-of-band, so the wallet must never be asked for a
//! key satisfying `sponsor@permission`. Rather than patching the wallet's
//! resolver, callers wrap it in [`SponsorFilteredResolver`], which hands the
//! inner resolver a copy of the transaction with the sponsor stripped out.

use async_trait::async_trait;

use crate::chain::{PermissionLevel, Transaction};
use crate::guard::actions::strip_sponsor_authorizations;
use crate::provider::ProviderError;

/// Input to a key-resolution step.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredKeysRequest {
    pub transaction: Transaction,
    /// Public keys the wallet can sign with.
    pub available_keys: Vec<String>,
}

/// Maps a transaction's declared authorizations to the keys that must sign.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn required_keys(&self, request: RequiredKeysRequest) -> Result<Vec<String>, ProviderError>;
}

/// Calls through to `inner` after removing the sponsor's authorizations.
///
/// With no sponsor the request is forwarded untouched, so the wrapper can be
/// installed unconditionally.
#[derive(Debug, Clone)]
pub struct SponsorFilteredResolver<R> {
    inner: R,
    sponsor: Option<PermissionLevel>,
}

impl<R> SponsorFilteredResolver<R> {
    pub fn new(inner: R, sponsor: Option<PermissionLevel>) -> Self {
        Self { inner, sponsor }
    }

    pub fn sponsor(&self) -> Option<&PermissionLevel> {
        self.sponsor.as_ref()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<R: KeyResolver> KeyResolver for SponsorFilteredResolver<R> {
    async fn required_keys(&self, mut request: RequiredKeysRequest) -> Result<Vec<String>, ProviderError> {
        if let Some(sponsor) = &self.sponsor {
            request.transaction = strip_sponsor_authorizations(&request.transaction, sponsor);
            tracing::trace!(sponsor = %sponsor, "Stripped sponsor from key resolution");
        }
        self.inner.required_keys(request).await
    }
}
