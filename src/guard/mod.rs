//! Transaction guard.
//!
//! # Data Flow
//! ```text
//! provider + transaction
//!     → [temp account] nonce.rs → provider proof → client.rs /temp-account → settle delay
//!     → client.rs /platform-guard → policy.rs (merge onto local default)
//!     → provider.rpc().get_account → strategy.rs (select_strategy)
//!     → actions.rs (sponsor actions, default authorizations)
//!     → PreparedTransaction (+ authority.rs resolver for the signing step)
//! ```
//!
//! Every step runs sequentially on the caller's task. A run either yields a
//! [`PreparedTransaction`] or a [`GuardFailure`] whose fallback is still
//! signable as an unsponsored transaction.

pub mod actions;
pub mod authority;
pub mod client;
pub mod error;
pub mod nonce;
pub mod policy;
pub mod strategy;

use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::chain::{PermissionLevel, Transaction};
use crate::config::GuardServiceConfig;
use crate::observability::metrics;
use crate::provider::{GuardProvider, TEMP_ACCOUNT_CODE_COOKIE};

pub use actions::{authorize_actions, prepend_actions, sponsor_actions, strip_sponsor_authorizations};
pub use authority::{KeyResolver, RequiredKeysRequest, SponsorFilteredResolver};
pub use client::{GuardClient, TempAccountRequest, TempAccountResponse};
pub use error::{GuardError, GuardFailure, GuardResult};
pub use policy::{GuardPolicy, GuardStats};
pub use strategy::{select_strategy, Strategy};

/// Outcome of a guard run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedTransaction {
    pub transaction: Transaction,
    pub stats: GuardStats,
    pub strategy: Strategy,
    /// Permission the sponsor signs with, when the run cosigned.
    pub sponsor: Option<PermissionLevel>,
}

impl PreparedTransaction {
    /// Wrap the wallet's key resolver so it skips the sponsor's permission.
    pub fn key_resolver<R: KeyResolver>(&self, inner: R) -> SponsorFilteredResolver<R> {
        SponsorFilteredResolver::new(inner, self.sponsor.clone())
    }
}

/// Decides sponsorship for one transaction and rewrites it accordingly.
pub struct TransactionGuard<'a, P: GuardProvider + ?Sized> {
    provider: &'a P,
    client: GuardClient,
    account: String,
    transaction: Transaction,
    policy: GuardPolicy,
    default_permission: String,
    settle_delay: Duration,
}

impl<'a, P: GuardProvider + ?Sized> TransactionGuard<'a, P> {
    /// Guard with default settings, talking to the provider's RPC endpoint.
    pub fn new(provider: &'a P, transaction: Transaction) -> GuardResult<Self> {
        Self::with_config(provider, transaction, &GuardServiceConfig::default())
    }

    pub fn with_config(
        provider: &'a P,
        transaction: Transaction,
        config: &GuardServiceConfig,
    ) -> GuardResult<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| provider.rpc().endpoint().to_string());
        let client = GuardClient::new(&endpoint, Duration::from_secs(config.request_timeout_secs))?;

        Ok(Self {
            provider,
            account: provider.account_name().to_string(),
            policy: GuardPolicy::local_default(client.endpoint()),
            client,
            transaction,
            default_permission: config.default_permission.clone(),
            settle_delay: Duration::from_millis(config.temp_account_settle_ms),
        })
    }

    /// The policy in effect so far: the local default until the guard answers.
    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Run the guard.
    ///
    /// On failure the fallback transaction has default authorizations
    /// applied and carries whatever stats the policy held at that point.
    pub async fn prepare(mut self) -> Result<PreparedTransaction, GuardFailure> {
        match self.run().await {
            Ok(strategy) => {
                metrics::record_strategy(strategy);
                tracing::info!(
                    account = %self.account,
                    strategy = %strategy,
                    actions = self.transaction.actions.len(),
                    "Transaction prepared"
                );
                let sponsor = match strategy {
                    Strategy::Cosigned => self.policy.sponsor(),
                    _ => None,
                };
                Ok(self.finish(strategy, sponsor))
            }
            Err(error) => {
                metrics::record_failure(&error);
                tracing::warn!(
                    account = %self.account,
                    error = %error,
                    kind = error.kind(),
                    "Guard failed, falling back to unsponsored transaction"
                );
                self.complete_authorizations();
                Err(GuardFailure {
                    error,
                    fallback: self.finish(Strategy::Unsponsored, None),
                })
            }
        }
    }

    /// Run the guard and never fail: errors are logged and the unsponsored
    /// fallback is returned.
    pub async fn prepare_best_effort(self) -> PreparedTransaction {
        self.prepare().await.unwrap_or_else(GuardFailure::into_fallback)
    }

    async fn run(&mut self) -> GuardResult<Strategy> {
        if self.provider.is_temp() {
            if let Err(e) = self.create_temp_account().await {
                metrics::record_failure(&e);
                tracing::warn!(account = %self.account, error = %e, "Continuing without temp account");
            }
        }

        let fetched = self
            .client
            .fetch_policy(&self.account, &self.transaction.actions)
            .await?;
        self.policy = std::mem::take(&mut self.policy).merge(fetched);

        let resources = self.provider.rpc().get_account(&self.account).await?;
        let strategy = select_strategy(&self.policy, &resources);

        tracing::debug!(
            account = %self.account,
            cpu_available_ms = resources.cpu_available_ms(),
            net_available_bytes = resources.net_available_bytes(),
            cpu_threshold_ms = ?self.policy.cpu_threshold_ms,
            net_threshold_bytes = ?self.policy.net_threshold_bytes,
            strategy = %strategy,
            "Strategy selected"
        );

        match strategy {
            Strategy::SelfPaid | Strategy::Unsponsored => self.complete_authorizations(),
            Strategy::Cosigned => {
                let sponsored = sponsor_actions(&self.policy, &self.account)?;
                prepend_actions(&mut self.transaction, sponsored);
                self.complete_authorizations();
            }
        }

        Ok(strategy)
    }

    async fn create_temp_account(&self) -> GuardResult<TempAccountResponse> {
        let nonce = nonce::generate_nonce();
        let proof = self.provider.wax_proof(&nonce, false).await?;
        let request = TempAccountRequest::from_proof(proof, self.provider.cookie(TEMP_ACCOUNT_CODE_COOKIE));

        let response = self.client.create_temp_account(&request).await?;
        metrics::record_temp_account(response.created);

        if response.created {
            tracing::info!(
                account = ?response.account_name,
                settle_ms = self.settle_delay.as_millis() as u64,
                "Temp account created, waiting for it to appear on chain"
            );
            sleep(self.settle_delay).await;
        }

        Ok(response)
    }

    fn complete_authorizations(&mut self) {
        let filled = authorize_actions(&mut self.transaction, &self.account, &self.default_permission);
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                filled,
                transaction = %serde_json::to_string(&self.transaction).unwrap_or_default(),
                "Signing transaction"
            );
        }
    }

    fn finish(self, strategy: Strategy, sponsor: Option<PermissionLevel>) -> PreparedTransaction {
        PreparedTransaction {
            stats: self.policy.stats(),
            transaction: self.transaction,
            strategy,
            sponsor,
        }
    }
}
