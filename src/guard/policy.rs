//! Guard policy as returned by `/platform-guard`.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::chain::PermissionLevel;

/// Diagnostics the guard attaches to its decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardStats {
    pub error: Option<String>,
    /// Numeric on some deployments, a symbolic string on others.
    #[serde(rename = "errorCode")]
    pub error_code: Option<serde_json::Value>,
    pub message: Option<String>,
    /// The guard recommends that the sponsor co-signs and pays.
    pub cosign: bool,
    /// The sponsor should also buy RAM for the account.
    pub buyram: bool,
}

/// Sponsorship policy for one transaction.
///
/// Every field is optional so a fetched policy can be laid over the local
/// default without clobbering fields the guard did not send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardPolicy {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub cpu_threshold_ms: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub net_threshold_bytes: Option<f64>,
    pub contract_account: Option<String>,
    pub contract_permission: Option<String>,
    pub contract_action: Option<String>,
    /// Correlation token carried by the sponsor marker action.
    pub uniqid: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub buyram_bytes: Option<u64>,
    pub stats: Option<GuardStats>,
    /// Some guard deployments report the flags at the top level instead
    /// of inside `stats`. They take precedence when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cosign: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyram: Option<bool>,
}

impl GuardPolicy {
    /// The local starting point: guard disabled, empty stats.
    pub fn local_default(endpoint: impl Into<String>) -> Self {
        Self {
            enabled: Some(false),
            endpoint: Some(endpoint.into()),
            stats: Some(GuardStats::default()),
            ..Self::default()
        }
    }

    /// Shallow merge: fields present in `fetched` replace ours.
    pub fn merge(self, fetched: GuardPolicy) -> GuardPolicy {
        GuardPolicy {
            enabled: fetched.enabled.or(self.enabled),
            endpoint: fetched.endpoint.or(self.endpoint),
            cpu_threshold_ms: fetched.cpu_threshold_ms.or(self.cpu_threshold_ms),
            net_threshold_bytes: fetched.net_threshold_bytes.or(self.net_threshold_bytes),
            contract_account: fetched.contract_account.or(self.contract_account),
            contract_permission: fetched.contract_permission.or(self.contract_permission),
            contract_action: fetched.contract_action.or(self.contract_action),
            uniqid: fetched.uniqid.or(self.uniqid),
            buyram_bytes: fetched.buyram_bytes.or(self.buyram_bytes),
            stats: fetched.stats.or(self.stats),
            cosign: fetched.cosign.or(self.cosign),
            buyram: fetched.buyram.or(self.buyram),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    /// Effective stats with top-level flags folded in.
    pub fn stats(&self) -> GuardStats {
        let mut stats = self.stats.clone().unwrap_or_default();
        if let Some(cosign) = self.cosign {
            stats.cosign = cosign;
        }
        if let Some(buyram) = self.buyram {
            stats.buyram = buyram;
        }
        stats
    }

    /// The sponsor's `{contract_account, contract_permission}` pair.
    pub fn sponsor(&self) -> Option<PermissionLevel> {
        match (&self.contract_account, &self.contract_permission) {
            (Some(account), Some(permission)) => Some(PermissionLevel::new(account, permission)),
            _ => None,
        }
    }
}

// Guards send numbers as JSON numbers or decimal strings. Anything else
// reads as absent rather than failing the whole policy.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Num(T),
        Str(String),
        Other(serde_json::Value),
    }

    Ok(match Raw::<T>::deserialize(deserializer)? {
        Raw::Num(value) => Some(value),
        Raw::Str(text) => text.trim().parse::<T>().ok(),
        Raw::Other(_) => None,
    })
}
