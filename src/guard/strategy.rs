//! Choosing how a transaction gets paid for.

use serde::Serialize;

use crate::chain::AccountResources;
use crate::guard::policy::GuardPolicy;

/// The preparation applied to a transaction. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The account has enough CPU and NET to pay for itself.
    SelfPaid,
    /// The sponsor co-signs and pays.
    Cosigned,
    /// No sponsorship; default authorizations only.
    Unsponsored,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SelfPaid => "self_paid",
            Strategy::Cosigned => "cosigned",
            Strategy::Unsponsored => "unsponsored",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the strategy. First match wins:
/// both thresholds set and met, then the guard's cosign flag, then nothing.
///
/// A threshold that is missing or zero counts as "not configured", which
/// rules out self-pay entirely. CPU is compared in milliseconds, NET in bytes.
pub fn select_strategy(policy: &GuardPolicy, resources: &AccountResources) -> Strategy {
    let cpu_threshold = configured(policy.cpu_threshold_ms);
    let net_threshold = configured(policy.net_threshold_bytes);

    if let (Some(cpu_ms), Some(net_bytes)) = (cpu_threshold, net_threshold) {
        if resources.cpu_available_ms() >= cpu_ms
            && resources.net_available_bytes() as f64 >= net_bytes
        {
            return Strategy::SelfPaid;
        }
    }

    if policy.stats().cosign {
        Strategy::Cosigned
    } else {
        Strategy::Unsponsored
    }
}

fn configured(threshold: Option<f64>) -> Option<f64> {
    threshold.filter(|value| *value != 0.0 && !value.is_nan())
}
