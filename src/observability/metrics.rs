//! Metrics collection.
//!
//! # Metrics
//! - `tx_guard_prepare_total` (counter): prepared transactions by strategy
//! - `tx_guard_failures_total` (counter): failed runs by error kind
//! - `tx_guard_temp_accounts_total` (counter): temp-account calls by outcome
//!
//! No recorder is installed here; the embedding application chooses the
//! exporter. Without one these calls are no-ops.

use crate::guard::{GuardError, Strategy};

pub fn record_strategy(strategy: Strategy) {
    metrics::counter!("tx_guard_prepare_total", "strategy" => strategy.as_str()).increment(1);
}

pub fn record_failure(error: &GuardError) {
    metrics::counter!("tx_guard_failures_total", "kind" => error.kind()).increment(1);
}

pub fn record_temp_account(created: bool) {
    let outcome = if created { "created" } else { "existing" };
    metrics::counter!("tx_guard_temp_accounts_total", "outcome" => outcome).increment(1);
}
