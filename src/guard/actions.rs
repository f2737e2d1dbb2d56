//! Transaction rewriting: sponsor actions, default authorizations and the
//! sponsor-free copy used for key resolution.

use serde_json::json;

use crate::chain::{Action, PermissionLevel, Transaction};
use crate::guard::error::{GuardError, GuardResult};
use crate::guard::policy::GuardPolicy;

/// System contract that sells RAM.
pub const SYSTEM_ACCOUNT: &str = "eosio";
pub const BUYRAMBYTES_ACTION: &str = "buyrambytes";

/// Build the actions the sponsor prepends, in final order.
///
/// The marker comes first so that a bill-first-authorizer chain charges the
/// sponsor for the whole transaction; the optional RAM purchase follows it.
/// Nothing is returned unless every sponsor field the actions need is set.
pub fn sponsor_actions(policy: &GuardPolicy, account: &str) -> GuardResult<Vec<Action>> {
    let sponsor = policy
        .sponsor()
        .ok_or_else(|| GuardError::GuardRejected("cosign without sponsor permission".into()))?;
    let contract_action = policy
        .contract_action
        .as_deref()
        .ok_or_else(|| GuardError::GuardRejected("cosign without contract_action".into()))?;

    let mut actions = Vec::with_capacity(2);

    actions.push(
        Action::new(
            sponsor.actor.clone(),
            contract_action,
            json!({ "message": policy.uniqid.clone().unwrap_or_default() }),
        )
        .authorized_by(vec![sponsor.clone()]),
    );

    if policy.stats().buyram {
        let bytes = policy
            .buyram_bytes
            .ok_or_else(|| GuardError::GuardRejected("buyram without buyram_bytes".into()))?;
        actions.push(
            Action::new(
                SYSTEM_ACCOUNT,
                BUYRAMBYTES_ACTION,
                json!({
                    "payer": &sponsor.actor,
                    "receiver": account,
                    "bytes": bytes,
                }),
            )
            .authorized_by(vec![sponsor.clone()]),
        );
    }

    Ok(actions)
}

/// Insert `actions` ahead of everything already in the transaction.
pub fn prepend_actions(transaction: &mut Transaction, actions: Vec<Action>) {
    transaction.actions.splice(0..0, actions);
}

/// Give every action whose authorization list is absent or empty
/// `account@permission`.
///
/// Returns how many actions were filled in.
pub fn authorize_actions(transaction: &mut Transaction, account: &str, permission: &str) -> usize {
    let default_auth = vec![PermissionLevel::new(account, permission)];
    let mut filled = 0;

    for action in &mut transaction.actions {
        if action.needs_authorization() {
            action.authorization = Some(default_auth.clone());
            filled += 1;
        }
    }

    filled
}

/// Copy of `transaction` with every `sponsor` entry removed from every
/// authorization list. All other entries keep their order.
pub fn strip_sponsor_authorizations(transaction: &Transaction, sponsor: &PermissionLevel) -> Transaction {
    let mut stripped = transaction.clone();
    for action in &mut stripped.actions {
        if let Some(auth) = action.authorization.as_mut() {
            auth.retain(|level| level != sponsor);
        }
    }
    stripped
}
