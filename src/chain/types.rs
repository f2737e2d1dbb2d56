//! Chain-specific types and error definitions.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// An `{actor, permission}` pair naming who authorizes an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub actor: String,
    pub permission: String,
}

impl PermissionLevel {
    pub fn new(actor: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            permission: permission.into(),
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.actor, self.permission)
    }
}

/// A single contract action inside a transaction.
///
/// `authorization` distinguishes "not specified" (`None`) from an explicit
/// list so the field is omitted on the wire when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub account: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Vec<PermissionLevel>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Action {
    pub fn new(account: impl Into<String>, name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            account: account.into(),
            name: name.into(),
            authorization: None,
            data,
        }
    }

    /// Attach an explicit authorization list.
    pub fn authorized_by(mut self, authorization: Vec<PermissionLevel>) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// True when the action has no usable authorization list.
    ///
    /// An explicit empty list counts as missing and gets the default
    /// authorization, so every outgoing action carries at least one signer.
    pub fn needs_authorization(&self) -> bool {
        self.authorization.as_ref().map_or(true, |auth| auth.is_empty())
    }
}

/// A pending transaction.
///
/// Only the action list is interpreted; header fields such as
/// `expiration` or `ref_block_num` pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Transaction {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            extra: serde_json::Map::new(),
        }
    }
}

/// One resource limit as reported by `get_account`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimit {
    #[serde(default, deserialize_with = "int_or_string")]
    pub used: i64,
    #[serde(default, deserialize_with = "int_or_string")]
    pub available: i64,
    #[serde(default, deserialize_with = "int_or_string")]
    pub max: i64,
}

/// CPU (microseconds) and NET (bytes) availability for an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResources {
    #[serde(default)]
    pub cpu_limit: ResourceLimit,
    #[serde(default)]
    pub net_limit: ResourceLimit,
}

impl AccountResources {
    /// Available CPU converted from microseconds to milliseconds.
    pub fn cpu_available_ms(&self) -> f64 {
        self.cpu_limit.available as f64 / 1000.0
    }

    pub fn net_available_bytes(&self) -> i64 {
        self.net_limit.available
    }
}

// Nodes encode 64-bit limits either as JSON numbers or as decimal strings.
fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Str(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Errors that can occur during chain RPC operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node answered with something that is not a valid account record.
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// The account does not exist on chain.
    #[error("Account not found: {0}")]
    AccountNotFound(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
