//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! config.chain (RPC URL, failovers, timeout)
//!     → client.rs (get_account with timeouts + failover)
//!     → types.rs (Transaction / Action / AccountResources)
//!     → guard (threshold comparison, action rewriting)
//! ```
//!
//! Signing and broadcast stay with the wallet SDK; this module only reads
//! chain state and models the transaction the guard rewrites.

pub mod client;
pub mod types;

pub use client::{ChainRpc, HttpChainClient};
pub use types::{
    AccountResources, Action, ChainConfig, ChainError, ChainResult, PermissionLevel,
    ResourceLimit, Transaction,
};
