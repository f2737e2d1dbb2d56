//! Client-side transaction guard for sponsored (cosigned) EOSIO/WAX transactions.

pub mod chain;
pub mod config;
pub mod guard;
pub mod observability;
pub mod provider;

pub use chain::{Action, PermissionLevel, Transaction};
pub use config::TxGuardConfig;
pub use guard::{GuardError, GuardFailure, GuardStats, PreparedTransaction, Strategy, TransactionGuard};
pub use provider::GuardProvider;
