//! Configuration validation.
//!
//! Serde handles syntax; this module checks values: URLs parse, timeouts
//! are non-zero, the default permission is a usable name. All errors are
//! collected rather than stopping at the first one.

use crate::config::schema::TxGuardConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `chain.rpc_url`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &TxGuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(endpoint) = &config.guard.endpoint {
        if let Err(e) = url::Url::parse(endpoint) {
            errors.push(ValidationError::new("guard.endpoint", format!("invalid URL: {}", e)));
        }
    }
    if config.guard.request_timeout_secs == 0 {
        errors.push(ValidationError::new("guard.request_timeout_secs", "must be greater than 0"));
    }
    if config.guard.default_permission.trim().is_empty() {
        errors.push(ValidationError::new("guard.default_permission", "must not be empty"));
    }

    if let Err(e) = url::Url::parse(&config.chain.rpc_url) {
        errors.push(ValidationError::new("chain.rpc_url", format!("invalid URL: {}", e)));
    }
    for (i, failover) in config.chain.failover_urls.iter().enumerate() {
        if let Err(e) = url::Url::parse(failover) {
            errors.push(ValidationError::new(
                &format!("chain.failover_urls[{}]", i),
                format!("invalid URL: {}", e),
            ));
        }
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
