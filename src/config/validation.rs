//! Semantic configuration checks.
//!
//! Syntactic validation happens in serde during parsing; this module
//! checks the values that serde cannot.

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

fn err(field: &str, message: &str) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Validate a parsed configuration.
///
/// Collects all failures instead of stopping at the first one.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.gateway.environment.is_empty() {
        errors.push(err("gateway.environment", "must not be empty"));
    }
    if config.listener.proxy_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(err("listener.proxy_address", "not a valid socket address"));
    }
    if config.listener.external_api_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(err(
            "listener.external_api_address",
            "not a valid socket address",
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(err("timeouts.request_secs", "must be greater than zero"));
    }
    if config.timeouts.proxy_secs == 0 {
        errors.push(err("timeouts.proxy_secs", "must be greater than zero"));
    }
    if config.timeouts.token_secs == 0 {
        errors.push(err("timeouts.token_secs", "must be greater than zero"));
    }
    if config.cache.proxy_ttl_secs == 0 {
        errors.push(err("cache.proxy_ttl_secs", "must be greater than zero"));
    }
    if config.cache.sweep_interval_secs == 0 {
        errors.push(err("cache.sweep_interval_secs", "must be greater than zero"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(err("limits.max_body_bytes", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
