//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every service base address is a usable HTTP URL
//! - Validate value ranges (timeouts > 0, sizes > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("no services configured")]
    NoServices,

    #[error("service name '{0}' must be non-empty and contain no '/'")]
    InvalidServiceName(String),

    #[error("service '{name}' has an invalid base address '{address}': {reason}")]
    InvalidBaseAddress {
        name: String,
        address: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("timeouts.upstream_ms must be shorter than timeouts.request_secs")]
    UpstreamOutlivesRequest,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    for (name, address) in &config.services {
        if name.is_empty() || name.contains('/') {
            errors.push(ValidationError::InvalidServiceName(name.clone()));
        }
        if let Err(reason) = check_base_address(address) {
            errors.push(ValidationError::InvalidBaseAddress {
                name: name.clone(),
                address: address.clone(),
                reason,
            });
        }
    }

    let limits = [
        ("timeouts.connect_ms", config.timeouts.connect_ms as u128),
        ("timeouts.upstream_ms", config.timeouts.upstream_ms as u128),
        ("timeouts.request_secs", config.timeouts.request_secs as u128),
        ("security.max_body_size", config.security.max_body_size as u128),
        ("security.max_response_size", config.security.max_response_size as u128),
    ];
    for (field, value) in limits {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    // Otherwise the inbound timeout fires first and the client gets 408, not 504.
    if config.timeouts.upstream() >= config.timeouts.request() && config.timeouts.request_secs > 0 {
        errors.push(ValidationError::UpstreamOutlivesRequest);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that a base address is something the outbound client can reach.
pub(crate) fn check_base_address(address: &str) -> Result<Url, String> {
    let url = Url::parse(address).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(url)
}
