//! Service registry.
//!
//! # Responsibilities
//! - Hold the name → base address table
//! - Resolve a service name or fail explicitly
//! - Build the backend target URI for a proxied request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Built from config and injected into the server, never global
//! - Base addresses are validated once, at construction

use std::collections::HashMap;

use axum::http::Uri;
use thiserror::Error;

use crate::config::validation::check_base_address;
use crate::error::{ClientError, ResolutionError};
use crate::routing::path::ProxyPath;

/// Registry construction failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid service name '{0}'")]
    InvalidName(String),

    #[error("service '{name}' has an invalid base address: {reason}")]
    InvalidAddress { name: String, reason: String },
}

/// A single backend service.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    name: String,
    /// Base address without trailing slash, ready for concatenation.
    base: String,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>, address: &str) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(RegistryError::InvalidName(name));
        }
        let base_url = check_base_address(address).map_err(|reason| {
            RegistryError::InvalidAddress {
                name: name.clone(),
                reason,
            }
        })?;
        let base = base_url.as_str().trim_end_matches('/').to_string();

        Ok(Self { name, base })
    }

    /// `base + "/" + forwarded path`, plus the query string if one is given.
    pub fn target_uri(&self, path: &ProxyPath, query: Option<&str>) -> Result<Uri, ClientError> {
        let mut target = format!("{}/{}", self.base, path.forwarded_path());
        if let Some(query) = query {
            target.push('?');
            target.push_str(query);
        }
        target
            .parse::<Uri>()
            .map_err(|e| ClientError::InvalidPath(e.to_string()))
    }
}

/// Immutable table of known backend services.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, ServiceEndpoint>,
}

impl ServiceRegistry {
    /// Build a registry from `(name, base address)` pairs.
    pub fn new<I, K, V>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let services = entries
            .into_iter()
            .map(|(name, address)| {
                let endpoint = ServiceEndpoint::new(name, address.as_ref())?;
                Ok((endpoint.name.clone(), endpoint))
            })
            .collect::<Result<HashMap<_, _>, RegistryError>>()?;

        Ok(Self { services })
    }

    pub fn resolve(&self, name: &str) -> Result<&ServiceEndpoint, ResolutionError> {
        self.services
            .get(name)
            .ok_or_else(|| ResolutionError::UnknownService(name.to_string()))
    }

    /// Registered service names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
