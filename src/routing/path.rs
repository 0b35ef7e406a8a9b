//! Proxy path parsing.
//!
//! # Responsibilities
//! - Strip the `/proxy/` prefix from the inbound path
//! - Split the remainder into (service name, forwarded segments)
//!
//! # Design Decisions
//! - Segments stay percent-encoded exactly as received
//! - Empty forwarded segments are kept so a trailing slash survives
//! - A missing or empty service name is an explicit error

use crate::error::ResolutionError;

/// Prefix under which all proxied routes are mounted.
pub const PROXY_PREFIX: &str = "/proxy";

/// The captured path of a proxied request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyPath {
    service: String,
    forwarded: Vec<String>,
}

impl ProxyPath {
    /// Parse a full request path such as `/proxy/user/users/5`.
    pub fn from_request_path(path: &str) -> Result<Self, ResolutionError> {
        let rest = path
            .strip_prefix(PROXY_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or(ResolutionError::MissingService)?;
        Self::from_segments(rest.split('/'))
    }

    /// Build from already-split segments, first one being the service name.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, ResolutionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments = segments.into_iter().map(Into::into);
        let service = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or(ResolutionError::MissingService)?;

        Ok(Self {
            service,
            forwarded: segments.collect(),
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn forwarded_segments(&self) -> &[String] {
        &self.forwarded
    }

    /// Forwarded segments joined with `/`; empty when there are none.
    pub fn forwarded_path(&self) -> String {
        self.forwarded.join("/")
    }
}
