//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound path (/proxy/{service}/{...forwarded})
//!     → path.rs (split into service name + forwarded segments)
//!     → registry.rs (service name → base address)
//!     → Return: target URI or explicit ResolutionError
//!
//! Registry compilation (at startup):
//!     [services] table from config
//!     → validate base addresses
//!     → freeze as immutable ServiceRegistry
//! ```
//!
//! # Design Decisions
//! - Registry built at startup, immutable at runtime
//! - Unknown service names never produce a URL
//! - Deterministic: same input always resolves to the same target

pub mod path;
pub mod registry;

pub use path::{ProxyPath, PROXY_PREFIX};
pub use registry::{RegistryError, ServiceEndpoint, ServiceRegistry};
