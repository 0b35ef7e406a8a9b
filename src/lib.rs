//! Path-based HTTP gateway.
//!
//! Requests under `/proxy/{service}/...` are forwarded to the base address
//! registered for `service`, and the backend reply is relayed back.

pub mod admin;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::ServiceRegistry;
