//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, per-method proxy handlers)
//!     → request.rs (request ID, forwarded headers, JSON body)
//!     → [routing resolves service → target URI]
//!     → client.rs (bounded call to the backend)
//!     → response.rs (JSON re-encode or raw passthrough)
//!     → Send to client
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod server;

pub use client::UpstreamClient;
pub use request::{ProxiedRequest, UuidRequestId, X_REQUEST_ID};
pub use response::ProxiedResponse;
pub use server::{AppState, HttpServer};
