//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → connect timeout (HttpConnector)
//!     → timeouts.rs (deadline over the whole round trip, body included)
//!     → On failure: single client-visible error, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every backend call has a deadline
//! - No retries and no circuit breaking: one failure, one error response

pub mod timeouts;

pub use timeouts::with_deadline;
