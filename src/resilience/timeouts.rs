//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap backend calls with a deadline
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout
//! - The wrapped future is dropped on expiry, which closes the backend
//!   connection; the same happens when axum drops a handler whose client
//!   went away

use std::future::Future;
use std::time::Duration;

use crate::error::UpstreamError;

/// Run `call` with a hard deadline.
pub async fn with_deadline<F, T>(limit: Duration, call: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(limit)),
    }
}
