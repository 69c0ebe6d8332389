//! Cooperative cancellation for pipelines.
//!
//! Cancellation is kept outside [`crate::Outcome`]: a cancelled operation has
//! no outcome at all, so callers see [`Cancelled`] instead of a failure.

use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The operation was abandoned because its token was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// Drive `future` unless `token` is cancelled first.
///
/// An already-cancelled token never polls the future. When the token fires
/// mid-flight the future is dropped at its current suspension point.
///
/// # Errors
///
/// Returns [`Cancelled`] when the token is or becomes cancelled before the
/// future completes.
pub async fn with_cancellation<F>(
    token: &CancellationToken,
    future: F,
) -> Result<F::Output, Cancelled>
where
    F: Future,
{
    if token.is_cancelled() {
        return Err(Cancelled);
    }
    tokio::select! {
        biased;
        () = token.cancelled() => Err(Cancelled),
        output = future => Ok(output),
    }
}
