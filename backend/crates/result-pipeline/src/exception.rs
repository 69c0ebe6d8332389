//! Boundary where panics inside pipeline steps become [`ExceptionError`]s.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures_util::FutureExt;
use tracing::warn;

use crate::error::ExceptionError;

fn report(error: ExceptionError) -> ExceptionError {
    warn!(error = %error, "pipeline step panicked; converted to exception error");
    error
}

/// Run `step`, converting a panic into an [`ExceptionError`].
pub(crate) fn contain<R>(step: impl FnOnce() -> R) -> Result<R, ExceptionError> {
    panic::catch_unwind(AssertUnwindSafe(step))
        .map_err(|payload| report(ExceptionError::from_panic(payload)))
}

/// Drive `future` to completion, converting a panic raised while polling it
/// into an [`ExceptionError`].
pub(crate) async fn contain_async<F>(future: F) -> Result<F::Output, ExceptionError>
where
    F: Future,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|payload| report(ExceptionError::from_panic(payload)))
}
