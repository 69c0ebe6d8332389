//! Request dispatch.
//!
//! Commands and queries implement [`Request`]; each has exactly one
//! [`RequestHandler`] registered with the [`Requester`]. Dispatching a
//! request opens a tracing span carrying a fresh [`TraceId`], rejects
//! requests whose shape is invalid before the handler runs, and abandons the
//! handler when the cancellation token fires.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use result_pipeline::{Cancelled, Outcome, with_cancellation};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::domain::TraceId;

/// Command or query understood by the [`Requester`].
pub trait Request: Send + 'static {
    /// Value produced by a successful handler.
    type Response: Send + 'static;

    /// Name used in logs.
    const NAME: &'static str;

    /// Structural validation run before the handler. Business rules that
    /// need I/O belong in the handler.
    fn validate(&self) -> Outcome {
        Outcome::ok()
    }
}

/// Handles one request type.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    /// Execute `request`.
    async fn handle(&self, request: R) -> Outcome<R::Response>;
}

/// Dispatch failures that are not business outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The cancellation token fired before the handler completed.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// No handler was registered for the request type.
    #[error("no handler registered for {request}")]
    NoHandler {
        /// Request name.
        request: &'static str,
    },
}

/// Registry of request handlers keyed by request type.
#[derive(Default)]
pub struct Requester {
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Requester {
    /// Requester without handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for requests of type `R`, replacing any previous
    /// registration.
    #[must_use]
    pub fn register<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.handlers.insert(TypeId::of::<R>(), Box::new(handler));
        self
    }

    fn handler<R: Request>(&self) -> Option<Arc<dyn RequestHandler<R>>> {
        self.handlers
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn RequestHandler<R>>>())
            .map(Arc::clone)
    }

    /// Validate and handle `request` unless `token` is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoHandler`] when `R` was never registered and
    /// [`DispatchError::Cancelled`] when `token` fires first. Business
    /// failures are reported inside the returned [`Outcome`].
    pub async fn send<R: Request>(
        &self,
        request: R,
        token: &CancellationToken,
    ) -> Result<Outcome<R::Response>, DispatchError> {
        let handler = self
            .handler::<R>()
            .ok_or(DispatchError::NoHandler { request: R::NAME })?;
        let trace_id = TraceId::generate();
        let span = info_span!("request", request = R::NAME, trace_id = %trace_id);

        let pipeline = async move {
            Outcome::success(request)
                .unless(|request| {
                    let checked = request.validate();
                    if checked.is_failure() {
                        debug!(errors = checked.errors().len(), "request rejected by validator");
                    }
                    checked
                })
                .bind_async(|request| handler.handle(request))
                .await
        };

        let result = with_cancellation(token, TraceId::scope(trace_id, pipeline))
            .instrument(span.clone())
            .await;
        match result {
            Ok(outcome) => {
                span.in_scope(|| log_outcome(&outcome));
                Ok(outcome)
            }
            Err(cancelled) => {
                span.in_scope(|| warn!("request cancelled"));
                Err(cancelled.into())
            }
        }
    }
}

fn log_outcome<T>(outcome: &Outcome<T>) {
    if outcome.is_success() {
        info!(messages = outcome.messages().len(), "request succeeded");
    } else {
        let kinds: Vec<&str> = outcome.errors().iter().map(|e| e.kind().code()).collect();
        info!(errors = ?kinds, "request failed");
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for request dispatch.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use result_pipeline::{ErrorKind, ResultError};
    use rstest::rstest;

    use super::*;

    struct Greet {
        name: String,
    }

    impl Request for Greet {
        type Response = String;
        const NAME: &'static str = "Greet";

        fn validate(&self) -> Outcome {
            Outcome::ok().with_errors(
                self.name
                    .trim()
                    .is_empty()
                    .then(|| ResultError::invalid_field("name", "name is required")),
            )
        }
    }

    #[derive(Default)]
    struct GreetHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RequestHandler<Greet> for GreetHandler {
        async fn handle(&self, request: Greet) -> Outcome<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Outcome::success(format!("hello {}", request.name))
                .with_message(TraceId::current().map_or_else(String::new, |id| id.to_string()))
        }
    }

    fn requester(calls: &Arc<AtomicUsize>) -> Requester {
        Requester::new().register::<Greet, _>(GreetHandler {
            calls: Arc::clone(calls),
        })
    }

    #[tokio::test]
    async fn dispatches_to_the_registered_handler_inside_a_trace_scope() {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = requester(&calls)
            .send(Greet { name: "Ada".to_owned() }, &CancellationToken::new())
            .await
            .expect("dispatched");

        assert_eq!(outcome.value().map(String::as_str), Some("hello Ada"));
        let trace = outcome.messages().first().expect("trace id message");
        assert!(trace.parse::<TraceId>().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn validator_runs_before_the_handler(#[case] name: &str) {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = requester(&calls)
            .send(Greet { name: name.to_owned() }, &CancellationToken::new())
            .await
            .expect("dispatched");

        assert!(outcome.has_error(ErrorKind::Validation));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancelled_requests_never_reach_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        token.cancel();

        let result = requester(&calls)
            .send(Greet { name: "Ada".to_owned() }, &token)
            .await;

        assert!(matches!(result, Err(DispatchError::Cancelled(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_requests_are_reported() {
        let result = Requester::new()
            .send(Greet { name: "Ada".to_owned() }, &CancellationToken::new())
            .await;
        assert_eq!(
            result.err(),
            Some(DispatchError::NoHandler { request: "Greet" })
        );
    }
}
