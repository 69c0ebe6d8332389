//! The success/failure container threaded through handler pipelines.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::error::{ErrorKind, ExceptionError, ResultError};

#[derive(Debug, Clone, PartialEq)]
enum State<T> {
    Success(T),
    Failure(Vec<ResultError>),
}

/// Outcome of an operation: a success carrying a value, or a failure carrying
/// structured errors. Both variants carry informational messages.
///
/// `Outcome` without a type argument is the unit form used by operations
/// that do not report a value.
///
/// ## Invariants
/// - A success always holds a value and never holds errors.
/// - Attaching any error turns the outcome into a failure; failure is
///   absorbing for every combinator.
/// - Messages keep their insertion order across combinators.
///
/// # Examples
/// ```
/// use result_pipeline::{ErrorKind, Outcome, ResultError};
///
/// let outcome: Outcome<u32> = Outcome::success(3).with_message("computed");
/// assert!(outcome.is_success());
///
/// let failed = outcome.with_error(ResultError::not_found("missing"));
/// assert!(failed.is_failure());
/// assert!(failed.has_error(ErrorKind::NotFound));
/// assert_eq!(failed.messages(), ["computed"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use = "an outcome may carry a failure that should be handled"]
pub struct Outcome<T = ()> {
    state: State<T>,
    messages: Vec<String>,
}

impl Outcome {
    /// Successful unit outcome.
    pub fn ok() -> Self {
        Self::success(())
    }
}

impl<T> Outcome<T> {
    /// Successful outcome carrying `value`.
    pub fn success(value: T) -> Self {
        Self {
            state: State::Success(value),
            messages: Vec::new(),
        }
    }

    /// Failed outcome without errors; attach them with [`Self::with_error`].
    pub fn failure() -> Self {
        Self {
            state: State::Failure(Vec::new()),
            messages: Vec::new(),
        }
    }

    /// Failed outcome carrying a single error.
    pub fn failure_with(error: impl Into<ResultError>) -> Self {
        Self {
            state: State::Failure(vec![error.into()]),
            messages: Vec::new(),
        }
    }

    /// Failed outcome carrying an [`ExceptionError`] for `error`.
    pub fn exception<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::failure_with(ExceptionError::new(error))
    }

    /// Rebuild an outcome from its parts.
    pub fn from_parts(state: Result<T, Vec<ResultError>>, messages: Vec<String>) -> Self {
        let state = match state {
            Ok(value) => State::Success(value),
            Err(errors) => State::Failure(errors),
        };
        Self { state, messages }
    }

    /// Split into the success value (or errors) and the messages.
    pub fn into_parts(self) -> (Result<T, Vec<ResultError>>, Vec<String>) {
        let state = match self.state {
            State::Success(value) => Ok(value),
            State::Failure(errors) => Err(errors),
        };
        (state, self.messages)
    }

    /// Convert a plain `Result`, wrapping `Err` as an [`ExceptionError`].
    pub fn from_result<E>(result: Result<T, E>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        match result {
            Ok(value) => Self::success(value),
            Err(error) => Self::exception(error),
        }
    }

    /// Whether the outcome is a success.
    pub const fn is_success(&self) -> bool {
        matches!(self.state, State::Success(_))
    }

    /// Whether the outcome is a failure.
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The success value, if any.
    pub const fn value(&self) -> Option<&T> {
        match &self.state {
            State::Success(value) => Some(value),
            State::Failure(_) => None,
        }
    }

    /// Consume the outcome, returning the success value, if any.
    pub fn into_value(self) -> Option<T> {
        match self.state {
            State::Success(value) => Some(value),
            State::Failure(_) => None,
        }
    }

    /// Informational messages in insertion order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Errors in insertion order; always empty on success.
    pub fn errors(&self) -> &[ResultError] {
        match &self.state {
            State::Success(_) => &[],
            State::Failure(errors) => errors,
        }
    }

    /// Whether any attached error has the given kind.
    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors().iter().any(|error| error.kind() == kind)
    }

    /// Append an informational message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Append informational messages.
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
        self
    }

    /// Attach an error, turning the outcome into a failure.
    pub fn with_error(self, error: impl Into<ResultError>) -> Self {
        self.with_errors([error.into()])
    }

    /// Attach errors. A non-empty list turns the outcome into a failure; an
    /// empty list leaves it untouched.
    pub fn with_errors<I>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = ResultError>,
    {
        let mut incoming = errors.into_iter().peekable();
        if incoming.peek().is_none() {
            return self;
        }
        self.state = match self.state {
            State::Success(_) => State::Failure(incoming.collect()),
            State::Failure(mut existing) => {
                existing.extend(incoming);
                State::Failure(existing)
            }
        };
        self
    }

    /// Drop the value, keeping state, messages, and errors.
    pub fn discard_value(self) -> Outcome {
        let state = match self.state {
            State::Success(_) => State::Success(()),
            State::Failure(errors) => State::Failure(errors),
        };
        Outcome {
            state,
            messages: self.messages,
        }
    }

    /// Re-type a failure so it can be returned from a step producing `U`.
    ///
    /// Messages and errors are kept. Calling this on a success drops the
    /// value and yields a failure without errors.
    pub fn into_failure<U>(self) -> Outcome<U> {
        let (state, messages) = self.into_parts();
        Outcome::failed(state.err().unwrap_or_default(), messages)
    }

    /// Convert into a standard `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<T, Failure> {
        let (state, messages) = self.into_parts();
        state.map_err(|errors| Failure { errors, messages })
    }

    /// Fold both variants into a single value.
    pub fn match_outcome<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(Vec<ResultError>) -> R,
    ) -> R {
        match self.state {
            State::Success(value) => on_success(value),
            State::Failure(errors) => on_failure(errors),
        }
    }

    /// Prepend messages gathered by earlier steps.
    pub(crate) fn with_prior_messages(mut self, mut prior: Vec<String>) -> Self {
        prior.append(&mut self.messages);
        self.messages = prior;
        self
    }

    /// Failure carrying `errors` and the given messages.
    pub(crate) fn failed(errors: Vec<ResultError>, messages: Vec<String>) -> Self {
        Self {
            state: State::Failure(errors),
            messages,
        }
    }
}

impl Outcome {
    /// Attach `value` to a unit outcome, keeping state and messages.
    pub fn wrap<U>(self, value: U) -> Outcome<U> {
        let state = match self.state {
            State::Success(()) => State::Success(value),
            State::Failure(errors) => State::Failure(errors),
        };
        Outcome {
            state,
            messages: self.messages,
        }
    }
}

impl<T> From<ResultError> for Outcome<T> {
    fn from(error: ResultError) -> Self {
        Self::failure_with(error)
    }
}

impl<T> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Success(_) => f.write_str("success"),
            State::Failure(errors) if errors.is_empty() => f.write_str("failure"),
            State::Failure(errors) => {
                f.write_str("failure: ")?;
                for (index, error) in errors.iter().enumerate() {
                    if index > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{error}")?;
                }
                Ok(())
            }
        }
    }
}

/// Failed outcome converted into a standard error by [`Outcome::into_result`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("operation failed with {} error(s)", .errors.len())]
pub struct Failure {
    /// Errors carried by the failed outcome.
    pub errors: Vec<ResultError>,
    /// Messages carried by the failed outcome.
    pub messages: Vec<String>,
}
