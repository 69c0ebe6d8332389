//! Structured errors attached to failed outcomes.
//!
//! These errors are transport agnostic. Inbound adapters map each
//! [`ErrorKind`] to their own envelope (status code, exit code, JSON payload).

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable machine-readable category of a [`ResultError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Structural or business-rule violation.
    Validation,
    /// The requested resource does not exist.
    NotFound,
    /// A specific entity could not be found by its identifier.
    EntityNotFound,
    /// The operation conflicts with the current state.
    Conflict,
    /// An optimistic concurrency token did not match.
    Concurrency,
    /// An unexpected error or panic escaped a pipeline step.
    Exception,
}

impl ErrorKind {
    /// Machine-readable code for adapters.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::EntityNotFound => "entity_not_found",
            Self::Conflict => "conflict",
            Self::Concurrency => "concurrency",
            Self::Exception => "exception",
        }
    }
}

/// Structural or business-rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    field: Option<String>,
    rule: Option<String>,
    message: String,
}

impl ValidationError {
    /// Validation failure not tied to a particular field.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            rule: None,
            message: message.into(),
        }
    }

    /// Validation failure for a named input field.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            rule: None,
            message: message.into(),
        }
    }

    /// Validation failure raised by a named business rule.
    pub fn for_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: None,
            rule: Some(rule.into()),
            message: message.into(),
        }
    }

    /// Input field the failure refers to, if any.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Name of the rule that failed, if any.
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The requested resource does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NotFoundError {
    message: String,
}

impl NotFoundError {
    /// Create a not-found error with a custom message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A specific entity was not found (or was already deleted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EntityNotFoundError {
    entity: String,
    id: String,
    message: String,
}

impl EntityNotFoundError {
    /// Create an error for `entity` identified by `id`.
    pub fn new(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        let entity = entity.into();
        let id = id.to_string();
        let message = format!("{entity} with id '{id}' was not found");
        Self {
            entity,
            id,
            message,
        }
    }

    /// Entity type name.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Identifier that was looked up.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The operation conflicts with current state (for example a duplicate key).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConflictError {
    message: String,
}

impl ConflictError {
    /// Create a conflict error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Optimistic concurrency token mismatch during an update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConcurrencyError {
    entity: String,
    id: String,
    expected: String,
    actual: String,
    message: String,
}

impl ConcurrencyError {
    /// Create a concurrency error for `entity`/`id` with the submitted and
    /// stored version tokens.
    pub fn new(
        entity: impl Into<String>,
        id: impl fmt::Display,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        let entity = entity.into();
        let id = id.to_string();
        let expected = expected.to_string();
        let actual = actual.to_string();
        let message = format!(
            "{entity} '{id}' was modified concurrently (expected version {expected}, found {actual})"
        );
        Self {
            entity,
            id,
            expected,
            actual,
            message,
        }
    }

    /// Entity type name.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Identifier of the conflicting entity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Version token submitted by the caller.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Version token currently stored.
    pub fn actual(&self) -> &str {
        &self.actual
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error standing in for a panic payload captured inside a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step panicked: {message}")]
pub struct PanicError {
    message: String,
}

impl PanicError {
    /// Panic message, or a placeholder when the payload was not a string.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Unexpected error that escaped a pipeline step.
///
/// The original error is kept as [`std::error::Error::source`] so boundary
/// layers can log the full chain while callers see a uniform failure shape.
#[derive(Clone)]
pub struct ExceptionError {
    message: String,
    source: Arc<dyn StdError + Send + Sync>,
}

impl ExceptionError {
    /// Wrap an error returned from a pipeline step.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            source: Arc::new(error),
        }
    }

    /// Wrap an already boxed error.
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync>) -> Self {
        Self {
            message: error.to_string(),
            source: Arc::from(error),
        }
    }

    /// Convert a payload captured by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_owned()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Self::new(PanicError { message })
    }

    /// Human-readable description of the wrapped error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Attempt to view the wrapped error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.source.downcast_ref::<E>()
    }

    /// Whether the wrapped error originated from a panic.
    pub fn is_panic(&self) -> bool {
        self.downcast_ref::<PanicError>().is_some()
    }
}

impl fmt::Debug for ExceptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionError")
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ExceptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ExceptionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

impl PartialEq for ExceptionError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

/// Error attached to a failed [`crate::Outcome`].
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ResultError {
    /// Structural or business-rule violation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Resource does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    /// Entity not found by identifier.
    #[error(transparent)]
    EntityNotFound(#[from] EntityNotFoundError),
    /// State conflict.
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    /// Optimistic concurrency token mismatch.
    #[error(transparent)]
    Concurrency(#[from] ConcurrencyError),
    /// Unexpected error or panic inside a step.
    #[error(transparent)]
    Exception(#[from] ExceptionError),
}

impl ResultError {
    /// Convenience constructor for [`ValidationError::new`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(message))
    }

    /// Convenience constructor for [`ValidationError::for_field`].
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::for_field(field, message))
    }

    /// Convenience constructor for [`NotFoundError::new`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(NotFoundError::new(message))
    }

    /// Convenience constructor for [`EntityNotFoundError::new`].
    pub fn entity_not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::EntityNotFound(EntityNotFoundError::new(entity, id))
    }

    /// Convenience constructor for [`ConflictError::new`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(ConflictError::new(message))
    }

    /// Convenience constructor for [`ConcurrencyError::new`].
    pub fn concurrency(
        entity: impl Into<String>,
        id: impl fmt::Display,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::Concurrency(ConcurrencyError::new(entity, id, expected, actual))
    }

    /// Convenience constructor for [`ExceptionError::new`].
    pub fn exception<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Exception(ExceptionError::new(error))
    }

    /// Category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::EntityNotFound(_) => ErrorKind::EntityNotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Concurrency(_) => ErrorKind::Concurrency,
            Self::Exception(_) => ErrorKind::Exception,
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(err) => err.message(),
            Self::NotFound(err) => err.message(),
            Self::EntityNotFound(err) => err.message(),
            Self::Conflict(err) => err.message(),
            Self::Concurrency(err) => err.message(),
            Self::Exception(err) => err.message(),
        }
    }

    /// Input field for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation(err) => err.field(),
            _ => None,
        }
    }

    /// Whether this is a not-found style error (plain or entity).
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::EntityNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[rstest]
    #[case(ResultError::validation("bad"), ErrorKind::Validation)]
    #[case(ResultError::not_found("gone"), ErrorKind::NotFound)]
    #[case(ResultError::entity_not_found("Customer", 7), ErrorKind::EntityNotFound)]
    #[case(ResultError::conflict("dup"), ErrorKind::Conflict)]
    #[case(ResultError::concurrency("Customer", 7, "a", "b"), ErrorKind::Concurrency)]
    #[case(ResultError::exception(DiskError), ErrorKind::Exception)]
    fn kind_matches_variant(#[case] error: ResultError, #[case] kind: ErrorKind) {
        assert_eq!(error.kind(), kind);
    }

    #[test]
    fn entity_not_found_formats_entity_and_id() {
        let error = ResultError::entity_not_found("Customer", "42");
        assert_eq!(error.message(), "Customer with id '42' was not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn exception_keeps_source_for_downcasting() {
        let error = ExceptionError::new(DiskError);
        assert_eq!(error.message(), "disk on fire");
        assert!(error.downcast_ref::<DiskError>().is_some());
        assert!(!error.is_panic());
        assert!(StdError::source(&error).is_some());
    }

    #[test]
    fn panic_payloads_become_panic_errors() {
        let error = ExceptionError::from_panic(Box::new("boom"));
        assert!(error.is_panic());
        assert_eq!(error.message(), "step panicked: boom");

        let owned = ExceptionError::from_panic(Box::new(String::from("kaboom")));
        assert_eq!(owned.message(), "step panicked: kaboom");
    }

    #[test]
    fn field_is_reported_for_validation_only() {
        assert_eq!(
            ResultError::invalid_field("email", "missing").field(),
            Some("email")
        );
        assert_eq!(ResultError::conflict("dup").field(), None);
    }

    #[test]
    fn error_kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorKind::EntityNotFound).expect("serialize kind");
        assert_eq!(json, "\"entity_not_found\"");
        assert_eq!(ErrorKind::EntityNotFound.code(), "entity_not_found");
    }
}
