//! Outcome container, pipeline combinators, and business rules.
//!
//! Handlers in the customer backend never use `?` on expected failures.
//! Instead they thread a value through an [`Outcome`] pipeline: every step is
//! skipped once a step has failed, and the failure (its errors and messages)
//! reaches the caller unchanged.
//!
//! # Example
//!
//! ```
//! use result_pipeline::{Outcome, ResultError, RuleSet, rules};
//!
//! let outcome = Outcome::success("john.doe@example.com".to_owned())
//!     .unless(|email| {
//!         RuleSet::new()
//!             .add(rules::is_not_empty(email))
//!             .add(rules::is_valid_email(email))
//!             .check()
//!     })
//!     .ensure(|email| email.len() < 64, ResultError::validation("email too long"))
//!     .map(|email| email.to_uppercase());
//!
//! assert_eq!(outcome.value().map(String::as_str), Some("JOHN.DOE@EXAMPLE.COM"));
//! ```

mod cancellation;
mod combinators;
mod combinators_async;
mod error;
mod exception;
mod future_ext;
mod mapper;
mod outcome;
pub mod rules;

pub use cancellation::{Cancelled, with_cancellation};
pub use error::{
    ConcurrencyError, ConflictError, EntityNotFoundError, ErrorKind, ExceptionError,
    NotFoundError, PanicError, ResultError, ValidationError,
};
pub use future_ext::OutcomeFutureExt;
pub use mapper::Mapper;
pub use outcome::{Failure, Outcome};
pub use rules::{AsyncRule, AsyncRuleSet, Rule, RuleCheckError, RuleSet};
