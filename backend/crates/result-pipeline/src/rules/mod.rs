//! Business rule engine.
//!
//! A rule is a named pass/fail check carrying its own failure message. Rules
//! are gathered in an ordered [`RuleSet`] and evaluated fail-fast: the first
//! failing rule decides the result and later rules are never invoked.
//!
//! ```
//! use result_pipeline::{ErrorKind, RuleSet, rules};
//!
//! let outcome = RuleSet::new()
//!     .add(rules::is_not_empty("Ada"))
//!     .add(rules::not_equal("Ada", "Ada"))
//!     .add(rules::max_length("Ada", 2))
//!     .check();
//!
//! assert!(outcome.has_error(ErrorKind::Validation));
//! assert_eq!(outcome.errors().len(), 1);
//! ```

use std::any::type_name;
use std::error::Error as StdError;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ExceptionError, ValidationError};
use crate::outcome::Outcome;

mod builtin;
mod func;

pub use builtin::{
    Between, Equal, GreaterThan, IsFalse, IsNotEmpty, IsOneOf, IsSome, IsTrue, IsValidEmail,
    LessThan, MaxLength, MinLength, NotEqual, TextContains, between, equal, greater_than, is_false,
    is_not_empty, is_one_of, is_some, is_true, is_valid_email, less_than, max_length, min_length,
    not_equal, text_contains,
};
pub use func::{AsyncFuncRule, FuncRule};

/// Error returned by an asynchronous rule whose check could not complete.
pub type RuleCheckError = Box<dyn StdError + Send + Sync>;

/// Synchronous business rule.
pub trait Rule: Send + Sync {
    /// Rule name reported with failures. Defaults to the implementing type's
    /// name without its module path.
    fn name(&self) -> String {
        short_type_name(type_name::<Self>())
    }

    /// Failure description.
    fn message(&self) -> String;

    /// Whether the invariant holds.
    fn is_satisfied(&self) -> bool;

    /// Evaluate the rule as an [`Outcome`].
    fn check(&self) -> Outcome {
        if self.is_satisfied() {
            Outcome::ok()
        } else {
            rule_failed(self.name(), self.message())
        }
    }
}

/// Business rule whose check performs asynchronous work, such as a
/// repository query.
#[async_trait]
pub trait AsyncRule: Send + Sync {
    /// Rule name reported with failures.
    fn rule_name(&self) -> String {
        short_type_name(type_name::<Self>())
    }

    /// Failure description.
    fn failure_message(&self) -> String;

    /// Evaluate the invariant.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleCheckError`] when the check itself cannot run. The
    /// rule set reports it as an exception rather than a rule violation.
    async fn evaluate(&self) -> Result<bool, RuleCheckError>;
}

fn rule_failed(name: String, message: String) -> Outcome {
    debug!(rule = %name, "business rule not satisfied");
    Outcome::failure_with(ValidationError::for_rule(name, message))
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_owned()
}

/// Ordered set of synchronous rules.
#[derive(Default)]
#[must_use]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// Empty set; checking it succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rule`.
    pub fn add(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Append `rule` only when `condition` holds.
    pub fn add_if(self, condition: bool, rule: impl Rule + 'static) -> Self {
        if condition { self.add(rule) } else { self }
    }

    /// Append an asynchronous rule, turning the set into an [`AsyncRuleSet`].
    pub fn add_async(self, rule: impl AsyncRule + 'static) -> AsyncRuleSet {
        AsyncRuleSet::from(self).add_async(rule)
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate rules in order, stopping at the first failure.
    pub fn check(&self) -> Outcome {
        self.rules
            .iter()
            .map(|rule| rule.check())
            .find(Outcome::is_failure)
            .unwrap_or_else(Outcome::ok)
    }

    /// Evaluate as a future so the set can be handed to
    /// [`Outcome::unless_async`].
    pub async fn check_async(self) -> Outcome {
        self.check()
    }
}

enum Entry {
    Sync(Box<dyn Rule>),
    Async(Box<dyn AsyncRule>),
}

impl Entry {
    async fn check(&self) -> Outcome {
        match self {
            Self::Sync(rule) => rule.check(),
            Self::Async(rule) => match rule.evaluate().await {
                Ok(true) => Outcome::ok(),
                Ok(false) => rule_failed(rule.rule_name(), rule.failure_message()),
                Err(error) => {
                    debug!(rule = %rule.rule_name(), error = %error, "business rule check failed");
                    Outcome::failure_with(ExceptionError::from_boxed(error))
                }
            },
        }
    }
}

/// Ordered set mixing synchronous and asynchronous rules.
#[derive(Default)]
#[must_use]
pub struct AsyncRuleSet {
    entries: Vec<Entry>,
}

impl AsyncRuleSet {
    /// Empty set; checking it succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a synchronous rule.
    pub fn add(mut self, rule: impl Rule + 'static) -> Self {
        self.entries.push(Entry::Sync(Box::new(rule)));
        self
    }

    /// Append a synchronous rule only when `condition` holds.
    pub fn add_if(self, condition: bool, rule: impl Rule + 'static) -> Self {
        if condition { self.add(rule) } else { self }
    }

    /// Append an asynchronous rule.
    pub fn add_async(mut self, rule: impl AsyncRule + 'static) -> Self {
        self.entries.push(Entry::Async(Box::new(rule)));
        self
    }

    /// Append an asynchronous rule only when `condition` holds.
    pub fn add_async_if(self, condition: bool, rule: impl AsyncRule + 'static) -> Self {
        if condition { self.add_async(rule) } else { self }
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate rules in order, stopping at the first failure. A rule whose
    /// check errors yields an [`ExceptionError`] failure.
    pub async fn check_async(self) -> Outcome {
        for entry in &self.entries {
            let outcome = entry.check().await;
            if outcome.is_failure() {
                return outcome;
            }
        }
        Outcome::ok()
    }
}

impl From<RuleSet> for AsyncRuleSet {
    fn from(set: RuleSet) -> Self {
        Self {
            entries: set.rules.into_iter().map(Entry::Sync).collect(),
        }
    }
}
