//! Closure-backed rules for one-off checks.

use std::future::Future;

use async_trait::async_trait;

use super::{AsyncRule, Rule, RuleCheckError};

/// Synchronous rule evaluating a closure.
///
/// ```
/// use result_pipeline::{RuleSet, rules::FuncRule};
///
/// let retired = true;
/// let outcome = RuleSet::new()
///     .add(FuncRule::new("NotRetired", "customer is retired", move || !retired))
///     .check();
/// assert!(outcome.is_failure());
/// ```
pub struct FuncRule<F> {
    name: String,
    message: String,
    predicate: F,
}

impl<F> FuncRule<F>
where
    F: Fn() -> bool + Send + Sync,
{
    /// Rule named `name` that fails with `message` when `predicate` returns
    /// `false`.
    pub fn new(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            predicate,
        }
    }
}

impl<F> Rule for FuncRule<F>
where
    F: Fn() -> bool + Send + Sync,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn is_satisfied(&self) -> bool {
        (self.predicate)()
    }
}

/// Asynchronous rule evaluating a closure that returns a future.
pub struct AsyncFuncRule<F> {
    name: String,
    message: String,
    check: F,
}

impl<F, Fut> AsyncFuncRule<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, RuleCheckError>> + Send,
{
    /// Rule named `name` that fails with `message` when `check` resolves to
    /// `Ok(false)`.
    pub fn new(name: impl Into<String>, message: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            check,
        }
    }
}

#[async_trait]
impl<F, Fut> AsyncRule for AsyncFuncRule<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, RuleCheckError>> + Send,
{
    fn rule_name(&self) -> String {
        self.name.clone()
    }

    fn failure_message(&self) -> String {
        self.message.clone()
    }

    async fn evaluate(&self) -> Result<bool, RuleCheckError> {
        (self.check)().await
    }
}
