//! Asynchronous pipeline operators.
//!
//! Each operator awaits its step to completion before returning, so chained
//! `.await`s run strictly in order. Steps receiving `&T` must return futures
//! that own what they need (clone identifiers before the `async move`).

use std::error::Error as StdError;
use std::future::Future;

use crate::error::{ExceptionError, ResultError};
use crate::exception::{contain, contain_async};
use crate::outcome::Outcome;

impl<T> Outcome<T> {
    /// Async form of [`Outcome::bind`]. Panics raised while building or
    /// polling the step's future become an [`ExceptionError`].
    pub async fn bind_async<U, F, Fut>(self, step: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U>>,
    {
        let (state, messages) = self.into_parts();
        let value = match state {
            Err(errors) => return Outcome::failed(errors, messages),
            Ok(value) => value,
        };
        match run_contained(|| step(value)).await {
            Ok(next) => next.with_prior_messages(messages),
            Err(error) => Outcome::failed(vec![error.into()], messages),
        }
    }

    /// Async form of [`Outcome::try_bind`].
    pub async fn try_bind_async<U, E, F, Fut>(self, step: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<U, E>>,
        E: StdError + Send + Sync + 'static,
    {
        let (state, messages) = self.into_parts();
        let value = match state {
            Err(errors) => return Outcome::failed(errors, messages),
            Ok(value) => value,
        };
        let result = match run_contained(|| step(value)).await {
            Ok(Ok(next)) => Ok(next),
            Ok(Err(error)) => Err(ExceptionError::new(error)),
            Err(error) => Err(error),
        };
        match result {
            Ok(next) => Outcome::from_parts(Ok(next), messages),
            Err(error) => Outcome::failed(vec![error.into()], messages),
        }
    }

    /// Async form of [`Outcome::bind_result`]: `merge` runs only when both the
    /// outer and the awaited inner outcome succeed.
    pub async fn bind_result_async<U, V, F, Fut, M>(self, step: F, merge: M) -> Outcome<V>
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = Outcome<U>>,
        M: FnOnce(T, U) -> V,
    {
        let (state, messages) = self.into_parts();
        let value = match state {
            Err(errors) => return Outcome::failed(errors, messages),
            Ok(value) => value,
        };
        let inner = match run_contained(|| step(&value)).await {
            Ok(inner) => inner.with_prior_messages(messages),
            Err(error) => return Outcome::failed(vec![error.into()], messages),
        };
        let (inner_state, messages) = inner.into_parts();
        match inner_state {
            Err(errors) => Outcome::failed(errors, messages),
            Ok(inner_value) => match contain(|| merge(value, inner_value)) {
                Ok(merged) => Outcome::from_parts(Ok(merged), messages),
                Err(error) => Outcome::failed(vec![error.into()], messages),
            },
        }
    }

    /// Async form of [`Outcome::map`].
    pub async fn map_async<U, F, Fut>(self, transform: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        let (state, messages) = self.into_parts();
        match state {
            Err(errors) => Outcome::failed(errors, messages),
            Ok(value) => Outcome::from_parts(Ok(transform(value).await), messages),
        }
    }

    /// Async form of [`Outcome::tap`]. Panics are not contained.
    pub async fn tap_async<F, Fut>(self, action: F) -> Self
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Some(value) = self.value() {
            action(value).await;
        }
        self
    }

    /// Async form of [`Outcome::ensure`].
    pub async fn ensure_async<F, Fut>(self, predicate: F, error: impl Into<ResultError>) -> Self
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = bool>,
    {
        let holds = match self.value() {
            Some(value) => predicate(value).await,
            None => return self,
        };
        if holds { self } else { self.with_error(error) }
    }

    /// Async form of [`Outcome::unless`], used to fold rule checks into a
    /// pipeline. A panic raised while building or polling the check becomes
    /// an [`ExceptionError`].
    ///
    /// # Examples
    /// ```
    /// use result_pipeline::{Outcome, RuleSet, rules};
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
    /// let outcome = Outcome::success(String::new())
    ///     .unless_async(|name| {
    ///         RuleSet::new().add(rules::is_not_empty(name)).check_async()
    ///     })
    ///     .await;
    /// assert!(outcome.is_failure());
    /// # });
    /// ```
    pub async fn unless_async<V, F, Fut>(self, check: F) -> Self
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = Outcome<V>>,
    {
        let checked = match self.value() {
            Some(value) => run_contained(|| check(value))
                .await
                .unwrap_or_else(Outcome::failure_with),
            None => return self,
        };
        self.absorb_check(checked)
    }

    /// Async form of [`Outcome::when`].
    pub async fn when_async<P, F, Fut>(self, predicate: P, then: F) -> Self
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = Self>,
    {
        let apply = match self.value() {
            Some(value) => predicate(value),
            None => false,
        };
        if apply { then(self).await } else { self }
    }
}

async fn run_contained<F, Fut>(build: F) -> Result<Fut::Output, ExceptionError>
where
    F: FnOnce() -> Fut,
    Fut: Future,
{
    let future = contain(build)?;
    contain_async(future).await
}
