//! Operators on pending outcomes.
//!
//! These let a pipeline be extended before it is awaited, for example when a
//! repository call already returns a future of an [`Outcome`]:
//!
//! ```
//! use result_pipeline::{Outcome, OutcomeFutureExt, ResultError};
//!
//! async fn load(id: u32) -> Outcome<String> {
//!     Outcome::success(format!("customer-{id}"))
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
//! let outcome = load(7)
//!     .ensure(|name| name.ends_with('7'), ResultError::validation("wrong customer"))
//!     .map(|name| name.len())
//!     .await;
//! assert_eq!(outcome.into_value(), Some(10));
//! # });
//! ```

use std::future::Future;

use crate::error::ResultError;
use crate::outcome::Outcome;

/// Pipeline operators for any future resolving to an [`Outcome`].
pub trait OutcomeFutureExt<T>: Future<Output = Outcome<T>> + Sized {
    /// Await, then [`Outcome::bind`].
    fn bind<U, F>(self, step: F) -> impl Future<Output = Outcome<U>>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        async move { self.await.bind(step) }
    }

    /// Await, then [`Outcome::bind_async`].
    fn bind_async<U, F, Fut>(self, step: F) -> impl Future<Output = Outcome<U>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U>>,
    {
        async move { self.await.bind_async(step).await }
    }

    /// Await, then [`Outcome::map`].
    fn map<U, F>(self, transform: F) -> impl Future<Output = Outcome<U>>
    where
        F: FnOnce(T) -> U,
    {
        async move { self.await.map(transform) }
    }

    /// Await, then [`Outcome::map_into`].
    fn map_into<U>(self) -> impl Future<Output = Outcome<U>>
    where
        U: From<T>,
    {
        async move { self.await.map_into() }
    }

    /// Await, then [`Outcome::tap`].
    fn tap<F>(self, action: F) -> impl Future<Output = Outcome<T>>
    where
        F: FnOnce(&T),
    {
        async move { self.await.tap(action) }
    }

    /// Await, then [`Outcome::tap_async`].
    fn tap_async<F, Fut>(self, action: F) -> impl Future<Output = Outcome<T>>
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = ()>,
    {
        async move { self.await.tap_async(action).await }
    }

    /// Await, then [`Outcome::ensure`].
    fn ensure<F, E>(self, predicate: F, error: E) -> impl Future<Output = Outcome<T>>
    where
        F: FnOnce(&T) -> bool,
        E: Into<ResultError>,
    {
        async move { self.await.ensure(predicate, error) }
    }

    /// Await, then [`Outcome::unless_async`].
    fn unless_async<V, F, Fut>(self, check: F) -> impl Future<Output = Outcome<T>>
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = Outcome<V>>,
    {
        async move { self.await.unless_async(check).await }
    }
}

impl<T, F> OutcomeFutureExt<T> for F where F: Future<Output = Outcome<T>> {}
