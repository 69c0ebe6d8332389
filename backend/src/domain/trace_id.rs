//! Correlation identifier for one dispatched request.
//!
//! The [`crate::application::Requester`] opens a scope per request so
//! handlers, adapters, and log lines can pick up the active identifier
//! without threading it through every call. Task-local values are not
//! inherited by spawned tasks; wrap spawned work in [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Request correlation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the enclosing scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `future` with `trace_id` as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::TraceId;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
    /// let trace_id = TraceId::generate();
    /// let seen = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, future: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, future).await
    }
}

impl From<Uuid> for TraceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[tokio::test]
    async fn scope_exposes_identifier() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn no_identifier_outside_a_scope() {
        assert!(TraceId::current().is_none());
    }

    #[test]
    fn parses_uuids() {
        let uuid = Uuid::new_v4();
        let parsed: TraceId = uuid.to_string().parse().expect("valid uuid");
        assert_eq!(parsed.as_uuid(), &uuid);
        assert!("not-a-uuid".parse::<TraceId>().is_err());
    }
}
