//! Port for publishing domain events after a change was persisted.

use async_trait::async_trait;

use crate::domain::CustomerEvent;

/// Delivers domain events to interested parties.
///
/// Publication is fire-and-forget from the handler's point of view:
/// adapters log delivery problems instead of failing the request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainEventNotifier: Send + Sync {
    /// Publish `events` in order.
    async fn publish(&self, events: Vec<CustomerEvent>);
}
