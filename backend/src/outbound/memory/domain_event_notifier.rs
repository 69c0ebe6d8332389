//! Notifier that logs and keeps every published event.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::CustomerEvent;
use crate::domain::ports::DomainEventNotifier;

/// Records published events in order and logs each one.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<CustomerEvent>>,
}

impl RecordingNotifier {
    /// Notifier with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far, oldest first.
    pub async fn published(&self) -> Vec<CustomerEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl DomainEventNotifier for RecordingNotifier {
    async fn publish(&self, events: Vec<CustomerEvent>) {
        for event in &events {
            info!(
                event = event.name(),
                customer_id = %event.customer_id(),
                "domain event published"
            );
        }
        self.events.lock().await.extend(events);
    }
}
