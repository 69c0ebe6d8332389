//! Driven ports shared by the customer handlers.

use std::sync::Arc;

use crate::domain::ports::{CustomerRepository, DomainEventNotifier, SequenceNumberGenerator};

/// Adapters and settings injected into every customer handler.
#[derive(Clone)]
pub struct CustomerPorts {
    /// Customer persistence.
    pub repository: Arc<dyn CustomerRepository>,
    /// Source of customer number sequences.
    pub sequence: Arc<dyn SequenceNumberGenerator>,
    /// Domain event delivery.
    pub notifier: Arc<dyn DomainEventNotifier>,
    /// Prefix of issued customer numbers.
    pub number_prefix: String,
}

impl CustomerPorts {
    /// Bundle adapters with the customer number prefix.
    pub fn new(
        repository: Arc<dyn CustomerRepository>,
        sequence: Arc<dyn SequenceNumberGenerator>,
        notifier: Arc<dyn DomainEventNotifier>,
        number_prefix: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            sequence,
            notifier,
            number_prefix: number_prefix.into(),
        }
    }
}
