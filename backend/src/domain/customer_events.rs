//! Domain events raised by the customer aggregate.
//!
//! Events are collected on the aggregate while it changes and published by
//! the application layer after the change has been persisted.

use serde::Serialize;

use super::{CustomerId, CustomerNumber, CustomerStatus, EmailAddress};

/// Change notification emitted by [`super::Customer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CustomerEvent {
    /// A customer was registered.
    Created {
        /// Customer identifier.
        customer_id: CustomerId,
        /// Issued customer number.
        number: CustomerNumber,
        /// Email address at registration.
        email: EmailAddress,
    },
    /// Names, email, birth date, or addresses changed.
    Updated {
        /// Customer identifier.
        customer_id: CustomerId,
    },
    /// The lifecycle status changed.
    StatusChanged {
        /// Customer identifier.
        customer_id: CustomerId,
        /// Previous status.
        from: CustomerStatus,
        /// New status.
        to: CustomerStatus,
    },
    /// The customer was deleted.
    Deleted {
        /// Customer identifier.
        customer_id: CustomerId,
    },
}

impl CustomerEvent {
    /// Customer the event refers to.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        match self {
            Self::Created { customer_id, .. }
            | Self::Updated { customer_id }
            | Self::StatusChanged { customer_id, .. }
            | Self::Deleted { customer_id } => *customer_id,
        }
    }

    /// Event name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "CustomerCreated",
            Self::Updated { .. } => "CustomerUpdated",
            Self::StatusChanged { .. } => "CustomerStatusChanged",
            Self::Deleted { .. } => "CustomerDeleted",
        }
    }
}
