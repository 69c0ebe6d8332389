//! Customer commands and their handlers.
//!
//! Each handler is one `Outcome` pipeline: load or construct the aggregate,
//! check business rules, apply the change, persist, then audit and publish
//! the recorded domain events before mapping to a [`super::CustomerModel`].

mod create;
mod delete;
mod update;
mod update_status;

pub use create::{CustomerCreateCommand, CustomerCreateCommandHandler};
pub use delete::{CustomerDeleteCommand, CustomerDeleteCommandHandler};
pub use update::{CustomerUpdateCommand, CustomerUpdateCommandHandler};
pub use update_status::{CustomerUpdateStatusCommand, CustomerUpdateStatusCommandHandler};

use futures_util::future::BoxFuture;
use result_pipeline::ResultError;
use tracing::info;

use crate::domain::Customer;
use crate::domain::ports::DomainEventNotifier;

pub(crate) fn required(field: &'static str, value: &str) -> Option<ResultError> {
    value
        .trim()
        .is_empty()
        .then(|| ResultError::invalid_field(field, format!("{field} is required")))
}

fn audit(action: &'static str, customer: &Customer) {
    info!(
        action,
        customer_id = %customer.id(),
        number = %customer.number(),
        status = %customer.status(),
        "customer audit"
    );
}

fn publish_events<'a>(
    notifier: &'a dyn DomainEventNotifier,
    customer: &Customer,
) -> BoxFuture<'a, ()> {
    notifier.publish(customer.events().to_vec())
}
