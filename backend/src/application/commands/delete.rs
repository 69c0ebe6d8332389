//! Remove a customer.

use async_trait::async_trait;
use result_pipeline::{Outcome, ResultError};
use serde::Deserialize;

use super::{audit, publish_events};
use crate::application::{CustomerModel, CustomerPorts, Request, RequestHandler};
use crate::domain::ports::RepositoryActionResult;
use crate::domain::{Customer, CustomerId};

/// Delete an existing customer. The response is the customer as it was
/// when removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CustomerDeleteCommand {
    /// Customer to delete.
    pub id: CustomerId,
}

impl Request for CustomerDeleteCommand {
    type Response = CustomerModel;
    const NAME: &'static str = "CustomerDeleteCommand";
}

/// Handler for [`CustomerDeleteCommand`].
pub struct CustomerDeleteCommandHandler {
    ports: CustomerPorts,
}

impl CustomerDeleteCommandHandler {
    /// Create the handler.
    #[must_use]
    pub const fn new(ports: CustomerPorts) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl RequestHandler<CustomerDeleteCommand> for CustomerDeleteCommandHandler {
    async fn handle(&self, command: CustomerDeleteCommand) -> Outcome<CustomerModel> {
        let ports = &self.ports;
        ports
            .repository
            .find_one(command.id)
            .await
            .bind(Customer::mark_deleted)
            .bind_result_async(
                |customer| ports.repository.delete(customer.id()),
                |customer, action| (customer, action),
            )
            .await
            .ensure_with(
                |(_, action)| *action == RepositoryActionResult::Deleted,
                |(customer, _)| ResultError::entity_not_found("Customer", customer.id()),
            )
            .map(|(customer, _)| customer)
            .tap(|customer| audit("deleted", customer))
            .tap_async(|customer| publish_events(ports.notifier.as_ref(), customer))
            .await
            .map_into()
    }
}
