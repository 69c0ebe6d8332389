//! Move a customer through its lifecycle.

use async_trait::async_trait;
use result_pipeline::rules::is_one_of;
use result_pipeline::{Outcome, ResultError, RuleSet};
use serde::Deserialize;

use super::{audit, publish_events};
use crate::application::{CustomerModel, CustomerPorts, Request, RequestHandler};
use crate::domain::{CustomerId, CustomerStatus, StatusTransitionShouldBeAllowedRule};

/// Set the status of an existing customer by status identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CustomerUpdateStatusCommand {
    /// Customer to change.
    pub id: CustomerId,
    /// Identifier of the target [`CustomerStatus`].
    pub status: i32,
}

impl Request for CustomerUpdateStatusCommand {
    type Response = CustomerModel;
    const NAME: &'static str = "CustomerUpdateStatusCommand";

    fn validate(&self) -> Outcome {
        RuleSet::new()
            .add(is_one_of(
                self.status,
                CustomerStatus::get_all().iter().map(|status| status.id()),
            ))
            .check()
            .map_errors(|error| {
                ResultError::invalid_field("status", format!("invalid status: {}", error.message()))
            })
    }
}

/// Handler for [`CustomerUpdateStatusCommand`].
pub struct CustomerUpdateStatusCommandHandler {
    ports: CustomerPorts,
}

impl CustomerUpdateStatusCommandHandler {
    /// Create the handler.
    #[must_use]
    pub const fn new(ports: CustomerPorts) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl RequestHandler<CustomerUpdateStatusCommand> for CustomerUpdateStatusCommandHandler {
    async fn handle(&self, command: CustomerUpdateStatusCommand) -> Outcome<CustomerModel> {
        let ports = &self.ports;
        let target = CustomerStatus::from_id(command.status).map_or_else(
            || {
                Outcome::failure_with(ResultError::invalid_field(
                    "status",
                    format!("unknown status {}", command.status),
                ))
            },
            Outcome::success,
        );

        target
            .bind_async(|status| async move {
                ports
                    .repository
                    .find_one(command.id)
                    .await
                    .unless(|customer| {
                        RuleSet::new()
                            .add(StatusTransitionShouldBeAllowedRule::new(
                                customer.status(),
                                status,
                            ))
                            .check()
                    })
                    .bind(|customer| customer.change_status(status))
            })
            .await
            .bind_async(|customer| ports.repository.update(customer))
            .await
            .tap(|customer| audit("status_changed", customer))
            .tap_async(|customer| publish_events(ports.notifier.as_ref(), customer))
            .await
            .map_into()
    }
}
