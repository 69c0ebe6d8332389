//! Change a customer's personal details.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use result_pipeline::{AsyncRuleSet, Outcome, ResultError};
use serde::Deserialize;
use uuid::Uuid;

use super::{audit, publish_events, required};
use crate::application::{CustomerModel, CustomerPorts, Request, RequestHandler};
use crate::domain::{CustomerId, EmailAddress, EmailShouldBeUniqueRule, validated};

/// Replace name, email, and birth date of an existing customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerUpdateCommand {
    /// Customer to change.
    pub id: CustomerId,
    /// New first name.
    pub first_name: String,
    /// New last name.
    pub last_name: String,
    /// New email address.
    pub email: String,
    /// New birth date; `None` clears it.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Version the caller last read.
    pub concurrency_version: Uuid,
}

impl Request for CustomerUpdateCommand {
    type Response = CustomerModel;
    const NAME: &'static str = "CustomerUpdateCommand";

    fn validate(&self) -> Outcome {
        Outcome::ok().with_errors(
            [
                required("first_name", &self.first_name),
                required("last_name", &self.last_name),
                required("email", &self.email),
            ]
            .into_iter()
            .flatten(),
        )
    }
}

/// Handler for [`CustomerUpdateCommand`].
pub struct CustomerUpdateCommandHandler {
    ports: CustomerPorts,
}

impl CustomerUpdateCommandHandler {
    /// Create the handler.
    #[must_use]
    pub const fn new(ports: CustomerPorts) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl RequestHandler<CustomerUpdateCommand> for CustomerUpdateCommandHandler {
    async fn handle(&self, command: CustomerUpdateCommand) -> Outcome<CustomerModel> {
        let ports = &self.ports;
        let CustomerUpdateCommand {
            id,
            first_name,
            last_name,
            email: raw_email,
            birth_date,
            concurrency_version,
        } = command;

        ports
            .repository
            .find_one(id)
            .await
            .ensure_with(
                |customer| customer.concurrency_version() == concurrency_version,
                |customer| {
                    ResultError::concurrency(
                        "Customer",
                        id,
                        concurrency_version,
                        customer.concurrency_version(),
                    )
                },
            )
            .bind(|customer| {
                validated(EmailAddress::new(&raw_email)).map(|email| (customer, email))
            })
            .unless_async(|(customer, email)| {
                AsyncRuleSet::new()
                    .add_async(
                        EmailShouldBeUniqueRule::new(email.clone(), Arc::clone(&ports.repository))
                            .excluding(customer.id()),
                    )
                    .check_async()
            })
            .await
            .bind(|(customer, email)| {
                customer
                    .change_name(&first_name, &last_name)
                    .bind(|renamed| renamed.change_email(email.as_str()))
            })
            .bind(|customer| customer.change_birth_date(birth_date))
            .bind_async(|customer| ports.repository.update(customer))
            .await
            .tap(|customer| audit("updated", customer))
            .tap_async(|customer| publish_events(ports.notifier.as_ref(), customer))
            .await
            .map_into()
    }
}
