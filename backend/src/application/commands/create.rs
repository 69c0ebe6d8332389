//! Register a new customer.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use result_pipeline::{AsyncRuleSet, Outcome};
use serde::Deserialize;

use super::{audit, publish_events, required};
use crate::application::{CustomerModel, CustomerPorts, Request, RequestHandler};
use crate::domain::ports::CUSTOMER_NUMBER_SEQUENCE;
use crate::domain::{
    AddressDraft, Customer, CustomerNumber, EmailAddress, EmailShouldBeUniqueRule, validated,
};

/// Register a customer as a lead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerCreateCommand {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address; must not belong to another customer.
    pub email: String,
    /// Optional birth date.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Addresses to attach.
    #[serde(default)]
    pub addresses: Vec<AddressDraft>,
}

impl Request for CustomerCreateCommand {
    type Response = CustomerModel;
    const NAME: &'static str = "CustomerCreateCommand";

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

/// Stage after the email was validated and found unique.
struct CreateStage {
    command: CustomerCreateCommand,
    email: EmailAddress,
}

/// Stage after a customer number was issued.
struct NumberedStage {
    command: CustomerCreateCommand,
    number: CustomerNumber,
}

/// Handler for [`CustomerCreateCommand`].
pub struct CustomerCreateCommandHandler {
    ports: CustomerPorts,
}

impl CustomerCreateCommandHandler {
    /// Create the handler.
    #[must_use]
    pub const fn new(ports: CustomerPorts) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl RequestHandler<CustomerCreateCommand> for CustomerCreateCommandHandler {
    async fn handle(&self, command: CustomerCreateCommand) -> Outcome<CustomerModel> {
        let ports = &self.ports;
        validated(EmailAddress::new(&command.email))
            .map(|email| CreateStage { command, email })
            .unless_async(|stage| {
                AsyncRuleSet::new()
                    .add_async(EmailShouldBeUniqueRule::new(
                        stage.email.clone(),
                        Arc::clone(&ports.repository),
                    ))
                    .check_async()
            })
            .await
            .bind_result_async(
                |_| ports.sequence.next(CUSTOMER_NUMBER_SEQUENCE),
                |stage, sequence| (stage.command, sequence),
            )
            .await
            .bind(|(command, sequence)| {
                validated(CustomerNumber::new(
                    &ports.number_prefix,
                    Utc::now().year(),
                    sequence,
                ))
                .map(|number| NumberedStage { command, number })
            })
            .bind(|stage| {
                let NumberedStage { command, number } = stage;
                Customer::create(
                    &command.first_name,
                    &command.last_name,
                    &command.email,
                    number,
                )
                .bind(|customer| customer.change_birth_date(command.birth_date))
                .bind(|customer| {
                    command
                        .addresses
                        .into_iter()
                        .fold(Outcome::success(customer), |built, draft| {
                            built.bind(|current| current.add_address(draft))
                        })
                })
            })
            .bind_async(|customer| ports.repository.insert(customer))
            .await
            .tap(|customer| audit("created", customer))
            .tap_async(|customer| publish_events(ports.notifier.as_ref(), customer))
            .await
            .map_into()
    }
}
