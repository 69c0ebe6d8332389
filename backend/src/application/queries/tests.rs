//! Query handlers exercised against a mocked repository.

use std::sync::Arc;

use result_pipeline::{ErrorKind, Outcome, ResultError};
use rstest::rstest;

use super::*;
use crate::application::{CustomerPorts, Request, RequestHandler};
use crate::domain::ports::{
    MockCustomerRepository, MockDomainEventNotifier, MockSequenceNumberGenerator,
};
use crate::domain::{Customer, CustomerId, CustomerNumber, CustomerStatus};

fn ports(repository: MockCustomerRepository) -> CustomerPorts {
    CustomerPorts::new(
        Arc::new(repository),
        Arc::new(MockSequenceNumberGenerator::new()),
        Arc::new(MockDomainEventNotifier::new()),
        "CUS",
    )
}

fn customer(first: &str, email: &str, sequence: u64) -> Customer {
    let number = CustomerNumber::new("CUS", 2026, sequence).expect("valid number");
    Customer::create(first, "Doe", email, number)
        .into_value()
        .expect("valid customer")
}

#[tokio::test]
async fn find_one_maps_the_customer() {
    let stored = customer("John", "john@example.com", 1);
    let id = stored.id();
    let mut repository = MockCustomerRepository::new();
    repository
        .expect_find_one()
        .withf(move |requested| *requested == id)
        .returning(move |_| Outcome::success(stored.clone()));

    let model = CustomerFindOneQueryHandler::new(ports(repository))
        .handle(CustomerFindOneQuery { id })
        .await
        .into_value()
        .expect("customer found");

    assert_eq!(model.id, id.to_string());
    assert_eq!(model.number, "CUS-2026-1");
}

#[tokio::test]
async fn find_one_passes_not_found_through() {
    let id = CustomerId::random();
    let mut repository = MockCustomerRepository::new();
    repository
        .expect_find_one()
        .returning(move |_| Outcome::failure_with(ResultError::entity_not_found("Customer", id)));

    let outcome = CustomerFindOneQueryHandler::new(ports(repository))
        .handle(CustomerFindOneQuery { id })
        .await;

    assert!(outcome.has_error(ErrorKind::EntityNotFound));
}

#[tokio::test]
async fn find_all_applies_status_and_email_criteria() {
    let lead = customer("John", "john@example.com", 1);
    let other = customer("Mary", "mary@example.org", 2);
    let mut repository = MockCustomerRepository::new();
    let (expected_match, expected_miss) = (lead.clone(), other.clone());
    repository
        .expect_find_all()
        .withf(move |filter| filter.matches(&expected_match) && !filter.matches(&expected_miss))
        .times(1)
        .returning(move |_| Outcome::success(vec![lead.clone()]));

    let models = CustomerFindAllQueryHandler::new(ports(repository))
        .handle(CustomerFindAllQuery {
            status: Some(CustomerStatus::Lead.id()),
            email_contains: Some(" EXAMPLE.COM ".to_owned()),
        })
        .await
        .into_value()
        .expect("customers listed");

    assert_eq!(models.len(), 1);
}

#[rstest]
#[case(None, true)]
#[case(Some(1), true)]
#[case(Some(3), true)]
#[case(Some(42), false)]
fn find_all_validates_the_status_id(#[case] status: Option<i32>, #[case] valid: bool) {
    let query = CustomerFindAllQuery {
        status,
        email_contains: None,
    };
    assert_eq!(query.validate().is_success(), valid);
}
