//! Customer repository backed by a `HashMap`.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use result_pipeline::{Outcome, ResultError};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{CustomerFilter, CustomerRepository, RepositoryActionResult};
use crate::domain::{Customer, CustomerId};

const ENTITY: &str = "Customer";

/// Keeps customers in memory and enforces optimistic concurrency.
///
/// Stored copies carry no pending domain events; callers receive the
/// aggregate they passed in, with a fresh concurrency version, so they can
/// still publish its events.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn stored_copy(customer: &Customer) -> Customer {
    let mut copy = customer.clone();
    copy.take_events();
    copy
}

fn by_number(left: &Customer, right: &Customer) -> Ordering {
    let (a, b) = (left.number(), right.number());
    a.prefix()
        .cmp(b.prefix())
        .then(a.year().cmp(&b.year()))
        .then(a.sequence().cmp(&b.sequence()))
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_one(&self, id: CustomerId) -> Outcome<Customer> {
        let customers = self.customers.read().await;
        customers.get(&id).cloned().map_or_else(
            || Outcome::failure_with(ResultError::entity_not_found(ENTITY, id)),
            Outcome::success,
        )
    }

    async fn find_all(&self, filter: &CustomerFilter) -> Outcome<Vec<Customer>> {
        let customers = self.customers.read().await;
        let mut matching: Vec<Customer> = customers
            .values()
            .filter(|customer| filter.matches(customer))
            .cloned()
            .collect();
        matching.sort_by(by_number);
        Outcome::success(matching)
    }

    async fn count(&self, filter: &CustomerFilter) -> Outcome<usize> {
        let customers = self.customers.read().await;
        Outcome::success(
            customers
                .values()
                .filter(|customer| filter.matches(customer))
                .count(),
        )
    }

    async fn insert(&self, mut customer: Customer) -> Outcome<Customer> {
        let mut customers = self.customers.write().await;
        let id = customer.id();
        if customers.contains_key(&id) {
            return Outcome::failure_with(ResultError::conflict(format!(
                "customer '{id}' already exists"
            )));
        }
        customer.renew_concurrency_version();
        customers.insert(id, stored_copy(&customer));
        debug!(customer_id = %id, "customer inserted");
        Outcome::success(customer)
    }

    async fn update(&self, mut customer: Customer) -> Outcome<Customer> {
        let mut customers = self.customers.write().await;
        let id = customer.id();
        let Some(stored) = customers.get_mut(&id) else {
            return Outcome::failure_with(ResultError::entity_not_found(ENTITY, id));
        };
        if stored.concurrency_version() != customer.concurrency_version() {
            return Outcome::failure_with(ResultError::concurrency(
                ENTITY,
                id,
                customer.concurrency_version(),
                stored.concurrency_version(),
            ));
        }
        customer.renew_concurrency_version();
        *stored = stored_copy(&customer);
        debug!(customer_id = %id, "customer updated");
        Outcome::success(customer)
    }

    async fn delete(&self, id: CustomerId) -> Outcome<RepositoryActionResult> {
        let mut customers = self.customers.write().await;
        let action = customers
            .remove(&id)
            .map_or(RepositoryActionResult::NotFound, |_| {
                RepositoryActionResult::Deleted
            });
        debug!(customer_id = %id, ?action, "customer delete");
        Outcome::success(action)
    }
}
