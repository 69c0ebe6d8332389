//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module wires the in-memory adapters the way the binary does and offers a
//! repository wrapper that counts calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use backend::application::{CustomerCreateCommand, CustomerModel, CustomerPorts, Requester};
use backend::domain::ports::{CustomerFilter, CustomerRepository, RepositoryActionResult};
use backend::domain::{Customer, CustomerId};
use backend::outbound::memory::{
    InMemoryCustomerRepository, InMemorySequenceNumberGenerator, RecordingNotifier,
};
use result_pipeline::Outcome;
use tokio_util::sync::CancellationToken;

/// In-memory repository that counts reads and writes.
#[derive(Debug, Default)]
pub struct CountingRepository {
    inner: InMemoryCustomerRepository,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingRepository {
    /// Number of `find_one`, `find_all`, and `count` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `insert`, `update`, and `delete` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CustomerRepository for CountingRepository {
    async fn find_one(&self, id: CustomerId) -> Outcome<Customer> {
        self.read();
        self.inner.find_one(id).await
    }

    async fn find_all(&self, filter: &CustomerFilter) -> Outcome<Vec<Customer>> {
        self.read();
        self.inner.find_all(filter).await
    }

    async fn count(&self, filter: &CustomerFilter) -> Outcome<usize> {
        self.read();
        self.inner.count(filter).await
    }

    async fn insert(&self, customer: Customer) -> Outcome<Customer> {
        self.write();
        self.inner.insert(customer).await
    }

    async fn update(&self, customer: Customer) -> Outcome<Customer> {
        self.write();
        self.inner.update(customer).await
    }

    async fn delete(&self, id: CustomerId) -> Outcome<RepositoryActionResult> {
        self.write();
        self.inner.delete(id).await
    }
}

/// Adapters behind a fully wired requester.
pub struct World {
    /// Repository shared with the handlers.
    pub repository: Arc<CountingRepository>,
    /// Notifier shared with the handlers.
    pub notifier: Arc<RecordingNotifier>,
    /// Requester with every customer handler registered.
    pub requester: Requester,
}

impl World {
    /// Fresh in-memory world issuing `CUS` numbers from 100000.
    pub fn new() -> Self {
        let repository = Arc::new(CountingRepository::default());
        let notifier = Arc::new(RecordingNotifier::new());
        let ports = CustomerPorts::new(
            Arc::clone(&repository) as Arc<dyn CustomerRepository>,
            Arc::new(InMemorySequenceNumberGenerator::new(100_000)),
            Arc::clone(&notifier) as _,
            "CUS",
        );
        Self {
            repository,
            notifier,
            requester: backend::application::customer_requester(&ports),
        }
    }

    /// Register a customer and return its model.
    pub async fn create(&self, first: &str, last: &str, email: &str) -> Outcome<CustomerModel> {
        self.requester
            .send(
                CustomerCreateCommand {
                    first_name: first.to_owned(),
                    last_name: last.to_owned(),
                    email: email.to_owned(),
                    birth_date: None,
                    addresses: Vec::new(),
                },
                &CancellationToken::new(),
            )
            .await
            .expect("create dispatched")
    }
}
