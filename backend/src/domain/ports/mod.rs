//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven adapters report expected failures (missing customers, stale
//! concurrency tokens) as failed [`result_pipeline::Outcome`]s so handlers
//! can chain port calls with `bind_async`.

mod customer_repository;
mod domain_event_notifier;
mod sequence_number_generator;

#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{CustomerFilter, CustomerRepository, RepositoryActionResult};
#[cfg(test)]
pub use domain_event_notifier::MockDomainEventNotifier;
pub use domain_event_notifier::DomainEventNotifier;
#[cfg(test)]
pub use sequence_number_generator::MockSequenceNumberGenerator;
pub use sequence_number_generator::{CUSTOMER_NUMBER_SEQUENCE, SequenceNumberGenerator};
