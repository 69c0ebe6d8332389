//! In-process adapters for the customer ports.
//!
//! State lives behind tokio locks and vanishes with the process. The adapters
//! back the script runner and the integration tests.

mod customer_repository;
mod domain_event_notifier;
mod sequence_number_generator;

pub use customer_repository::InMemoryCustomerRepository;
pub use domain_event_notifier::RecordingNotifier;
pub use sequence_number_generator::InMemorySequenceNumberGenerator;
