//! Port for monotonically increasing business sequence numbers.

use async_trait::async_trait;
use result_pipeline::Outcome;

/// Sequence used for customer numbers.
pub const CUSTOMER_NUMBER_SEQUENCE: &str = "CustomerNumbers";

/// Issues the next value of a named sequence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceNumberGenerator: Send + Sync {
    /// Next value of `sequence`. Values are never handed out twice.
    async fn next(&self, sequence: &str) -> Outcome<u64>;
}
