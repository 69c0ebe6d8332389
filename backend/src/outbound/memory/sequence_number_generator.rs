//! Sequence numbers counted in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use result_pipeline::{Outcome, ResultError};
use tokio::sync::Mutex;

use crate::domain::ports::SequenceNumberGenerator;

/// Issues consecutive numbers per sequence name, starting at a configured
/// value.
#[derive(Debug)]
pub struct InMemorySequenceNumberGenerator {
    start: u64,
    sequences: Mutex<HashMap<String, u64>>,
}

impl InMemorySequenceNumberGenerator {
    /// Generator whose sequences all begin at `start`.
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self {
            start,
            sequences: Mutex::default(),
        }
    }
}

#[async_trait]
impl SequenceNumberGenerator for InMemorySequenceNumberGenerator {
    async fn next(&self, sequence: &str) -> Outcome<u64> {
        let mut sequences = self.sequences.lock().await;
        let slot = sequences.entry(sequence.to_owned()).or_insert(self.start);
        let issued = *slot;
        issued.checked_add(1).map_or_else(
            || {
                Outcome::failure_with(ResultError::conflict(format!(
                    "sequence '{sequence}' is exhausted"
                )))
            },
            |following| {
                *slot = following;
                Outcome::success(issued)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use result_pipeline::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn sequences_count_independently_from_the_start_value() {
        let generator = InMemorySequenceNumberGenerator::new(100_000);

        let customers = [
            generator.next("CustomerNumbers").await.into_value(),
            generator.next("CustomerNumbers").await.into_value(),
        ];
        let invoices = generator.next("InvoiceNumbers").await.into_value();

        assert_eq!(customers, [Some(100_000), Some(100_001)]);
        assert_eq!(invoices, Some(100_000));
    }

    #[tokio::test]
    async fn exhausted_sequences_fail_without_wrapping() {
        let generator = InMemorySequenceNumberGenerator::new(u64::MAX);

        let outcome = generator.next("CustomerNumbers").await;

        assert!(outcome.has_error(ErrorKind::Conflict));
    }
}
