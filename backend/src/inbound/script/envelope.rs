//! JSON rendering of request outcomes.

use result_pipeline::{ErrorKind, Outcome, ResultError};
use serde::Serialize;
use serde_json::Value;

/// Whether a request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    /// The outcome carried a value.
    Success,
    /// The outcome carried errors.
    Failure,
}

/// One error of a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeError {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Offending input field, for field validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&ResultError> for EnvelopeError {
    fn from(error: &ResultError) -> Self {
        Self {
            kind: error.kind(),
            message: error.message().to_owned(),
            field: error.field().map(str::to_owned),
        }
    }
}

/// Outcome of one script command, written as a single JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeEnvelope {
    /// Position of the command in the script.
    pub index: usize,
    /// Request name.
    pub request: &'static str,
    /// Success or failure.
    pub status: EnvelopeStatus,
    /// Serialised response for successful requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Informational messages collected along the pipeline.
    pub messages: Vec<String>,
    /// Errors of a failed request.
    pub errors: Vec<EnvelopeError>,
}

impl OutcomeEnvelope {
    /// Render `outcome` of the request `request` at position `index`.
    ///
    /// # Errors
    ///
    /// Fails when the response value cannot be serialised.
    pub fn from_outcome<T: Serialize>(
        index: usize,
        request: &'static str,
        outcome: Outcome<T>,
    ) -> Result<Self, serde_json::Error> {
        let (state, messages) = outcome.into_parts();
        let (status, value, errors) = match state {
            Ok(response) => (
                EnvelopeStatus::Success,
                Some(serde_json::to_value(response)?),
                Vec::new(),
            ),
            Err(errors) => (
                EnvelopeStatus::Failure,
                None,
                errors.iter().map(EnvelopeError::from).collect(),
            ),
        };
        Ok(Self {
            index,
            request,
            status,
            value,
            messages,
            errors,
        })
    }

    /// Whether the request succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }
}
