//! Script-driven inbound adapter.
//!
//! A script is a JSON document listing commands and queries:
//!
//! ```json
//! {"commands": [
//!   {"type": "create", "as": "john", "first_name": "John", "last_name": "Doe",
//!    "email": "john.doe@example.com"},
//!   {"type": "update_status", "id": "@john", "status": 2}
//! ]}
//! ```
//!
//! Commands run in order through the [`Requester`]. A command may name its
//! result with `"as"`; later commands refer to that customer by writing
//! `"@label"` in their `id` or `concurrency_version` fields. Each outcome is
//! written as one [`OutcomeEnvelope`] JSON line.

mod envelope;

pub use envelope::{EnvelopeError, EnvelopeStatus, OutcomeEnvelope};

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::application::{
    CustomerCreateCommand, CustomerDeleteCommand, CustomerFindAllQuery, CustomerFindOneQuery,
    CustomerModel, CustomerUpdateCommand, CustomerUpdateStatusCommand, DispatchError, Request,
    Requester,
};

const LABEL_FIELD: &str = "as";
const REFERENCE_FIELDS: [&str; 2] = ["id", "concurrency_version"];

/// Failures that abort a script run. Business failures are not among them;
/// they are reported in the envelopes.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read script {}: {source}", path.display())]
    Read {
        /// Script location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The document is not a script.
    #[error("script is malformed: {0}")]
    Parse(#[source] serde_json::Error),
    /// A command does not match any known request shape.
    #[error("command {index} is invalid: {source}")]
    InvalidCommand {
        /// Position in the script.
        index: usize,
        /// Decoder diagnostic.
        #[source]
        source: serde_json::Error,
    },
    /// A command's `as` field is not a string.
    #[error("command {index} has a non-string label")]
    InvalidLabel {
        /// Position in the script.
        index: usize,
    },
    /// A command refers to a label no earlier command defined.
    #[error("command {index} references unknown label '{label}'")]
    UnknownReference {
        /// Position in the script.
        index: usize,
        /// Missing label.
        label: String,
    },
    /// An outcome could not be rendered.
    #[error("failed to render outcome of command {index}: {source}")]
    Render {
        /// Position in the script.
        index: usize,
        /// Encoder diagnostic.
        #[source]
        source: serde_json::Error,
    },
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
    /// Dispatch was cancelled or a handler is missing.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Read a script file.
///
/// # Errors
///
/// Returns [`ScriptError::Read`] when the file cannot be read as UTF-8.
pub async fn load_script(path: &Path) -> Result<String, ScriptError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// A single script entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptCommand {
    /// Register a customer.
    Create(CustomerCreateCommand),
    /// Change personal details.
    Update(CustomerUpdateCommand),
    /// Change lifecycle status.
    UpdateStatus(CustomerUpdateStatusCommand),
    /// Remove a customer.
    Delete(CustomerDeleteCommand),
    /// Fetch one customer.
    FindOne(CustomerFindOneQuery),
    /// List customers.
    FindAll(CustomerFindAllQuery),
}

#[derive(Debug, Deserialize)]
struct ScriptDocument {
    commands: Vec<Map<String, Value>>,
}

/// Identity of a labelled customer as seen by later commands.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    id: String,
    concurrency_version: Uuid,
}

fn customer_binding(model: &CustomerModel) -> Option<Binding> {
    Some(Binding {
        id: model.id.clone(),
        concurrency_version: model.concurrency_version,
    })
}

const fn no_binding<T>(_: &T) -> Option<Binding> {
    None
}

struct Dispatched {
    envelope: OutcomeEnvelope,
    binding: Option<Binding>,
}

/// Tally of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Commands whose outcome was a success.
    pub succeeded: usize,
    /// Commands whose outcome was a failure.
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, envelope: &OutcomeEnvelope) {
        if envelope.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Whether every command succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Executes scripts against a [`Requester`].
pub struct ScriptRunner {
    requester: Requester,
    token: CancellationToken,
}

impl ScriptRunner {
    /// Runner dispatching through `requester`; `token` cancels the run.
    #[must_use]
    pub const fn new(requester: Requester, token: CancellationToken) -> Self {
        Self { requester, token }
    }

    /// Run `script`, writing one envelope line per command to `out`.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed command, unknown label, write failure,
    /// or cancellation. Envelopes of earlier commands have been written by
    /// then.
    pub async fn run(&self, script: &str, out: &mut impl Write) -> Result<RunSummary, ScriptError> {
        let document: ScriptDocument = serde_json::from_str(script).map_err(ScriptError::Parse)?;
        let mut bindings: HashMap<String, Binding> = HashMap::new();
        let mut summary = RunSummary::default();

        for (index, mut fields) in document.commands.into_iter().enumerate() {
            let label = match fields.remove(LABEL_FIELD) {
                Some(Value::String(name)) => Some(name),
                Some(_) => return Err(ScriptError::InvalidLabel { index }),
                None => None,
            };
            let target = resolve_references(index, &mut fields, &bindings)?;
            let command: ScriptCommand = serde_json::from_value(Value::Object(fields))
                .map_err(|source| ScriptError::InvalidCommand { index, source })?;

            let dispatched = self.dispatch(index, command).await?;
            if let (Some(binding), Some(name)) = (dispatched.binding, label.or(target)) {
                debug!(index, label = %name, "script label bound");
                bindings.insert(name, binding);
            }

            summary.record(&dispatched.envelope);
            serde_json::to_writer(&mut *out, &dispatched.envelope)
                .map_err(|source| ScriptError::Render { index, source })?;
            writeln!(out)?;
        }
        out.flush()?;
        Ok(summary)
    }

    async fn dispatch(&self, index: usize, command: ScriptCommand) -> Result<Dispatched, ScriptError> {
        match command {
            ScriptCommand::Create(request) => self.send(index, request, customer_binding).await,
            ScriptCommand::Update(request) => self.send(index, request, customer_binding).await,
            ScriptCommand::UpdateStatus(request) => {
                self.send(index, request, customer_binding).await
            }
            ScriptCommand::Delete(request) => self.send(index, request, no_binding).await,
            ScriptCommand::FindOne(request) => self.send(index, request, customer_binding).await,
            ScriptCommand::FindAll(request) => self.send(index, request, no_binding).await,
        }
    }

    async fn send<R>(
        &self,
        index: usize,
        request: R,
        bind: fn(&R::Response) -> Option<Binding>,
    ) -> Result<Dispatched, ScriptError>
    where
        R: Request,
        R::Response: Serialize,
    {
        let outcome = self.requester.send(request, &self.token).await?;
        let binding = outcome.value().and_then(bind);
        let envelope = OutcomeEnvelope::from_outcome(index, R::NAME, outcome)
            .map_err(|source| ScriptError::Render { index, source })?;
        Ok(Dispatched { envelope, binding })
    }
}

/// Replace `@label` references with the bound customer's identity and
/// return the label the command targets.
fn resolve_references(
    index: usize,
    fields: &mut Map<String, Value>,
    bindings: &HashMap<String, Binding>,
) -> Result<Option<String>, ScriptError> {
    let mut target = None;
    for field in REFERENCE_FIELDS {
        let Some(label) = fields
            .get(field)
            .and_then(Value::as_str)
            .and_then(|raw| raw.strip_prefix('@'))
            .map(str::to_owned)
        else {
            continue;
        };
        let binding = bindings
            .get(&label)
            .ok_or_else(|| ScriptError::UnknownReference {
                index,
                label: label.clone(),
            })?;
        let resolved = if field == "id" {
            binding.id.clone()
        } else {
            binding.concurrency_version.to_string()
        };
        fields.insert(field.to_owned(), Value::String(resolved));
        target = Some(label);
    }
    Ok(target)
}

#[cfg(test)]
mod tests;
