//! Scripts run end to end against the in-memory adapters.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::NamedTempFile;

use super::*;
use crate::application::{CustomerPorts, customer_requester};
use crate::outbound::memory::{
    InMemoryCustomerRepository, InMemorySequenceNumberGenerator, RecordingNotifier,
};

#[fixture]
fn ports() -> CustomerPorts {
    CustomerPorts::new(
        Arc::new(InMemoryCustomerRepository::new()),
        Arc::new(InMemorySequenceNumberGenerator::new(100_000)),
        Arc::new(RecordingNotifier::new()),
        "CUS",
    )
}

fn runner(ports: &CustomerPorts, token: CancellationToken) -> ScriptRunner {
    ScriptRunner::new(customer_requester(ports), token)
}

fn lines(output: &[u8]) -> Vec<Value> {
    std::str::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

#[rstest]
#[tokio::test]
async fn labelled_customers_can_be_changed_by_later_commands(ports: CustomerPorts) {
    let script = json!({"commands": [
        {"type": "create", "as": "john", "first_name": "John", "last_name": "Doe",
         "email": "john.doe@example.com"},
        {"type": "update_status", "id": "@john", "status": 2},
        {"type": "update", "id": "@john", "concurrency_version": "@john",
         "first_name": "Johnny", "last_name": "Doe", "email": "johnny@example.com"},
        {"type": "find_all", "status": 2}
    ]})
    .to_string();
    let mut output = Vec::<u8>::new();

    let summary = runner(&ports, CancellationToken::new())
        .run(&script, &mut output)
        .await
        .expect("script runs");

    assert_eq!(
        summary,
        RunSummary {
            succeeded: 4,
            failed: 0
        }
    );
    let envelopes = lines(&output);
    assert_eq!(envelopes.len(), 4);
    let listed = envelopes
        .last()
        .and_then(|envelope| envelope.get("value"))
        .and_then(Value::as_array)
        .expect("listed customers");
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed.first().and_then(|customer| customer.get("first_name")),
        Some(&json!("Johnny"))
    );
}

#[rstest]
#[tokio::test]
async fn business_failures_are_reported_and_the_run_continues(ports: CustomerPorts) {
    let script = json!({"commands": [
        {"type": "create", "first_name": "John", "last_name": "Doe",
         "email": "john.doe@example.com"},
        {"type": "create", "first_name": "Jane", "last_name": "Doe",
         "email": "JOHN.DOE@example.com"},
        {"type": "update_status", "id": "6c9e1a3e-8d64-4f56-9c4c-2b0c5f2b7c11", "status": 7},
        {"type": "find_all"}
    ]})
    .to_string();
    let mut output = Vec::<u8>::new();

    let summary = runner(&ports, CancellationToken::new())
        .run(&script, &mut output)
        .await
        .expect("script runs");

    assert_eq!(
        summary,
        RunSummary {
            succeeded: 2,
            failed: 2
        }
    );
    let envelopes = lines(&output);
    let duplicate = envelopes.get(1).expect("second envelope");
    assert_eq!(duplicate.get("status"), Some(&json!("failure")));
    assert_eq!(
        duplicate.pointer("/errors/0/kind"),
        Some(&json!("validation"))
    );
    let invalid_status = envelopes.get(2).expect("third envelope");
    assert_eq!(
        invalid_status.pointer("/errors/0/field"),
        Some(&json!("status"))
    );
}

#[rstest]
#[tokio::test]
async fn unknown_labels_abort_the_run(ports: CustomerPorts) {
    let script = r#"{"commands": [{"type": "find_one", "id": "@nobody"}]}"#;
    let mut output = Vec::<u8>::new();

    let result = runner(&ports, CancellationToken::new())
        .run(script, &mut output)
        .await;

    assert!(matches!(
        result,
        Err(ScriptError::UnknownReference { index: 0, ref label }) if label == "nobody"
    ));
    assert!(output.is_empty());
}

#[rstest]
#[case::unknown_type(r#"{"commands": [{"type": "archive"}]}"#)]
#[case::missing_field(r#"{"commands": [{"type": "delete"}]}"#)]
#[tokio::test]
async fn malformed_commands_are_rejected(ports: CustomerPorts, #[case] script: &str) {
    let result = runner(&ports, CancellationToken::new())
        .run(script, &mut Vec::<u8>::new())
        .await;
    assert!(matches!(
        result,
        Err(ScriptError::InvalidCommand { index: 0, .. })
    ));
}

#[rstest]
#[tokio::test]
async fn non_script_documents_are_rejected(ports: CustomerPorts) {
    let result = runner(&ports, CancellationToken::new())
        .run("[1, 2, 3]", &mut Vec::<u8>::new())
        .await;
    assert!(matches!(result, Err(ScriptError::Parse(_))));
}

#[rstest]
#[tokio::test]
async fn cancelled_runs_stop_before_dispatching(ports: CustomerPorts) {
    let token = CancellationToken::new();
    token.cancel();
    let script = r#"{"commands": [{"type": "find_all"}]}"#;
    let mut output = Vec::<u8>::new();

    let result = runner(&ports, token).run(script, &mut output).await;

    assert!(matches!(
        result,
        Err(ScriptError::Dispatch(DispatchError::Cancelled(_)))
    ));
    assert!(output.is_empty());
}

#[tokio::test]
async fn scripts_are_read_from_disk() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"commands": []}}"#).expect("write script");

    let script = load_script(file.path()).await.expect("script read");

    assert_eq!(script, r#"{"commands": []}"#);
}

#[tokio::test]
async fn missing_script_files_name_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");

    let error = load_script(&path).await.expect_err("missing file");

    assert!(error.to_string().contains("absent.json"));
}
