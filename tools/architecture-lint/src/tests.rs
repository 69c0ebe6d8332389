//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case::inbound_uses_application(
    "inbound/script/mod.rs",
    "use crate::application::{Requester, CustomerCreateCommand}; fn run(_: Requester) {}",
    true
)]
#[case::inbound_uses_outbound(
    "inbound/script/mod.rs",
    "use crate::outbound::memory::InMemoryCustomerRepository; fn run() { let _ = InMemoryCustomerRepository::new(); }",
    false
)]
#[case::inbound_uses_bare_outbound(
    "inbound/script/mod.rs",
    "use outbound::memory::RecordingNotifier; fn run() {}",
    false
)]
#[case::inbound_uses_crate_name(
    "inbound/script/mod.rs",
    "use backend::outbound::memory::RecordingNotifier; fn run() {}",
    false
)]
#[case::inbound_installs_subscriber(
    "inbound/script/mod.rs",
    "fn run() { tracing_subscriber::fmt().init(); }",
    false
)]
#[case::application_uses_domain(
    "application/commands/create.rs",
    "use crate::domain::{Customer, CustomerRepository}; use result_pipeline::Outcome; fn handle() {}",
    true
)]
#[case::application_uses_adapter(
    "application/commands/create.rs",
    "use super::super::outbound::memory; fn handle() {}",
    false
)]
#[case::application_reads_config(
    "application/ports.rs",
    "use ortho_config::OrthoConfig; fn ports() {}",
    false
)]
#[case::domain_uses_application(
    "domain/customer.rs",
    "use crate::application::CustomerModel; fn thing() {}",
    false
)]
#[case::domain_uses_cli(
    "domain/customer_values.rs",
    "#[derive(clap::Parser)] struct Args;",
    false
)]
#[case::application_derives_config(
    "application/ports.rs",
    "#[derive(Debug, Clone, ortho_config::OrthoConfig)] struct Settings;",
    false
)]
#[case::domain_derives_serde(
    "domain/customer_events.rs",
    "#[derive(Debug, Clone, serde::Serialize)] enum CustomerEvent {}",
    true
)]
#[case::outbound_uses_domain(
    "outbound/memory/customer_repository.rs",
    "use crate::domain::{Customer, CustomerRepository}; fn thing() {}",
    true
)]
#[case::outbound_uses_application(
    "outbound/memory/customer_repository.rs",
    "use crate::application::CustomerPorts; fn thing() {}",
    false
)]
#[case::outbound_uses_inbound(
    "outbound/memory/domain_event_notifier.rs",
    "use inbound::script; fn thing() {}",
    false
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn test_modules_may_wire_adapters(lint_single: LintSingle) {
    let result = lint_single.lint(
        "inbound/script/tests.rs",
        "use crate::outbound::memory::InMemoryCustomerRepository; fn fixture() {}",
    );
    assert!(result.is_ok(), "result: {result:?}");
}

#[rstest]
fn files_outside_layers_are_rejected(lint_single: LintSingle) {
    let result = lint_single.lint("main.rs", "fn main() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn unparsable_sources_report_the_file(lint_single: LintSingle) {
    let error = lint_single
        .lint("domain/customer.rs", "fn broken(")
        .expect_err("parse failure");
    assert!(error.to_string().contains("domain/customer.rs"));
}

#[rstest]
fn each_violation_is_reported_once_per_file(lint_single: LintSingle) {
    let error = lint_single
        .lint(
            "domain/customer.rs",
            "use crate::inbound::script; use crate::inbound::script::ScriptRunner; fn thing() { let _ = crate::inbound::script::load_script; }",
        )
        .expect_err("violation");
    assert_eq!(
        error.violations(),
        [Violation {
            file: PathBuf::from("domain/customer.rs"),
            message: "domain module must not depend on crate::inbound".to_owned(),
        }]
    );
}

#[rstest]
fn derived_crates_are_named_in_the_violation(lint_single: LintSingle) {
    let error = lint_single
        .lint(
            "domain/customer_values.rs",
            "#[derive(Debug, clap::ValueEnum)] enum Format { Json }",
        )
        .expect_err("derive violation");
    assert_eq!(
        error.violations(),
        [Violation {
            file: PathBuf::from("domain/customer_values.rs"),
            message: "domain module must not depend on external crate `clap`".to_owned(),
        }]
    );
}
