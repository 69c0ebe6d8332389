//! `customers` binary: runs a JSON command script against the in-memory
//! adapters and prints one outcome envelope per command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use backend::application::{CustomerPorts, customer_requester};
use backend::config::CustomerSettings;
use backend::inbound::script::{ScriptRunner, load_script};
use backend::outbound::memory::{
    InMemoryCustomerRepository, InMemorySequenceNumberGenerator, RecordingNotifier,
};
use backend::telemetry;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const PROGRAM: &str = "customers";
const FAILED_COMMANDS_EXIT: u8 = 2;

/// `customers` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "customers",
    about = "Run a customer command script and print one JSON outcome per command",
    version
)]
struct CliArgs {
    /// Script file. Falls back to `CUSTOMERS_SCRIPT` when omitted.
    #[arg(long, value_name = "path", conflicts_with = "stdin")]
    script: Option<PathBuf>,
    /// Read the script from standard input.
    #[arg(long)]
    stdin: bool,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let settings = CustomerSettings::load(PROGRAM)?;
    telemetry::init(settings.log_format()?);

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(args, settings))
}

async fn run(args: CliArgs, settings: CustomerSettings) -> Result<ExitCode> {
    let script = read_script(args, &settings).await?;
    let ports = CustomerPorts::new(
        Arc::new(InMemoryCustomerRepository::new()),
        Arc::new(InMemorySequenceNumberGenerator::new(
            settings.sequence_start(),
        )),
        Arc::new(RecordingNotifier::new()),
        settings.number_prefix()?,
    );

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling script");
            interrupt.cancel();
        }
    });

    let runner = ScriptRunner::new(customer_requester(&ports), token);
    let summary = runner.run(&script, &mut io::stdout().lock()).await?;
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "script finished"
    );
    Ok(if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(FAILED_COMMANDS_EXIT)
    })
}

async fn read_script(args: CliArgs, settings: &CustomerSettings) -> Result<String> {
    if args.stdin {
        let mut script = String::new();
        io::stdin()
            .read_to_string(&mut script)
            .wrap_err("failed to read script from stdin")?;
        return Ok(script);
    }
    let path = args
        .script
        .or_else(|| settings.script.clone())
        .ok_or_else(|| eyre!("no script given; pass --script or --stdin, or set CUSTOMERS_SCRIPT"))?;
    Ok(load_script(&path).await?)
}
