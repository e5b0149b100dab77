//! `retry-run-action` -- run an inline script with retries.
//!
//! Reads its inputs the way a GitHub Actions step does, writes the script
//! into the runner's scratch directory, and runs it until it succeeds or
//! the attempt budget is spent.
//!
//! # Environment variables
//!
//! | Variable         | Required | Default       | Description                         |
//! |------------------|----------|---------------|-------------------------------------|
//! | `INPUT_RUN`      | yes      | --            | Script body                         |
//! | `INPUT_SHELL`    | no       | `bash -e {0}` | Interpreter name or full template   |
//! | `INPUT_RETRY`    | no       | `1`           | Total number of attempts            |
//! | `INPUT_INTERVAL` | no       | `0`           | Seconds to wait after a failure     |
//! | `RUNNER_TEMP`    | no       | system temp   | Directory the script is written to  |
//!
//! Each attempt sees `RETRY_RUN_ATTEMPT` set to its 1-based number.

use std::process::ExitCode;

use retry_run_action::commands;
use retry_run_action::reporter::WorkflowReporter;
use retry_run_core::config::ActionConfig;
use retry_run_core::error::RunError;
use retry_run_core::scripting::orchestrator::{RunSummary, ScriptOrchestrator};
use retry_run_core::scripting::subprocess::ProcessInvoker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries workflow commands.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retry_run_action=info,retry_run_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(summary) => {
            tracing::info!(
                attempt = summary.report.attempt,
                script = %summary.script_path.display(),
                "Script succeeded",
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, retried = e.is_execution(), "Script run failed");
            commands::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunSummary, RunError> {
    let config = ActionConfig::from_env()?;

    let orchestrator = ScriptOrchestrator::new(
        ProcessInvoker,
        WorkflowReporter,
        config.scratch_dir.clone(),
    );

    orchestrator
        .run_script(&config.run, &config.shell, config.policy)
        .await
}
