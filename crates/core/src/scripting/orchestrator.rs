//! Central retry-run orchestrator.
//!
//! Coordinates shell resolution, interpreter lookup, script materialization
//! and the retry loop. Everything before the loop is fatal on error.

use std::path::PathBuf;

use super::executor::{Invocation, ScriptInvoker};
use super::extension::extension_for;
use super::locate::locate_executable;
use super::materialize::materialize;
use super::retry::{run_with_retry, AttemptReport, RetryPolicy, RetryReporter};
use super::template;
use crate::error::RunError;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Path of the materialized script.
    pub script_path: PathBuf,
    /// The command line every attempt used.
    pub invocation: Invocation,
    /// The attempt that succeeded.
    pub report: AttemptReport,
}

/// Orchestrates a retried script run.
///
/// Manages the full lifecycle:
/// 1. Resolve the shell specification into a template.
/// 2. Locate the interpreter on the search path.
/// 3. Write the script into the scratch directory.
/// 4. Run the retry loop against the written script.
pub struct ScriptOrchestrator<I, R> {
    invoker: I,
    reporter: R,
    scratch_dir: PathBuf,
}

impl<I, R> ScriptOrchestrator<I, R>
where
    I: ScriptInvoker,
    R: RetryReporter,
{
    /// Create an orchestrator writing scripts into `scratch_dir`.
    pub fn new(invoker: I, reporter: R, scratch_dir: PathBuf) -> Self {
        Self {
            invoker,
            reporter,
            scratch_dir,
        }
    }

    /// Run `content` through the interpreter described by `shell`.
    pub async fn run_script(
        &self,
        content: &str,
        shell: &str,
        policy: RetryPolicy,
    ) -> Result<RunSummary, RunError> {
        let template = template::resolve(shell);
        let program = locate_executable(template.program())?;

        let extension = extension_for(template.program());
        let script = materialize(content, &self.scratch_dir, extension).await?;

        let invocation = Invocation::new(program, &template, script.path());
        tracing::info!(
            program = %invocation.program.display(),
            args = ?invocation.args,
            max_attempts = policy.max_attempts(),
            interval_secs = policy.interval().as_secs(),
            "Running script",
        );
        self.reporter.invocation_resolved(&invocation);

        let report = run_with_retry(&invocation, policy, &self.invoker, &self.reporter).await?;

        Ok(RunSummary {
            script_path: script.path().to_path_buf(),
            invocation,
            report,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
