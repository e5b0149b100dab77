//! Retry progress surfaced as workflow annotations.

use retry_run_core::scripting::executor::{Invocation, ScriptError};
use retry_run_core::scripting::retry::RetryReporter;

use crate::commands;

/// Reports each non-final failure as a `::warning::` annotation so flaky
/// attempts are visible without failing the job.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowReporter;

impl RetryReporter for WorkflowReporter {
    fn attempt_failed(&self, attempt: u32, error: &ScriptError) {
        tracing::warn!(attempt, error = %error, "Attempt failed, retrying");
        commands::warning(&error.to_string());
    }

    fn invocation_resolved(&self, invocation: &Invocation) {
        commands::debug(&describe(invocation));
    }
}

/// One-line description of the command every attempt runs.
pub fn describe(invocation: &Invocation) -> String {
    let mut line = format!("Running \"{}\"", invocation.program.display());
    for arg in &invocation.args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
