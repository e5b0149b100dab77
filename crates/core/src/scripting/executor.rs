//! Attempt-level execution interface and shared types.
//!
//! Defines [`ScriptInvoker`], the trait the retry loop drives, along with
//! [`Invocation`], [`AttemptContext`], [`AttemptOutput`] and [`ScriptError`].

use std::path::{Path, PathBuf};

use super::template::InvocationTemplate;

/// Environment variable exposing the 1-based attempt number to the script.
pub const ATTEMPT_ENV_VAR: &str = "RETRY_RUN_ATTEMPT";

/// Concrete command line shared by every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Absolute path of the interpreter.
    pub program: PathBuf,
    /// Arguments with the script path already substituted.
    pub args: Vec<String>,
    /// Pass arguments to the process without quoting (Windows `cmd` only).
    pub verbatim_args: bool,
}

impl Invocation {
    /// Build the invocation for `template` run against `script_path`.
    ///
    /// `program` is the located interpreter; the verbatim flag is keyed on the
    /// interpreter name as written in the template.
    pub fn new(program: PathBuf, template: &InvocationTemplate, script_path: &Path) -> Self {
        Self {
            program,
            args: template.substitute(script_path),
            verbatim_args: template.program() == "cmd",
        }
    }

    /// Interpreter path rendered for messages.
    pub fn program_display(&self) -> String {
        self.program.display().to_string()
    }
}

/// Per-attempt values, built fresh for each attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptContext {
    /// 1-based attempt number.
    pub ordinal: u32,
    /// Variables layered over the inherited environment.
    pub env_vars: Vec<(String, String)>,
}

impl AttemptContext {
    pub fn new(ordinal: u32) -> Self {
        Self {
            ordinal,
            env_vars: vec![(ATTEMPT_ENV_VAR.to_string(), ordinal.to_string())],
        }
    }
}

/// Outcome of an attempt that exited cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptOutput {
    /// Process exit code (always `0` for a successful attempt).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Errors that fail a single attempt.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The interpreter could not be started.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the running process failed.
    #[error("Failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited with a non-zero code.
    #[error("The process '{program}' failed with exit code {exit_code}")]
    ExitStatus { program: String, exit_code: i32 },

    /// The process was terminated by a signal and has no exit code.
    #[error("The process '{program}' was terminated by a signal")]
    Terminated { program: String },
}

/// Runs one attempt of an invocation.
///
/// The production implementation spawns a subprocess
/// ([`ProcessInvoker`](super::subprocess::ProcessInvoker)); tests substitute
/// scripted outcomes.
pub trait ScriptInvoker: Send + Sync {
    /// Execute `invocation` once with the environment overlay of `attempt`.
    fn invoke(
        &self,
        invocation: &Invocation,
        attempt: &AttemptContext,
    ) -> impl std::future::Future<Output = Result<AttemptOutput, ScriptError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
