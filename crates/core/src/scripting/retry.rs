//! Bounded retry loop.
//!
//! A run makes up to `max_attempts` attempts. Every attempt but the last is
//! in the [`Phase::Retrying`] phase: its failure is reported as a warning and
//! followed by the fixed interval. The last attempt is in
//! [`Phase::FinalAttempt`]: its failure is returned to the caller.

use std::time::Duration;

use super::executor::{AttemptContext, AttemptOutput, Invocation, ScriptError, ScriptInvoker};

/// Attempt budget and delay between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    interval_secs: u64,
}

impl RetryPolicy {
    /// `max_attempts` counts total tries and is raised to at least 1.
    pub fn new(max_attempts: u32, interval_secs: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval_secs,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Phase of the attempt numbered `ordinal` (1-based).
    pub fn phase(&self, ordinal: u32) -> Phase {
        if ordinal < self.max_attempts {
            Phase::Retrying
        } else {
            Phase::FinalAttempt
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// Position of an attempt within the run. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Retrying,
    FinalAttempt,
}

/// What the loop does after an attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Stop with success.
    Succeeded(AttemptOutput),
    /// Report the failure and try again.
    Retry(ScriptError),
    /// Stop with this failure.
    Fatal(ScriptError),
}

impl AttemptOutcome {
    pub fn classify(phase: Phase, result: Result<AttemptOutput, ScriptError>) -> Self {
        match (phase, result) {
            (_, Ok(output)) => Self::Succeeded(output),
            (Phase::Retrying, Err(error)) => Self::Retry(error),
            (Phase::FinalAttempt, Err(error)) => Self::Fatal(error),
        }
    }
}

/// The successful attempt of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptReport {
    /// 1-based number of the attempt that succeeded.
    pub attempt: u32,
    pub output: AttemptOutput,
}

/// Receives progress from the retry loop.
pub trait RetryReporter: Send + Sync {
    /// A non-final attempt failed; the loop will try again.
    fn attempt_failed(&self, attempt: u32, error: &ScriptError);

    /// The interpreter and arguments about to be run.
    fn invocation_resolved(&self, _invocation: &Invocation) {}
}

/// Reporter that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl RetryReporter for LogReporter {
    fn attempt_failed(&self, attempt: u32, error: &ScriptError) {
        tracing::warn!(attempt, error = %error, "Attempt failed, retrying");
    }
}

/// Run `invocation` until it succeeds or the attempt budget is spent.
///
/// Makes exactly `k` invocations when attempt `k` is the first to succeed
/// and exactly `max_attempts` when every attempt fails. Attempts never
/// overlap; the interval is skipped entirely when it is zero.
pub async fn run_with_retry<I, R>(
    invocation: &Invocation,
    policy: RetryPolicy,
    invoker: &I,
    reporter: &R,
) -> Result<AttemptReport, ScriptError>
where
    I: ScriptInvoker,
    R: RetryReporter,
{
    let max_attempts = policy.max_attempts();
    let interval = policy.interval();
    let mut ordinal = 1;

    loop {
        let phase = policy.phase(ordinal);
        let context = AttemptContext::new(ordinal);
        tracing::info!(attempt = ordinal, max_attempts, ?phase, "Starting attempt");

        let result = invoker.invoke(invocation, &context).await;

        match AttemptOutcome::classify(phase, result) {
            AttemptOutcome::Succeeded(output) => {
                tracing::info!(
                    attempt = ordinal,
                    duration_ms = output.duration_ms,
                    "Attempt succeeded",
                );
                return Ok(AttemptReport {
                    attempt: ordinal,
                    output,
                });
            }
            AttemptOutcome::Retry(error) => {
                reporter.attempt_failed(ordinal, &error);
                if !interval.is_zero() {
                    tracing::debug!(
                        attempt = ordinal,
                        interval_secs = interval.as_secs(),
                        "Waiting before next attempt",
                    );
                    tokio::time::sleep(interval).await;
                }
                ordinal += 1;
            }
            AttemptOutcome::Fatal(error) => {
                tracing::error!(attempt = ordinal, error = %error, "Final attempt failed");
                return Err(error);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
