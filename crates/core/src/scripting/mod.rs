//! Script resolution, materialization and retried execution.
//!
//! The orchestrator wires the stages together; every stage is usable on its
//! own. Subprocess spawning sits behind [`executor::ScriptInvoker`] so the
//! retry loop can be exercised without launching processes.

pub mod executor;
pub mod extension;
pub mod locate;
pub mod materialize;
pub mod orchestrator;
pub mod retry;
pub mod subprocess;
pub mod template;

/// Shared test helpers for executor and retry tests.
#[cfg(test)]
pub(crate) mod test_helpers {
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::executor::{
        AttemptContext, AttemptOutput, Invocation, ScriptError, ScriptInvoker,
    };

    /// Build an [`Invocation`] of `/bin/sh <script>` for tests.
    pub fn sh_invocation(script: &str) -> Invocation {
        Invocation {
            program: PathBuf::from("/bin/sh"),
            args: vec![script.to_string()],
            verbatim_args: false,
        }
    }

    /// Failure returned by [`ScriptedInvoker`] for a given exit code.
    pub fn exit_failure(exit_code: i32) -> ScriptError {
        ScriptError::ExitStatus {
            program: "/bin/sh".to_string(),
            exit_code,
        }
    }

    /// Invoker replaying a fixed sequence of exit codes.
    ///
    /// Once the sequence is exhausted every further attempt fails with exit
    /// code 1. Each call records the attempt context it received.
    pub struct ScriptedInvoker {
        exit_codes: Mutex<VecDeque<i32>>,
        pub calls: Mutex<Vec<AttemptContext>>,
    }

    impl ScriptedInvoker {
        pub fn new(exit_codes: &[i32]) -> Self {
            Self {
                exit_codes: Mutex::new(exit_codes.iter().copied().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn always_failing() -> Self {
            Self::new(&[])
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().expect("lock").len()
        }
    }

    impl ScriptInvoker for ScriptedInvoker {
        async fn invoke(
            &self,
            _invocation: &Invocation,
            attempt: &AttemptContext,
        ) -> Result<AttemptOutput, ScriptError> {
            self.calls.lock().expect("lock").push(attempt.clone());
            let exit_code = self
                .exit_codes
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or(1);
            if exit_code == 0 {
                Ok(AttemptOutput {
                    exit_code,
                    duration_ms: 0,
                })
            } else {
                Err(exit_failure(exit_code))
            }
        }
    }
}
