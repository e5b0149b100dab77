//! Subprocess-backed [`ScriptInvoker`].
//!
//! Each attempt spawns the interpreter with the inherited environment plus
//! the attempt overlay. Stdout and stderr are inherited so script output
//! streams straight to the job log; stdin is closed.

use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

use super::executor::{AttemptContext, AttemptOutput, Invocation, ScriptError, ScriptInvoker};

/// Invoker that launches a real process per attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

/// Build the command for one attempt without spawning it.
pub fn build_command(invocation: &Invocation, attempt: &AttemptContext) -> Command {
    let mut cmd = Command::new(&invocation.program);
    push_args(&mut cmd, invocation);

    for (key, value) in &attempt.env_vars {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}

#[cfg(windows)]
fn push_args(cmd: &mut Command, invocation: &Invocation) {
    if invocation.verbatim_args {
        for arg in &invocation.args {
            cmd.raw_arg(arg);
        }
    } else {
        cmd.args(&invocation.args);
    }
}

#[cfg(not(windows))]
fn push_args(cmd: &mut Command, invocation: &Invocation) {
    // Verbatim passing only changes how Windows builds the command line.
    cmd.args(&invocation.args);
}

impl ScriptInvoker for ProcessInvoker {
    async fn invoke(
        &self,
        invocation: &Invocation,
        attempt: &AttemptContext,
    ) -> Result<AttemptOutput, ScriptError> {
        let program = invocation.program_display();
        let mut cmd = build_command(invocation, attempt);

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| ScriptError::Spawn {
            program: program.clone(),
            source,
        })?;

        let status = child.wait().await.map_err(|source| ScriptError::Wait {
            program: program.clone(),
            source,
        })?;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            attempt = attempt.ordinal,
            program = %program,
            exit_code = status.code(),
            duration_ms,
            "Attempt process exited",
        );

        match status.code() {
            Some(0) => Ok(AttemptOutput {
                exit_code: 0,
                duration_ms,
            }),
            Some(exit_code) => Err(ScriptError::ExitStatus { program, exit_code }),
            None => Err(ScriptError::Terminated { program }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use assert_matches::assert_matches;

    use super::*;
    use crate::scripting::test_helpers::sh_invocation;

    #[test]
    fn command_carries_args_and_attempt_env() {
        let inv = sh_invocation("/tmp/script.sh");
        let cmd = build_command(&inv, &AttemptContext::new(2));
        let std_cmd = cmd.as_std();

        assert_eq!(std_cmd.get_program(), OsStr::new("/bin/sh"));
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, [OsStr::new("/tmp/script.sh")]);

        let envs: Vec<_> = std_cmd.get_envs().collect();
        assert_eq!(
            envs,
            [(OsStr::new("RETRY_RUN_ATTEMPT"), Some(OsStr::new("2")))]
        );
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        /// Helper to create a temporary shell script from the given body.
        fn write_temp_script(body: &str) -> tempfile::NamedTempFile {
            use std::io::Write;
            let mut f = tempfile::Builder::new()
                .suffix(".sh")
                .tempfile()
                .expect("create temp file");
            write!(f, "{body}").expect("write body");
            f
        }

        fn invocation_for(script: &tempfile::NamedTempFile) -> Invocation {
            sh_invocation(script.path().to_str().expect("path"))
        }

        #[tokio::test]
        async fn zero_exit_succeeds() {
            let script = write_temp_script("exit 0\n");
            let output = ProcessInvoker
                .invoke(&invocation_for(&script), &AttemptContext::new(1))
                .await
                .expect("invoke");
            assert_eq!(output.exit_code, 0);
        }

        #[tokio::test]
        async fn nonzero_exit_fails() {
            let script = write_temp_script("exit 42\n");
            let result = ProcessInvoker
                .invoke(&invocation_for(&script), &AttemptContext::new(1))
                .await;
            assert_matches!(result, Err(ScriptError::ExitStatus { exit_code: 42, .. }));
        }

        #[tokio::test]
        async fn attempt_number_is_visible_to_script() {
            let script = write_temp_script("test \"$RETRY_RUN_ATTEMPT\" = 3\n");
            let inv = invocation_for(&script);

            assert!(ProcessInvoker.invoke(&inv, &AttemptContext::new(3)).await.is_ok());
            assert_matches!(
                ProcessInvoker.invoke(&inv, &AttemptContext::new(1)).await,
                Err(ScriptError::ExitStatus { exit_code: 1, .. })
            );
        }

        #[tokio::test]
        async fn inherited_environment_is_kept() {
            let script = write_temp_script("test -n \"$PATH\"\n");
            let result = ProcessInvoker
                .invoke(&invocation_for(&script), &AttemptContext::new(1))
                .await;
            assert!(result.is_ok());
        }

        #[tokio::test]
        async fn killed_process_is_terminated() {
            let script = write_temp_script("kill -9 $$\n");
            let result = ProcessInvoker
                .invoke(&invocation_for(&script), &AttemptContext::new(1))
                .await;
            assert_matches!(result, Err(ScriptError::Terminated { .. }));
        }

        #[tokio::test]
        async fn missing_program_fails_to_spawn() {
            let inv = Invocation {
                program: "/nonexistent/interpreter".into(),
                args: vec![],
                verbatim_args: false,
            };
            let result = ProcessInvoker.invoke(&inv, &AttemptContext::new(1)).await;
            assert_matches!(result, Err(ScriptError::Spawn { .. }));
        }
    }
}
