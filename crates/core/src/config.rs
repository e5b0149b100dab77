//! Action inputs and the retry policy derived from them.
//!
//! Inputs follow the GitHub Actions convention: an input named `retry` is
//! read from the `INPUT_RETRY` environment variable, with surrounding
//! whitespace trimmed.

use std::path::PathBuf;

use crate::scripting::retry::RetryPolicy;

/// Environment variable holding the runner's per-job scratch directory.
pub const SCRATCH_DIR_ENV_VAR: &str = "RUNNER_TEMP";

/// Errors raised while reading action inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error("Input '{name}' must be a base-10 integer, got '{value}'")]
    InvalidInteger { name: &'static str, value: String },
}

/// Configuration for a single retry run, read once at startup.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Script body, written verbatim to the materialized file.
    pub run: String,
    /// Raw shell specification (empty selects the default template).
    pub shell: String,
    /// Attempt budget and delay between failed attempts.
    pub policy: RetryPolicy,
    /// Directory the script file is written to.
    pub scratch_dir: PathBuf,
}

impl ActionConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var          | Default            |
    /// |------------------|--------------------|
    /// | `INPUT_RUN`      | required           |
    /// | `INPUT_SHELL`    | empty (`bash -e`)  |
    /// | `INPUT_RETRY`    | `1`                |
    /// | `INPUT_INTERVAL` | `0`                |
    /// | `RUNNER_TEMP`    | system temp dir    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run = input(&lookup, "run");
        if run.is_empty() {
            return Err(ConfigError::MissingInput("run"));
        }

        let shell = input(&lookup, "shell");

        let max_attempts = match parse_integer("retry", &input(&lookup, "retry"))? {
            None => 1,
            Some(value) if value < 1 => {
                tracing::warn!(retry = value, "retry must be at least 1, running once");
                1
            }
            Some(value) => u32::try_from(value).unwrap_or(u32::MAX),
        };

        let interval_secs = match parse_integer("interval", &input(&lookup, "interval"))? {
            None => 0,
            Some(value) if value < 0 => {
                tracing::warn!(interval = value, "interval must not be negative, using 0");
                0
            }
            Some(value) => value as u64,
        };

        let scratch_dir = match lookup(SCRATCH_DIR_ENV_VAR).filter(|dir| !dir.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let fallback = std::env::temp_dir();
                tracing::warn!(
                    fallback = %fallback.display(),
                    "{SCRATCH_DIR_ENV_VAR} is not set, using the system temp directory",
                );
                fallback
            }
        };

        Ok(Self {
            run,
            shell,
            policy: RetryPolicy::new(max_attempts, interval_secs),
            scratch_dir,
        })
    }
}

/// Environment variable name carrying the input `name`.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn input<F>(lookup: &F, name: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&input_env_name(name))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Parse a base-10 integer input. Empty input yields `None`.
fn parse_integer(name: &'static str, value: &str) -> Result<Option<i64>, ConfigError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidInteger {
            name,
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ActionConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ActionConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn input_env_name_uppercases_and_replaces_spaces() {
        assert_eq!(input_env_name("run"), "INPUT_RUN");
        assert_eq!(input_env_name("retry delay"), "INPUT_RETRY_DELAY");
    }

    #[test]
    fn full_inputs() {
        let config = load(&[
            ("INPUT_RUN", "echo hi"),
            ("INPUT_SHELL", "sh"),
            ("INPUT_RETRY", "3"),
            ("INPUT_INTERVAL", "5"),
            ("RUNNER_TEMP", "/runner/_temp"),
        ])
        .expect("load");
        assert_eq!(config.run, "echo hi");
        assert_eq!(config.shell, "sh");
        assert_eq!(config.policy.max_attempts(), 3);
        assert_eq!(config.policy.interval(), Duration::from_secs(5));
        assert_eq!(config.scratch_dir, PathBuf::from("/runner/_temp"));
    }

    #[test]
    fn run_is_required() {
        assert_eq!(
            load(&[("INPUT_RETRY", "2")]).unwrap_err(),
            ConfigError::MissingInput("run")
        );
        assert_eq!(
            load(&[("INPUT_RUN", "   ")]).unwrap_err(),
            ConfigError::MissingInput("run")
        );
    }

    #[test]
    fn inputs_are_trimmed() {
        let config = load(&[
            ("INPUT_RUN", "  exit 0\n"),
            ("INPUT_SHELL", " bash "),
            ("INPUT_RETRY", " 4 "),
        ])
        .expect("load");
        assert_eq!(config.run, "exit 0");
        assert_eq!(config.shell, "bash");
        assert_eq!(config.policy.max_attempts(), 4);
    }

    #[test]
    fn missing_numbers_use_defaults() {
        let config = load(&[("INPUT_RUN", "true")]).expect("load");
        assert_eq!(config.policy.max_attempts(), 1);
        assert_eq!(config.policy.interval(), Duration::ZERO);
        assert!(config.shell.is_empty());
    }

    #[test]
    fn non_numeric_retry_is_rejected() {
        assert_matches!(
            load(&[("INPUT_RUN", "true"), ("INPUT_RETRY", "three")]),
            Err(ConfigError::InvalidInteger { name: "retry", .. })
        );
        assert_matches!(
            load(&[("INPUT_RUN", "true"), ("INPUT_RETRY", "3abc")]),
            Err(ConfigError::InvalidInteger { name: "retry", .. })
        );
    }

    #[test]
    fn non_numeric_interval_is_rejected() {
        let err = load(&[("INPUT_RUN", "true"), ("INPUT_INTERVAL", "1.5")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Input 'interval' must be a base-10 integer, got '1.5'"
        );
    }

    #[test]
    fn non_positive_retry_clamps_to_one() {
        for retry in ["0", "-2"] {
            let config = load(&[("INPUT_RUN", "true"), ("INPUT_RETRY", retry)]).expect("load");
            assert_eq!(config.policy.max_attempts(), 1, "retry={retry}");
        }
    }

    #[test]
    fn negative_interval_clamps_to_zero() {
        let config =
            load(&[("INPUT_RUN", "true"), ("INPUT_INTERVAL", "-10")]).expect("load");
        assert_eq!(config.policy.interval(), Duration::ZERO);
    }

    #[test]
    fn missing_scratch_dir_falls_back_to_temp_dir() {
        let config = load(&[("INPUT_RUN", "true"), ("RUNNER_TEMP", "")]).expect("load");
        assert_eq!(config.scratch_dir, std::env::temp_dir());
    }
}
