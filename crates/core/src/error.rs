use crate::config::ConfigError;
use crate::scripting::executor::ScriptError;
use crate::scripting::locate::ResolutionError;
use crate::scripting::materialize::MaterializeError;

/// Terminal failure of a retry run.
///
/// Every variant except [`RunError::Execution`] is raised before the first
/// attempt and bypasses the retry loop. `Execution` carries the error of the
/// final attempt only; earlier failures are reported as warnings.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Materialization(#[from] MaterializeError),

    #[error(transparent)]
    Execution(#[from] ScriptError),
}

impl RunError {
    /// Whether the retry loop was entered before this error was raised.
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}
