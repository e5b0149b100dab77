//! Interpreter lookup on the search path.

use std::path::PathBuf;

/// The interpreter could not be found. Fatal, never retried.
#[derive(Debug, thiserror::Error)]
#[error("Unable to locate executable file: {program}")]
pub struct ResolutionError {
    pub program: String,
    #[source]
    pub source: which::Error,
}

/// Resolve `program` to an absolute executable path.
///
/// Names containing a path separator are checked in place; bare names are
/// searched for on `PATH` (honouring `PATHEXT` on Windows).
pub fn locate_executable(program: &str) -> Result<PathBuf, ResolutionError> {
    let path = which::which(program).map_err(|source| ResolutionError {
        program: program.to_string(),
        source,
    })?;
    tracing::debug!(program, path = %path.display(), "Located interpreter");
    Ok(path)
}
