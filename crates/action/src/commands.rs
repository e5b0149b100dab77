//! GitHub Actions workflow commands.
//!
//! Commands are single stdout lines of the form `::name::message`. The
//! runner turns `warning` and `error` into job annotations and shows
//! `debug` only when step debug logging is enabled.

use std::io::Write;

/// Escape a message so it stays on one command line.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Render a workflow command line (without the trailing newline).
pub fn format_command(name: &str, message: &str) -> String {
    format!("::{name}::{}", escape_data(message))
}

fn issue(name: &str, message: &str) {
    let line = format_command(name, message);
    let mut stdout = std::io::stdout().lock();
    // A closed stdout leaves nothing to annotate.
    let _ = writeln!(stdout, "{line}");
    let _ = stdout.flush();
}

pub fn warning(message: &str) {
    issue("warning", message);
}

/// Annotate the terminal failure. The caller sets the exit status.
pub fn error(message: &str) {
    issue("error", message);
}

pub fn debug(message: &str) {
    issue("debug", message);
}
