//! Retry execution core for inline scripts.
//!
//! Resolves a shell specification into an invocation template, writes the
//! script body to a uniquely named file, and runs it with a bounded number
//! of attempts. Host concerns (input reading, workflow annotations, exit
//! status) live in the `retry-run-action` binary.

pub mod config;
pub mod error;
pub mod scripting;
