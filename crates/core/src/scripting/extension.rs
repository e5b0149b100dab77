//! Script file extension for an interpreter.

/// Extension used for any interpreter without a dedicated mapping.
pub const FALLBACK_EXTENSION: &str = "sh";

/// File extension (without the dot) the script must carry for `interpreter`.
///
/// Matching is on the interpreter name exactly as given in the shell
/// specification. Unknown interpreters get [`FALLBACK_EXTENSION`]; the
/// extension only affects the file name, never how the script is run.
pub fn extension_for(interpreter: &str) -> &'static str {
    match interpreter {
        "python" => "py",
        "cmd" => "cmd",
        "pwsh" | "powershell" => "ps1",
        "dotnet" => "cs",
        _ => FALLBACK_EXTENSION,
    }
}
