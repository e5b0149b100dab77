//! Shell specification parsing.
//!
//! Turns the free-form `shell` input into an [`InvocationTemplate`]: the
//! interpreter to launch and its argument tokens, one of which carries the
//! [`SCRIPT_PATH_PLACEHOLDER`] to be replaced by the script path.

use std::path::Path;

/// Marker substituted with the materialized script's path.
pub const SCRIPT_PATH_PLACEHOLDER: &str = "{0}";

/// Interpreters with a predefined invocation template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownShell {
    Sh,
    Bash,
    Cmd,
    Pwsh,
    Powershell,
    Dotnet,
}

impl KnownShell {
    pub const ALL: [KnownShell; 6] = [
        Self::Sh,
        Self::Bash,
        Self::Cmd,
        Self::Pwsh,
        Self::Powershell,
        Self::Dotnet,
    ];

    /// Look up a known interpreter by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shell| shell.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sh => "sh",
            Self::Bash => "bash",
            Self::Cmd => "cmd",
            Self::Pwsh => "pwsh",
            Self::Powershell => "powershell",
            Self::Dotnet => "dotnet",
        }
    }

    /// Predefined template tokens, interpreter first.
    pub fn template_tokens(self) -> &'static [&'static str] {
        match self {
            Self::Sh => &["sh", "-e", "{0}"],
            Self::Bash => &["bash", "--noprofile", "--norc", "-eo", "pipefail", "{0}"],
            Self::Cmd => &["cmd", "/D", "/E:ON", "/V:OFF", "/S", "/C", "\"CALL \"{0}\"\""],
            Self::Pwsh => &["pwsh", "-command", ". '{0}'"],
            Self::Powershell => &["powershell", "-command", ". '{0}'"],
            Self::Dotnet => &["dotnet", "run", "-c", "Release", "{0}"],
        }
    }
}

/// Template used when no shell is specified.
const DEFAULT_TEMPLATE: &[&str] = &["bash", "-e", "{0}"];

/// Parsed form of the `shell` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellSpec {
    /// Empty or whitespace-only input.
    Default,
    /// A single token naming a known interpreter.
    Known(KnownShell),
    /// A single token naming any other executable.
    Executable(String),
    /// Two or more tokens, used verbatim as the template.
    Template(Vec<String>),
}

impl ShellSpec {
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Self::Default,
            [single] => match KnownShell::from_name(single) {
                Some(shell) => Self::Known(shell),
                None => Self::Executable(single.to_string()),
            },
            many => Self::Template(many.iter().map(|t| t.to_string()).collect()),
        }
    }

    pub fn into_template(self) -> InvocationTemplate {
        match self {
            Self::Default => InvocationTemplate::from_static(DEFAULT_TEMPLATE),
            Self::Known(shell) => InvocationTemplate::from_static(shell.template_tokens()),
            Self::Executable(program) => InvocationTemplate {
                program,
                args: vec![SCRIPT_PATH_PLACEHOLDER.to_string()],
            },
            Self::Template(mut tokens) => {
                let args = tokens.split_off(1);
                let program = tokens.remove(0);
                InvocationTemplate { program, args }
            }
        }
    }
}

/// Resolve a raw shell specification. Never fails.
pub fn resolve(raw: &str) -> InvocationTemplate {
    ShellSpec::parse(raw).into_template()
}

/// Interpreter name plus argument tokens.
///
/// Constructed only through [`resolve`], so the interpreter token is always
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationTemplate {
    program: String,
    args: Vec<String>,
}

impl InvocationTemplate {
    fn from_static(tokens: &[&str]) -> Self {
        Self {
            program: tokens[0].to_string(),
            args: tokens[1..].iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Interpreter executable name, as written in the specification.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument tokens before substitution.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Argument tokens with the first placeholder in each replaced by
    /// `script_path`. Tokens without a placeholder pass through unchanged.
    pub fn substitute(&self, script_path: &Path) -> Vec<String> {
        let script_path = script_path.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replacen(SCRIPT_PATH_PLACEHOLDER, &script_path, 1))
            .collect()
    }
}
