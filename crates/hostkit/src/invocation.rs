//! A single external command, built right before it runs.

use std::fmt;
use std::path::PathBuf;

/// What the child gets on standard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stdin {
    /// Share the caller's stdin (needed for sudo and SSH prompts)
    #[default]
    Inherit,
    /// Attach nothing
    Null,
}

/// Program, arguments, working directory and stdin mode.
///
/// Standard output and error are always attached to the caller's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Ordered argument list
    pub args: Vec<String>,
    /// Working directory; `None` keeps the caller's
    pub cwd: Option<PathBuf>,
    /// Standard input mode
    pub stdin: Stdin,
}

impl Invocation {
    /// Start building an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: Stdin::Inherit,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run inside `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Do not forward the caller's stdin.
    pub fn without_stdin(mut self) -> Self {
        self.stdin = Stdin::Null;
        self
    }

    /// `program arg1 arg2 ...`, for logs and error messages.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cwd {
            Some(dir) => write!(f, "(in {}) {}", dir.display(), self.command_line()),
            None => f.write_str(&self.command_line()),
        }
    }
}
