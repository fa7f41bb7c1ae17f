//! Error types for host operations.
//!
//! Every failure surfaces as "the underlying operation failed". The variants
//! only separate a program that never started from one that exited badly, and
//! both from plain filesystem errors.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while touching the host.
#[derive(Debug, Error)]
pub enum Error {
    /// The program could not be started (not installed, not executable, bad cwd)
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        /// Rendered command line
        command: String,
        /// Underlying spawn error
        #[source]
        source: io::Error,
    },

    /// The program ran but did not exit successfully
    #[error("`{command}` failed ({status})")]
    Status {
        /// Rendered command line
        command: String,
        /// Exit status reported by the OS
        status: ExitStatus,
    },

    /// Filesystem operation failed
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// What was attempted ("open", "append to", "delete", ...)
        action: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Exit code of a failed program, if it exited normally.
    ///
    /// `None` for launch failures, signal terminations and IO errors.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Status { status, .. } => status.code(),
            _ => None,
        }
    }
}

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message_names_path() {
        let err = Error::io(
            "open",
            Path::new("/tmp/missing.txt"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("failed to open /tmp/missing.txt"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_launch_error_has_no_exit_code() {
        let err = Error::Launch {
            command: "nope --version".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("`nope --version`"));
        assert_eq!(err.exit_code(), None);
    }
}
