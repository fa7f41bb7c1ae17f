//! # hostkit
//!
//! Process gateway and idempotent helpers for provisioning a workstation.
//!
//! This crate provides:
//! - A [`Runner`] trait that starts external programs with the caller's
//!   standard streams attached, plus a real and a dry-run implementation
//! - Presence checks: executables on the search path, paths on disk, lines in
//!   a file
//! - Idempotent mutations: append-line-if-missing, clone-or-update
//! - Plain helpers: download via curl, write a file, delete file/directory
//!
//! ## Example
//!
//! ```no_run
//! use hostkit::{Host, Invocation};
//! use std::path::Path;
//!
//! let host = Host::system();
//!
//! if !host.is_executable_installed("wget") {
//!     host.run(&Invocation::new("sudo").args(["apt", "install", "wget", "-y"]))
//!         .expect("apt failed");
//! }
//!
//! host.clone_or_update("https://github.com/neovim/neovim", Path::new("neovim"))
//!     .expect("git failed");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod fs;
pub mod invocation;
pub mod repo;
pub mod runner;

pub use error::{Error, Result};
pub use invocation::{Invocation, Stdin};
pub use repo::RepoSync;
pub use runner::{DryRunner, Runner, SystemRunner};

use std::ffi::OsString;
use std::path::Path;

/// Whether `name` resolves to an executable on the process search path.
///
/// Never errors; anything that prevents resolution counts as "not installed".
pub fn is_executable_installed(name: &str) -> bool {
    which::which(name).is_ok()
}

/// High-level handle for host operations.
///
/// Wraps a [`Runner`] so every command-backed helper goes through the same
/// gateway; swap the runner to dry-run or fake the host in tests.
pub struct Host<'r> {
    runner: Box<dyn Runner + 'r>,
    search_path: Option<OsString>,
}

impl Host<'static> {
    /// Host that really executes commands.
    pub fn system() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl<'r> Host<'r> {
    /// Host backed by a custom runner.
    pub fn with_runner(runner: impl Runner + 'r) -> Self {
        Self {
            runner: Box::new(runner),
            search_path: None,
        }
    }

    /// Resolve executables against `path` instead of `$PATH`.
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// The gateway itself.
    pub fn runner(&self) -> &dyn Runner {
        self.runner.as_ref()
    }

    /// Run a single command.
    pub fn run(&self, invocation: &Invocation) -> Result<()> {
        self.runner.run(invocation)
    }

    /// Whether `name` resolves to an executable on this host's search path.
    pub fn is_executable_installed(&self, name: &str) -> bool {
        match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
                which::which_in(name, Some(paths), cwd).is_ok()
            }
            None => is_executable_installed(name),
        }
    }

    /// Fetch `url` into `dest` with curl.
    pub fn download_file(&self, url: &str, dest: &Path) -> Result<()> {
        repo::download_file(self.runner(), url, dest)
    }

    /// Shallow-clone `url` into `dest`, or pull if it is already there.
    pub fn clone_or_update(&self, url: &str, dest: &Path) -> Result<RepoSync> {
        repo::clone_or_update(self.runner(), url, dest)
    }
}

impl std::fmt::Debug for Host<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("search_path", &self.search_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn fake_executable(dir: &Path, name: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_known_executable_is_installed() {
        assert!(is_executable_installed("sh"));
    }

    #[test]
    fn test_unknown_executable_is_not_installed() {
        assert!(!is_executable_installed("definitely-not-a-real-program-7f3a"));
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_override() {
        let temp = TempDir::new().unwrap();
        fake_executable(temp.path(), "marker-tool");

        let host = Host::with_runner(DryRunner::new()).with_search_path(temp.path());
        assert!(host.is_executable_installed("marker-tool"));
        assert!(!host.is_executable_installed("sh"));
    }

    #[test]
    fn test_helpers_go_through_runner() {
        let recorder = DryRunner::new();
        let temp = TempDir::new().unwrap();
        {
            let host = Host::with_runner(&recorder);
            host.download_file("https://get.docker.com", Path::new("docker-install.sh"))
                .unwrap();
            host.clone_or_update("https://github.com/ryanoasis/nerd-fonts", &temp.path().join("nf"))
                .unwrap();
        }

        let lines = recorder.command_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("curl -L -o docker-install.sh"));
        assert!(lines[1].starts_with("git clone --depth 1"));
    }
}
