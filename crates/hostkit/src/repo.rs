//! Downloads and git checkouts driven through a [`Runner`].

use std::path::Path;

use crate::error::Result;
use crate::fs::dir_exists;
use crate::invocation::Invocation;
use crate::runner::Runner;

/// Which branch clone-or-update took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSync {
    /// Destination was absent; a shallow clone was made
    Cloned,
    /// Destination existed; `git pull` ran inside it
    Updated,
}

/// Leave `dest` at the latest revision of `url`.
///
/// Clones with `--depth 1` when `dest` does not exist, otherwise pulls inside
/// it. Stdin is forwarded so SSH can prompt.
pub fn clone_or_update(runner: &dyn Runner, url: &str, dest: &Path) -> Result<RepoSync> {
    if dir_exists(dest)? {
        let pull = Invocation::new("git").arg("pull").current_dir(dest);
        runner.run(&pull)?;
        Ok(RepoSync::Updated)
    } else {
        let clone = Invocation::new("git")
            .args(["clone", "--depth", "1", url])
            .arg(dest.to_string_lossy());
        runner.run(&clone)?;
        Ok(RepoSync::Cloned)
    }
}

/// Fetch `url` into `dest` with curl, following redirects.
pub fn download_file(runner: &dyn Runner, url: &str, dest: &Path) -> Result<()> {
    log::info!("Downloading file: {url}");

    let curl = Invocation::new("curl")
        .args(["-L", "-o"])
        .arg(dest.to_string_lossy())
        .arg(url)
        .without_stdin();
    runner.run(&curl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::runner::{DryRunner, SystemRunner};
    use std::cell::Cell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Fakes git: a clone creates `<dest>/.git`, a pull does nothing.
    #[derive(Default)]
    struct FakeGit {
        clones: Cell<usize>,
        pulls: Cell<usize>,
    }

    impl Runner for FakeGit {
        fn run(&self, invocation: &Invocation) -> Result<()> {
            match invocation.args.first().map(String::as_str) {
                Some("clone") => {
                    self.clones.set(self.clones.get() + 1);
                    let dest = PathBuf::from(invocation.args.last().unwrap());
                    fs::create_dir_all(dest.join(".git")).unwrap();
                }
                Some("pull") => self.pulls.set(self.pulls.get() + 1),
                other => panic!("unexpected git call: {other:?}"),
            }
            Ok(())
        }
    }

    #[test]
    fn test_clone_then_update() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("plugins").join("zsh-autosuggestions");
        let git = FakeGit::default();

        let first = clone_or_update(&git, "git@github.com:zsh-users/zsh-autosuggestions.git", &dest)
            .unwrap();
        assert_eq!(first, RepoSync::Cloned);
        assert!(dest.join(".git").is_dir());

        let second = clone_or_update(&git, "git@github.com:zsh-users/zsh-autosuggestions.git", &dest)
            .unwrap();
        assert_eq!(second, RepoSync::Updated);

        assert_eq!(git.clones.get(), 1);
        assert_eq!(git.pulls.get(), 1);
    }

    #[test]
    fn test_clone_and_pull_command_shape() {
        let temp = TempDir::new().unwrap();
        let runner = DryRunner::new();

        clone_or_update(&runner, "https://github.com/neovim/neovim", &temp.path().join("neovim"))
            .unwrap();
        clone_or_update(&runner, "https://github.com/neovim/neovim", temp.path()).unwrap();

        let calls = runner.invocations();
        assert_eq!(
            calls[0].args[..4],
            ["clone", "--depth", "1", "https://github.com/neovim/neovim"]
        );
        assert_eq!(calls[1].args, vec!["pull"]);
        assert_eq!(calls[1].cwd.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_clone_failure_propagates() {
        struct Failing;
        impl Runner for Failing {
            fn run(&self, invocation: &Invocation) -> Result<()> {
                Err(Error::Launch {
                    command: invocation.command_line(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
            }
        }

        let temp = TempDir::new().unwrap();
        assert!(clone_or_update(&Failing, "url", &temp.path().join("x")).is_err());
    }

    #[test]
    fn test_download_uses_curl_without_stdin() {
        let runner = DryRunner::new();
        download_file(&runner, "https://sh.rustup.rs", Path::new("rustup-init.sh")).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["curl -L -o rustup-init.sh https://sh.rustup.rs"]
        );
        assert_eq!(runner.invocations()[0].stdin, crate::Stdin::Null);
    }

    /// Real git against a local repository; skipped when git is unavailable.
    #[test]
    fn test_real_git_clone_or_update() {
        if !crate::is_executable_installed("git") {
            return;
        }

        let temp = TempDir::new().unwrap();
        let origin = temp.path().join("origin");
        fs::create_dir(&origin).unwrap();

        let git = |args: &[&str]| {
            SystemRunner
                .run(
                    &Invocation::new("git")
                        .args(["-c", "user.email=t@example.com", "-c", "user.name=t"])
                        .args(args.iter().copied())
                        .current_dir(&origin)
                        .without_stdin(),
                )
                .unwrap();
        };
        git(&["init", "--quiet"]);
        git(&["commit", "--quiet", "--allow-empty", "-m", "init"]);

        let url = format!("file://{}", origin.display());
        let dest = temp.path().join("checkout");

        assert_eq!(
            clone_or_update(&SystemRunner, &url, &dest).unwrap(),
            RepoSync::Cloned
        );
        assert!(dest.join(".git").is_dir());
        assert_eq!(
            clone_or_update(&SystemRunner, &url, &dest).unwrap(),
            RepoSync::Updated
        );
    }
}
