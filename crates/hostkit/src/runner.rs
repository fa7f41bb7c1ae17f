//! Process gateway.
//!
//! The [`Runner`] trait is the single point where external programs start,
//! allowing for different implementations (real execution, dry run, fakes in
//! tests).

use std::cell::RefCell;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::invocation::{Invocation, Stdin};

/// Runs external programs and reports their exit status.
///
/// Implementations attach the caller's stdout/stderr, wait for the child and
/// map a non-zero exit to [`Error::Status`]. No retries, no timeout, no
/// output capture.
pub trait Runner {
    /// Run `invocation` to completion.
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        (**self).run(invocation)
    }
}

impl<R: Runner + ?Sized> Runner for Box<R> {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        (**self).run(invocation)
    }
}

/// Runner that really executes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        match &invocation.cwd {
            Some(dir) => log::info!(
                "Running command in directory: {} {}",
                dir.display(),
                invocation.command_line()
            ),
            None => log::info!("Running command: {}", invocation.command_line()),
        }

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .stdin(match invocation.stdin {
                Stdin::Inherit => Stdio::inherit(),
                Stdin::Null => Stdio::null(),
            });

        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|source| Error::Launch {
            command: invocation.command_line(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Status {
                command: invocation.command_line(),
                status,
            })
        }
    }
}

/// Runner that records invocations instead of executing them.
///
/// Every call succeeds. Backs `--dry-run`.
#[derive(Debug, Default)]
pub struct DryRunner {
    recorded: RefCell<Vec<Invocation>>,
}

impl DryRunner {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything "run" so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.recorded.borrow().clone()
    }

    /// Rendered command lines of everything "run" so far.
    pub fn command_lines(&self) -> Vec<String> {
        self.recorded
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }
}

impl Runner for DryRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        log::info!("Would run: {invocation}");
        self.recorded.borrow_mut().push(invocation.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_success_is_ok() {
        assert!(SystemRunner.run(&Invocation::new("true")).is_ok());
    }

    #[test]
    fn test_non_zero_exit_is_status_error() {
        let err = SystemRunner
            .run(&Invocation::new("sh").args(["-c", "exit 3"]).without_stdin())
            .unwrap_err();

        assert!(matches!(err, Error::Status { .. }));
        assert_eq!(err.exit_code(), Some(3));
        assert!(err.to_string().contains("sh -c exit 3"));
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let err = SystemRunner
            .run(&Invocation::new("definitely-not-a-real-program-7f3a"))
            .unwrap_err();

        assert!(matches!(err, Error::Launch { .. }));
    }

    #[test]
    fn test_cwd_is_honoured() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("marker"), "").unwrap();

        let inv = Invocation::new("sh")
            .args(["-c", "test -f marker"])
            .current_dir(temp.path())
            .without_stdin();

        assert!(SystemRunner.run(&inv).is_ok());

        let elsewhere = Invocation::new("sh")
            .args(["-c", "test -f marker"])
            .current_dir(temp.path().join(".."))
            .without_stdin();
        assert!(SystemRunner.run(&elsewhere).is_err());
    }

    #[test]
    fn test_dry_runner_records_without_running() {
        let runner = DryRunner::new();
        runner
            .run(&Invocation::new("definitely-not-a-real-program-7f3a"))
            .unwrap();
        runner.run(&Invocation::new("git").arg("pull")).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["definitely-not-a-real-program-7f3a", "git pull"]
        );
    }

    fn run_twice(runner: impl Runner) {
        runner.run(&Invocation::new("true")).unwrap();
        runner.run(&Invocation::new("true")).unwrap();
    }

    #[test]
    fn test_runner_through_reference_and_box() {
        let runner = DryRunner::new();
        run_twice(&runner);
        let boxed: Box<dyn Runner> = Box::new(DryRunner::new());
        run_twice(boxed);
        assert_eq!(runner.invocations().len(), 2);
    }
}
