//! Step trait for ordered provisioning
//!
//! A Step is one unit of the run: an optional presence guard, an install
//! branch, and the labels to report when that branch ran.

use crate::types::FailurePolicy;
use anyhow::Result;

/// Core trait for provisioning steps
///
/// `C` is whatever context the steps need at apply time (a process gateway,
/// captured environment, ...). The crate never looks inside it.
///
/// # Example
///
/// ```ignore
/// use pipeline::Step;
///
/// struct AptPackage { name: String }
///
/// impl Step<Host> for AptPackage {
///     fn id(&self) -> &str { &self.name }
///
///     fn is_satisfied(&self, host: &Host) -> anyhow::Result<bool> {
///         Ok(host.is_executable_installed(&self.name))
///     }
///
///     fn labels(&self) -> Vec<String> { vec![self.name.clone()] }
///
///     fn apply(&self, host: &Host) -> anyhow::Result<()> {
///         host.run(&Invocation::new("sudo").args(["apt", "install", &self.name, "-y"]))?;
///         Ok(())
///     }
/// }
/// ```
pub trait Step<C: ?Sized> {
    /// Unique identifier within a plan (e.g. "wget", "oh-my-zsh")
    fn id(&self) -> &str;

    /// Human-readable description, shown in section banners
    fn description(&self) -> String {
        self.id().to_string()
    }

    /// Section the step belongs to, used for `--only` / `--skip` selection
    fn section(&self) -> &str {
        "default"
    }

    /// What a failure of this step does to the run
    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Fatal
    }

    /// Labels appended to the installed list when the install branch ran
    fn labels(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether the step is already done
    ///
    /// Unguarded steps keep the default and always run. Evaluated fresh on
    /// every run; the force flag bypasses it entirely.
    fn is_satisfied(&self, _ctx: &C) -> Result<bool> {
        Ok(false)
    }

    /// Run the install branch
    fn apply(&self, ctx: &C) -> Result<()>;
}

/// A boxed step for type-erased storage
pub type BoxedStep<C> = Box<dyn Step<C>>;
