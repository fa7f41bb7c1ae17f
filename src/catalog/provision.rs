//! Context handed to every step while it runs

use std::borrow::Cow;
use std::path::PathBuf;

use hostkit::Host;

use crate::paths::HostEnv;

/// Everything a recipe needs at apply time
#[derive(Debug)]
pub struct Provision<'h> {
    host: Host<'h>,
    env: HostEnv,
    git_email: String,
    git_name: String,
    dry_run: bool,
}

impl<'h> Provision<'h> {
    pub fn new(host: Host<'h>, env: HostEnv) -> Self {
        Self {
            host,
            env,
            git_email: String::new(),
            git_name: String::new(),
            dry_run: false,
        }
    }

    /// Values for `$GIT_EMAIL` and `$GIT_NAME`
    pub fn with_git_identity(mut self, email: impl Into<String>, name: impl Into<String>) -> Self {
        self.git_email = email.into();
        self.git_name = name.into();
        self
    }

    /// Skip filesystem mutations; commands still go through the host's runner
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn host(&self) -> &Host<'h> {
        &self.host
    }

    pub fn env(&self) -> &HostEnv {
        &self.env
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Expand a leading `~` and the known variables in `input`
    ///
    /// Unknown `$VAR`s and `$(...)` are left verbatim for the shell.
    pub fn expand<'s>(&self, input: &'s str) -> Cow<'s, str> {
        let home = self.env.home.to_string_lossy().into_owned();
        shellexpand::full_with_context_no_errors(
            input,
            || Some(home.clone()),
            |var| self.lookup(var).map(str::to_owned),
        )
    }

    /// [`Self::expand`] as a path
    pub fn expand_path(&self, input: &str) -> PathBuf {
        PathBuf::from(self.expand(input).as_ref())
    }

    fn lookup(&self, var: &str) -> Option<&str> {
        match var {
            "HOME" => self.env.home.to_str(),
            "GIT_EMAIL" => Some(&self.git_email),
            "GIT_NAME" => Some(&self.git_name),
            _ => None,
        }
    }
}
