//! Recipes: one catalog entry, validated and ready to run as a step

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use hostkit::{Invocation, fs as hostfs};
use pipeline::{FailurePolicy, Step};

use super::provision::Provision;
use crate::prompt::Answers;

/// Names of the action verbs, in the order they are checked
pub const VERBS: [&str; 10] = [
    "run",
    "shell",
    "download",
    "script",
    "clone",
    "append_line",
    "write_file",
    "delete_file",
    "delete_dir",
    "require_shell",
];

// ============================================================================
// TOML schema
// ============================================================================

/// A `[[steps]]` table as written
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeSpec {
    pub id: String,
    pub section: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub guard: Option<Guard>,
    #[serde(default)]
    pub when: Option<Condition>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub tolerate: bool,
    pub actions: Vec<ActionSpec>,
}

/// One inline table of a step's `actions` list
///
/// Exactly one verb field must be set; the rest are modifiers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSpec {
    pub run: Option<Vec<String>>,
    pub shell: Option<String>,
    pub download: Option<String>,
    pub script: Option<String>,
    pub clone: Option<String>,
    pub append_line: Option<String>,
    pub write_file: Option<String>,
    pub delete_file: Option<String>,
    pub delete_dir: Option<String>,
    pub require_shell: Option<String>,

    pub dest: Option<String>,
    pub cwd: Option<String>,
    pub args: Option<Vec<String>>,
    pub interpreter: Option<String>,
    pub stdin: Option<bool>,
    #[serde(default)]
    pub tolerate: bool,
}

impl ActionSpec {
    fn verbs(&self) -> Vec<&'static str> {
        let present = [
            self.run.is_some(),
            self.shell.is_some(),
            self.download.is_some(),
            self.script.is_some(),
            self.clone.is_some(),
            self.append_line.is_some(),
            self.write_file.is_some(),
            self.delete_file.is_some(),
            self.delete_dir.is_some(),
            self.require_shell.is_some(),
        ];
        VERBS
            .iter()
            .zip(present)
            .filter_map(|(verb, set)| set.then_some(*verb))
            .collect()
    }

    fn check_modifiers(&self, verb: &str) -> Result<()> {
        let allowed: &[&str] = match verb {
            "run" | "shell" => &["cwd", "stdin"],
            "download" | "clone" | "append_line" | "write_file" => &["dest"],
            "script" => &["dest", "args", "interpreter", "stdin"],
            _ => &[],
        };
        let used = [
            ("dest", self.dest.is_some()),
            ("cwd", self.cwd.is_some()),
            ("args", self.args.is_some()),
            ("interpreter", self.interpreter.is_some()),
            ("stdin", self.stdin.is_some()),
        ];

        for (modifier, set) in used {
            if set && !allowed.contains(&modifier) {
                bail!("`{modifier}` does not apply to `{verb}`");
            }
        }
        Ok(())
    }

    /// Validate and convert into a runnable task
    pub fn into_task(self) -> Result<Task> {
        let verb = match self.verbs().as_slice() {
            [verb] => *verb,
            [] => bail!("action names no verb (expected one of: {})", VERBS.join(", ")),
            many => bail!("action names more than one verb: {}", many.join(", ")),
        };
        self.check_modifiers(verb)?;

        let tolerate = self.tolerate;
        let stdin = self.stdin.unwrap_or(true);
        let dest = || {
            self.dest
                .clone()
                .with_context(|| format!("`{verb}` needs a `dest`"))
        };

        let action = match verb {
            "run" => {
                let argv = self.run.clone().unwrap_or_default();
                if argv.is_empty() {
                    bail!("`run` needs at least a program name");
                }
                Action::Run {
                    argv,
                    cwd: self.cwd.clone(),
                    stdin,
                }
            }
            "shell" => Action::Shell {
                script: self.shell.clone().unwrap_or_default(),
                cwd: self.cwd.clone(),
                stdin,
            },
            "download" => Action::Download {
                url: self.download.clone().unwrap_or_default(),
                dest: dest()?,
            },
            "script" => Action::Script {
                url: self.script.clone().unwrap_or_default(),
                dest: dest()?,
                args: self.args.clone().unwrap_or_default(),
                interpreter: self.interpreter.clone(),
                stdin,
            },
            "clone" => Action::Clone {
                url: self.clone.clone().unwrap_or_default(),
                dest: dest()?,
            },
            "append_line" => Action::AppendLine {
                line: self.append_line.clone().unwrap_or_default(),
                file: dest()?,
            },
            "write_file" => Action::WriteFile {
                content: self.write_file.clone().unwrap_or_default(),
                file: dest()?,
            },
            "delete_file" => Action::DeleteFile {
                path: self.delete_file.clone().unwrap_or_default(),
            },
            "delete_dir" => Action::DeleteDir {
                path: self.delete_dir.clone().unwrap_or_default(),
            },
            _ => Action::RequireShell {
                name: self.require_shell.clone().unwrap_or_default(),
            },
        };

        Ok(Task { action, tolerate })
    }
}

impl RecipeSpec {
    /// Validate and convert into a recipe
    pub fn into_recipe(self) -> Result<Recipe> {
        if self.id.trim().is_empty() {
            bail!("step id must not be empty");
        }
        if self.actions.is_empty() {
            bail!("step `{}` has no actions", self.id);
        }

        let tasks = self
            .actions
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.into_task()
                    .with_context(|| format!("step `{}`, action {}", self.id, index + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Recipe {
            description: self.description.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            section: self.section,
            guard: self.guard,
            when: self.when,
            labels: self.labels,
            policy: if self.tolerate {
                FailurePolicy::Tolerated
            } else {
                FailurePolicy::Fatal
            },
            tasks,
        })
    }
}

// ============================================================================
// Guards and conditions
// ============================================================================

/// Presence check deciding whether a step is already done
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Guard {
    /// Executable resolvable on the search path
    Executable(String),
    /// Anything exists at the path
    Path(String),
}

impl Guard {
    pub fn is_satisfied(&self, ctx: &Provision<'_>) -> Result<bool> {
        match self {
            Self::Executable(name) => Ok(ctx.host().is_executable_installed(&ctx.expand(name))),
            Self::Path(path) => Ok(hostfs::dir_exists(&ctx.expand_path(path))?),
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executable(name) => write!(f, "executable {name}"),
            Self::Path(path) => write!(f, "path {path}"),
        }
    }
}

/// Answer-based condition for including a step in the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Desktop,
    NotDesktop,
    Wsl,
    NotWsl,
}

impl Condition {
    pub fn holds(self, answers: &Answers) -> bool {
        match self {
            Self::Desktop => answers.desktop,
            Self::NotDesktop => !answers.desktop,
            Self::Wsl => answers.wsl,
            Self::NotWsl => !answers.wsl,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Desktop => "desktop",
            Self::NotDesktop => "not-desktop",
            Self::Wsl => "wsl",
            Self::NotWsl => "not-wsl",
        })
    }
}

// ============================================================================
// Actions
// ============================================================================

/// A validated action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Run {
        argv: Vec<String>,
        cwd: Option<String>,
        stdin: bool,
    },
    Shell {
        script: String,
        cwd: Option<String>,
        stdin: bool,
    },
    Download {
        url: String,
        dest: String,
    },
    Script {
        url: String,
        dest: String,
        args: Vec<String>,
        interpreter: Option<String>,
        stdin: bool,
    },
    Clone {
        url: String,
        dest: String,
    },
    AppendLine {
        line: String,
        file: String,
    },
    WriteFile {
        content: String,
        file: String,
    },
    DeleteFile {
        path: String,
    },
    DeleteDir {
        path: String,
    },
    RequireShell {
        name: String,
    },
}

/// An action plus its own failure policy inside the step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub action: Action,
    pub tolerate: bool,
}

impl Action {
    /// Every string the action carries, for variable scanning
    fn strings(&self) -> Vec<&str> {
        match self {
            Self::Run { argv, cwd, .. } => argv
                .iter()
                .map(String::as_str)
                .chain(cwd.as_deref())
                .collect(),
            Self::Shell { script, cwd, .. } => {
                std::iter::once(script.as_str()).chain(cwd.as_deref()).collect()
            }
            Self::Script {
                url,
                dest,
                args,
                interpreter,
                ..
            } => [url.as_str(), dest.as_str()]
                .into_iter()
                .chain(args.iter().map(String::as_str))
                .chain(interpreter.as_deref())
                .collect(),
            Self::Download { url, dest } | Self::Clone { url, dest } => {
                vec![url.as_str(), dest.as_str()]
            }
            Self::AppendLine { line, file } => vec![line.as_str(), file.as_str()],
            Self::WriteFile { content, file } => vec![content.as_str(), file.as_str()],
            Self::DeleteFile { path } | Self::DeleteDir { path } => vec![path.as_str()],
            Self::RequireShell { name } => vec![name.as_str()],
        }
    }

    fn perform(&self, ctx: &Provision<'_>) -> Result<()> {
        match self {
            Self::Run { argv, cwd, stdin } => {
                let (program, args) = argv.split_first().context("empty command")?;
                let invocation = command(ctx, program, args, cwd.as_deref(), *stdin);
                ctx.host().run(&invocation)?;
            }
            Self::Shell { script, cwd, stdin } => {
                let args = ["-c".to_string(), script.clone()];
                let invocation = command(ctx, "sh", &args, cwd.as_deref(), *stdin);
                ctx.host().run(&invocation)?;
            }
            Self::Download { url, dest } => {
                ctx.host()
                    .download_file(&ctx.expand(url), &ctx.expand_path(dest))?;
            }
            Self::Script {
                url,
                dest,
                args,
                interpreter,
                stdin,
            } => run_installer(ctx, url, dest, args, interpreter.as_deref(), *stdin)?,
            Self::Clone { url, dest } => {
                let outcome = ctx
                    .host()
                    .clone_or_update(&ctx.expand(url), &ctx.expand_path(dest))?;
                log::debug!("{dest}: {outcome:?}");
            }
            Self::AppendLine { line, file } => {
                let file = ctx.expand_path(file);
                let line = ctx.expand(line);
                if ctx.is_dry_run() {
                    log::info!("Would add line to {}: {line}", file.display());
                } else {
                    hostfs::append_line_if_missing(&file, &line)?;
                }
            }
            Self::WriteFile { content, file } => {
                let file = ctx.expand_path(file);
                if ctx.is_dry_run() {
                    log::info!("Would write {}", file.display());
                } else {
                    hostfs::write_file(&file, &ctx.expand(content))?;
                }
            }
            Self::DeleteFile { path } => delete(ctx, &ctx.expand_path(path), false)?,
            Self::DeleteDir { path } => {
                let path = ctx.expand_path(path);
                if hostfs::dir_exists(&path)? {
                    delete(ctx, &path, true)?;
                }
            }
            Self::RequireShell { name } => {
                if !ctx.env().shell.contains(name.as_str()) {
                    bail!("Please restart your shell and run the script again in {name} to continue.");
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run { argv, cwd, .. } => {
                if let Some(dir) = cwd {
                    write!(f, "(in {dir}) ")?;
                }
                write!(f, "run {}", argv.join(" "))
            }
            Self::Shell { script, .. } => write!(f, "shell {script}"),
            Self::Download { url, dest } => write!(f, "download {url} -> {dest}"),
            Self::Script {
                url, dest, args, ..
            } => {
                write!(f, "script {url} -> {dest}")?;
                if !args.is_empty() {
                    write!(f, " {}", args.join(" "))?;
                }
                Ok(())
            }
            Self::Clone { url, dest } => write!(f, "clone {url} -> {dest}"),
            Self::AppendLine { line, file } => write!(f, "append {line:?} to {file}"),
            Self::WriteFile { file, .. } => write!(f, "write {file}"),
            Self::DeleteFile { path } => write!(f, "delete file {path}"),
            Self::DeleteDir { path } => write!(f, "delete dir {path}"),
            Self::RequireShell { name } => write!(f, "require shell {name}"),
        }
    }
}

fn command(
    ctx: &Provision<'_>,
    program: &str,
    args: &[String],
    cwd: Option<&str>,
    stdin: bool,
) -> Invocation {
    let mut invocation =
        Invocation::new(ctx.expand(program)).args(args.iter().map(|arg| ctx.expand(arg)));
    if let Some(dir) = cwd {
        invocation = invocation.current_dir(ctx.expand_path(dir));
    }
    if !stdin {
        invocation = invocation.without_stdin();
    }
    invocation
}

/// Download an installer, run it, and remove it whatever the outcome
fn run_installer(
    ctx: &Provision<'_>,
    url: &str,
    dest: &str,
    args: &[String],
    interpreter: Option<&str>,
    stdin: bool,
) -> Result<()> {
    let file = ctx.expand_path(dest);
    ctx.host().download_file(&ctx.expand(url), &file)?;

    let outcome = match interpreter {
        Some(interpreter) => {
            let mut argv = vec![file.to_string_lossy().into_owned()];
            argv.extend(args.iter().cloned());
            ctx.host()
                .run(&command(ctx, interpreter, &argv, None, stdin))
        }
        None => {
            let path = file.to_string_lossy();
            let chmod = Invocation::new("chmod").args(["+x", &*path]);
            ctx.host().run(&chmod).and_then(|()| {
                let program = if file.components().count() > 1 {
                    path.to_string()
                } else {
                    format!("./{path}")
                };
                ctx.host().run(&command(ctx, &program, args, None, stdin))
            })
        }
    };

    let cleanup = delete(ctx, &file, false);
    outcome?;
    cleanup
}

fn delete(ctx: &Provision<'_>, path: &Path, recursive: bool) -> Result<()> {
    if ctx.is_dry_run() {
        log::info!("Would delete: {}", path.display());
        return Ok(());
    }
    if recursive {
        hostfs::delete_dir(path)?;
    } else {
        hostfs::delete_file(path)?;
    }
    Ok(())
}

// ============================================================================
// Recipe
// ============================================================================

/// A validated catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: String,
    pub section: String,
    pub description: String,
    pub guard: Option<Guard>,
    pub when: Option<Condition>,
    pub labels: Vec<String>,
    pub policy: FailurePolicy,
    pub tasks: Vec<Task>,
}

impl Recipe {
    /// Whether the recipe belongs in a plan for these answers
    pub fn applies_to(&self, answers: &Answers) -> bool {
        self.when.is_none_or(|condition| condition.holds(answers))
    }

    /// Whether any action refers to `$var` or `${var}`
    pub fn mentions(&self, var: &str) -> bool {
        let plain = format!("${var}");
        let braced = format!("${{{var}}}");
        self.tasks
            .iter()
            .flat_map(|task| task.action.strings())
            .any(|s| s.contains(&braced) || mentions_plain(s, &plain))
    }
}

/// `$VAR` not followed by another identifier character
fn mentions_plain(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(at, _)| {
        haystack[at + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}

impl<'h> Step<Provision<'h>> for Recipe {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn section(&self) -> &str {
        &self.section
    }

    fn policy(&self) -> FailurePolicy {
        self.policy
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn is_satisfied(&self, ctx: &Provision<'h>) -> Result<bool> {
        match &self.guard {
            Some(guard) => guard.is_satisfied(ctx),
            None => Ok(false),
        }
    }

    fn apply(&self, ctx: &Provision<'h>) -> Result<()> {
        for task in &self.tasks {
            if let Err(error) = task.action.perform(ctx) {
                if !task.tolerate {
                    return Err(error);
                }
                log::error!("{}: {} failed, continuing: {error:#}", self.id, task.action);
            }
        }
        Ok(())
    }
}
