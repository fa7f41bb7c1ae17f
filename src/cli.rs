use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::AnswerDefaults;

#[derive(Parser)]
#[command(name = "bootstrap")]
#[command(version)]
#[command(about = "Provision a fresh Debian/Ubuntu workstation", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Arguments for the default `run` command
    #[command(flatten)]
    pub run: RunArgs,
}

impl Cli {
    /// A top-level `run` option given together with a subcommand, if any
    ///
    /// `--email` and `--name` are not checked; they may come from the
    /// environment.
    pub fn misplaced_run_option(&self) -> Option<&'static str> {
        self.command.as_ref()?;

        let run = &self.run;
        [
            ("--force", run.force),
            ("--dry-run", run.dry_run),
            ("--yes", run.yes),
            ("--desktop", run.desktop),
            ("--wsl", run.wsl),
            ("--only", !run.only.is_empty()),
            ("--skip", !run.skip.is_empty()),
            ("--config", run.source.config.is_some()),
            ("--catalog", run.source.catalog.is_some()),
        ]
        .into_iter()
        .find_map(|(flag, given)| given.then_some(flag))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the provisioning steps (the default)
    Run(RunArgs),

    /// List the steps in the catalog
    Steps(StepsArgs),

    /// Re-run named steps unconditionally (e.g. `update neovim`)
    Update(UpdateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Catalog and config selection shared by every command
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// Config file (default: <config dir>/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Step catalog to use instead of the configured or built-in one
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct RunArgs {
    /// Run install steps even when already present
    #[arg(long)]
    pub force: bool,

    /// Print commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Don't prompt; use flags, config, then defaults
    #[arg(short, long)]
    pub yes: bool,

    /// Answer "yes" to the desktop environment question
    #[arg(long)]
    pub desktop: bool,

    /// Answer "yes" to the WSL question
    #[arg(long)]
    pub wsl: bool,

    /// Email for the global git config
    #[arg(long, env = "BOOTSTRAP_GIT_EMAIL")]
    pub email: Option<String>,

    /// Name for the global git config
    #[arg(long, env = "BOOTSTRAP_GIT_NAME")]
    pub name: Option<String>,

    /// Only run these sections (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip these sections (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl RunArgs {
    /// Answers given on the command line; unset flags stay `None`
    pub fn answer_flags(&self) -> AnswerDefaults {
        AnswerDefaults {
            desktop: self.desktop.then_some(true),
            wsl: self.wsl.then_some(true),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct StepsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Clone, Debug)]
pub struct UpdateArgs {
    /// Step ids to re-run, in catalog order
    #[arg(required = true, value_name = "STEP_ID")]
    pub steps: Vec<String>,

    /// Print commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Email for the global git config
    #[arg(long, env = "BOOTSTRAP_GIT_EMAIL")]
    pub email: Option<String>,

    /// Name for the global git config
    #[arg(long, env = "BOOTSTRAP_GIT_NAME")]
    pub name: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["bootstrap", "--force", "--only", "base,shell"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.run.force);
        assert_eq!(cli.run.only, ["base", "shell"]);
    }

    #[test]
    fn test_run_subcommand() {
        let cli = Cli::try_parse_from([
            "bootstrap", "-vv", "run", "--dry-run", "--desktop", "--skip", "desktop",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert!(args.dry_run);
        assert_eq!(args.answer_flags().desktop, Some(true));
        assert_eq!(args.answer_flags().wsl, None);
        assert_eq!(args.skip, ["desktop"]);
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["bootstrap", "-v", "steps"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Some(Command::Steps(_))));
        assert_eq!(cli.misplaced_run_option(), None);

        let cli = Cli::try_parse_from(["bootstrap", "-q", "update", "neovim"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Command::Update(_))));
        assert_eq!(cli.misplaced_run_option(), None);

        let cli = Cli::try_parse_from(["bootstrap", "-vv", "run"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::Run(_))));
    }

    #[test]
    fn test_run_option_before_subcommand_is_flagged() {
        let cli = Cli::try_parse_from(["bootstrap", "--force", "steps"]).unwrap();
        assert_eq!(cli.misplaced_run_option(), Some("--force"));

        let cli = Cli::try_parse_from(["bootstrap", "--skip", "desktop", "update", "neovim"])
            .unwrap();
        assert_eq!(cli.misplaced_run_option(), Some("--skip"));

        let cli = Cli::try_parse_from(["bootstrap", "--force"]).unwrap();
        assert_eq!(cli.misplaced_run_option(), None);
    }

    #[test]
    fn test_update_requires_step() {
        assert!(Cli::try_parse_from(["bootstrap", "update"]).is_err());

        let cli = Cli::try_parse_from(["bootstrap", "update", "ghostty", "ghostty-keybinding"])
            .unwrap();
        let Some(Command::Update(args)) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.steps, ["ghostty", "ghostty-keybinding"]);
    }
}
