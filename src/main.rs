mod catalog;
mod cli;
mod commands;
mod config;
mod paths;
mod progress;
mod prompt;
mod ui;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(flag) = cli.misplaced_run_option() {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                format!("`{flag}` only applies to `run`"),
            )
            .exit();
    }

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        None => commands::run::run(&ctx, cli.run),
        Some(Command::Run(args)) => commands::run::run(&ctx, args),
        Some(Command::Steps(args)) => commands::steps::run(&ctx, args),
        Some(Command::Update(args)) => commands::update::run(&ctx, args),
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "bootstrap", &mut io::stdout());
            Ok(())
        }
    }
}
