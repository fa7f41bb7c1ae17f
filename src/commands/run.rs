//! Run command - provision the machine from the step catalog

use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::Context as AppContext;
use crate::catalog::{Catalog, Provision};
use crate::cli::RunArgs;
use crate::paths::HostEnv;
use crate::progress::ConsoleProgress;
use crate::prompt::{self, Answers};
use crate::ui;
use pipeline::{Halt, RunOptions, RunSummary};

pub fn run(ctx: &AppContext, args: RunArgs) -> Result<()> {
    if !ctx.quiet {
        ui::banner();
    }

    let (config, catalog) = super::load_sources(&args.source)?;
    let env = HostEnv::capture()?;

    let mut answers = Answers::resolve(&args.answer_flags(), &config.answers);
    if !args.yes && prompt::can_prompt() {
        answers = prompt::ask(answers)?;
    }

    warn_unknown_sections(&catalog, &args.only);
    warn_unknown_sections(&catalog, &args.skip);

    let plan = catalog
        .plan_for(&answers)
        .retain_sections(&args.only, &args.skip);

    if plan.is_empty() {
        ui::success("Nothing to do - no steps selected");
        return Ok(());
    }

    if plan
        .iter()
        .any(|step| needs_git_identity(&catalog, &answers, step.id()))
    {
        answers.require_git_identity()?;
    }

    if !ctx.quiet {
        ui::header("Provisioning");
        ui::kv("steps", &plan.len().to_string());
        ui::kv("desktop", yes_no(answers.desktop));
        ui::kv("wsl", yes_no(answers.wsl));
        if ctx.verbose > 0 {
            ui::kv("home", &env.home.display().to_string());
            ui::kv("shell", &env.shell);
        }
        if args.force {
            ui::kv("mode", &"force".yellow().to_string());
        }
        if args.dry_run {
            ui::kv("mode", &"dry run".yellow().to_string());
        }
    }

    let provision = Provision::new(super::host(args.dry_run), env)
        .with_git_identity(answers.email.as_str(), answers.name.as_str())
        .with_dry_run(args.dry_run);

    let started = Instant::now();
    let outcome = pipeline::execute(
        &plan,
        &provision,
        RunOptions { force: args.force },
        &mut ConsoleProgress::new(ctx.quiet),
    );

    finish(ctx, outcome, started.elapsed())
}

/// Print the end-of-run report and turn a halt into the command's error
pub(crate) fn finish(
    ctx: &AppContext,
    outcome: std::result::Result<RunSummary, Halt>,
    elapsed: Duration,
) -> Result<()> {
    match outcome {
        Ok(summary) => {
            report(ctx, &summary, elapsed);
            if !ctx.quiet {
                ui::success(&format!("Done in {}", ui::format_duration(elapsed)));
            }
            Ok(())
        }
        Err(halt) => {
            if ctx.quiet {
                ui::kv("installed", &ui::format_list(&halt.summary.installed));
            }
            report(ctx, &halt.summary, elapsed);
            ui::error(&format!(
                "Stopped at `{}`; later steps did not run",
                halt.step
            ));
            Err(halt.into())
        }
    }
}

fn report(ctx: &AppContext, summary: &RunSummary, elapsed: Duration) {
    if ctx.quiet {
        return;
    }

    ui::header(&format!("Summary ({} steps)", summary.total()));
    ui::kv("applied", &summary.applied.len().to_string());
    ui::kv("skipped", &summary.skipped.len().to_string());
    ui::kv("elapsed", &ui::format_duration(elapsed));
    ui::kv("installed", &ui::format_list(&summary.installed));

    if summary.has_failures() {
        ui::section("Failures tolerated");
        for (id, error) in &summary.tolerated {
            ui::warn(&format!("{id}: {error}"));
        }
    }
}

fn needs_git_identity(catalog: &Catalog, answers: &Answers, id: &str) -> bool {
    ["GIT_EMAIL", "GIT_NAME"]
        .iter()
        .any(|var| catalog.mentioning(var, answers).contains(&id))
}

fn warn_unknown_sections(catalog: &Catalog, requested: &[String]) {
    let known: BTreeSet<&str> = catalog.recipes().iter().map(|r| r.section.as_str()).collect();
    for section in requested {
        if !known.contains(section.as_str()) {
            ui::warn(&format!("Unknown section `{section}`"));
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
