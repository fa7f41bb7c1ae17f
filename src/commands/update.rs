//! Update command - re-run named steps regardless of their guards

use anyhow::{Result, bail};
use std::time::Instant;

use crate::Context as AppContext;
use crate::catalog::{Catalog, Provision};
use crate::cli::UpdateArgs;
use crate::config::AnswerDefaults;
use crate::paths::HostEnv;
use crate::progress::ConsoleProgress;
use crate::prompt::Answers;
use crate::ui;
use pipeline::RunOptions;

pub fn run(ctx: &AppContext, args: UpdateArgs) -> Result<()> {
    let (config, catalog) = super::load_sources(&args.source)?;

    let unknown = catalog.unknown(&args.steps);
    if !unknown.is_empty() {
        bail!(
            "Unknown step(s): {}. Run `bootstrap steps` to list them",
            unknown.join(", ")
        );
    }

    let flags = AnswerDefaults {
        email: args.email.clone(),
        name: args.name.clone(),
        ..AnswerDefaults::default()
    };
    let answers = Answers::resolve(&flags, &config.answers);
    if needs_git_identity(&catalog, &args.steps) {
        answers.require_git_identity()?;
    }

    let plan = catalog.plan_all().select(&args.steps);
    if !ctx.quiet {
        ui::header(&format!("Updating {}", args.steps.join(", ")));
    }

    let env = HostEnv::capture()?;
    let provision = Provision::new(super::host(args.dry_run), env)
        .with_git_identity(answers.email.as_str(), answers.name.as_str())
        .with_dry_run(args.dry_run);

    let started = Instant::now();
    let outcome = pipeline::execute(
        &plan,
        &provision,
        RunOptions { force: true },
        &mut ConsoleProgress::new(ctx.quiet),
    );

    super::run::finish(ctx, outcome, started.elapsed())
}

fn needs_git_identity(catalog: &Catalog, ids: &[String]) -> bool {
    catalog
        .recipes()
        .iter()
        .filter(|recipe| ids.contains(&recipe.id))
        .any(|recipe| recipe.mentions("GIT_EMAIL") || recipe.mentions("GIT_NAME"))
}
