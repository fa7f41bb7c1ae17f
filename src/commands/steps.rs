//! Steps command - list the catalog

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::Context as AppContext;
use crate::catalog::Recipe;
use crate::cli::StepsArgs;
use crate::ui;

/// One catalog entry as printed by `steps --json`
#[derive(Debug, Serialize)]
struct StepView<'a> {
    id: &'a str,
    section: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    guard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    when: Option<String>,
    labels: &'a [String],
    tolerated: bool,
    actions: Vec<String>,
}

impl<'a> From<&'a Recipe> for StepView<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            id: &recipe.id,
            section: &recipe.section,
            description: &recipe.description,
            guard: recipe.guard.as_ref().map(ToString::to_string),
            when: recipe.when.map(|c| c.to_string()),
            labels: &recipe.labels,
            tolerated: recipe.policy == pipeline::FailurePolicy::Tolerated,
            actions: recipe.tasks.iter().map(|t| t.action.to_string()).collect(),
        }
    }
}

pub fn run(ctx: &AppContext, args: StepsArgs) -> Result<()> {
    let (_, catalog) = super::load_sources(&args.source)?;

    if args.json {
        let views: Vec<StepView<'_>> = catalog.recipes().iter().map(StepView::from).collect();
        let json = serde_json::to_string_pretty(&views).context("Failed to serialize steps")?;
        println!("{json}");
        return Ok(());
    }

    if catalog.is_empty() {
        ui::warn("The step catalog is empty");
        return Ok(());
    }

    let mut current: Option<&str> = None;
    for recipe in catalog.recipes() {
        if current != Some(recipe.section.as_str()) {
            ui::section(&recipe.section);
            current = Some(&recipe.section);
        }
        print_recipe(ctx, recipe);
    }

    if !ctx.quiet {
        println!();
        ui::info(&format!("{} steps", catalog.len()));
    }
    Ok(())
}

fn print_recipe(ctx: &AppContext, recipe: &Recipe) {
    let mut line = format!("  {}", recipe.id.bold());
    if let Some(when) = recipe.when {
        line.push_str(&format!(" {}", format!("[{when}]").yellow()));
    }
    if recipe.policy == pipeline::FailurePolicy::Tolerated {
        line.push_str(&format!(" {}", "(tolerated)".dimmed()));
    }
    println!("{line}");

    if recipe.description != recipe.id {
        ui::dim(&recipe.description);
    }

    if ctx.verbose > 0 {
        if let Some(guard) = &recipe.guard {
            ui::kv("skip if", &guard.to_string());
        }
        if !recipe.labels.is_empty() {
            ui::kv("installs", &recipe.labels.join(", "));
        }
        for task in &recipe.tasks {
            let suffix = if task.tolerate { " (tolerated)" } else { "" };
            ui::dim(&format!("  - {}{suffix}", task.action));
        }
    }
}
