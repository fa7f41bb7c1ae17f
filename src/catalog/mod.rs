//! Step catalog: the ordered list of provisioning recipes
//!
//! The built-in catalog is embedded from `default.toml`; a config entry can
//! point at a replacement file with the same schema.

mod provision;
mod recipe;

pub use provision::Provision;
pub use recipe::Recipe;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use pipeline::{BoxedStep, Plan};

use crate::prompt::Answers;
use recipe::RecipeSpec;

const BUILTIN: &str = include_str!("default.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    steps: Vec<RecipeSpec>,
}

/// Validated, ordered recipes
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    /// The catalog shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN).context("Built-in step catalog is invalid")
    }

    /// Load a custom catalog file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read step catalog: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid step catalog: {}", path.display()))
    }

    /// The custom catalog when given, otherwise the built-in one
    pub fn load(custom: Option<&Path>) -> Result<Self> {
        match custom {
            Some(path) => {
                log::info!("Using step catalog {}", path.display());
                Self::from_file(path)
            }
            None => Self::builtin(),
        }
    }

    /// Parse and validate catalog TOML
    pub fn parse(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).context("Invalid TOML format")?;

        let mut seen = HashSet::new();
        let mut recipes = Vec::with_capacity(file.steps.len());
        for spec in file.steps {
            if !seen.insert(spec.id.clone()) {
                bail!("Duplicate step id `{}`", spec.id);
            }
            recipes.push(spec.into_recipe()?);
        }

        Ok(Self { recipes })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Ids of recipes absent from the catalog
    pub fn unknown<'a>(&self, ids: &'a [String]) -> Vec<&'a str> {
        ids.iter()
            .map(String::as_str)
            .filter(|id| !self.recipes.iter().any(|r| r.id == *id))
            .collect()
    }

    /// Plan of every recipe whose condition holds for `answers`
    pub fn plan_for<'h>(&self, answers: &Answers) -> Plan<Provision<'h>> {
        self.plan_where(|recipe| recipe.applies_to(answers))
    }

    /// Plan of every recipe, conditions ignored
    pub fn plan_all<'h>(&self) -> Plan<Provision<'h>> {
        self.plan_where(|_| true)
    }

    fn plan_where<'h>(&self, keep: impl Fn(&Recipe) -> bool) -> Plan<Provision<'h>> {
        self.recipes
            .iter()
            .filter(|recipe| keep(*recipe))
            .map(|recipe| Box::new(recipe.clone()) as BoxedStep<Provision<'h>>)
            .collect()
    }

    /// Ids of recipes in the plan for `answers` that reference `$var`
    pub fn mentioning<'c>(&'c self, var: &str, answers: &Answers) -> Vec<&'c str> {
        self.recipes
            .iter()
            .filter(|recipe| recipe.applies_to(answers) && recipe.mentions(var))
            .map(|recipe| recipe.id.as_str())
            .collect()
    }
}
