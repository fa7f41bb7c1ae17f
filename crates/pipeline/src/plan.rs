//! Execution plan - an ordered list of steps

use crate::step::{BoxedStep, Step};

/// An ordered plan of steps
///
/// Steps run in insertion order; nothing is reordered or grouped.
pub struct Plan<C: ?Sized> {
    steps: Vec<BoxedStep<C>>,
}

impl<C: ?Sized> Plan<C> {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step
    pub fn push(&mut self, step: BoxedStep<C>) {
        self.steps.push(step);
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate steps in execution order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Step<C>> {
        self.steps.iter().map(as_dyn)
    }

    /// Filter plan to only include steps matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&dyn Step<C>) -> bool,
    {
        Self {
            steps: self
                .steps
                .into_iter()
                .filter(|s| predicate(s.as_ref()))
                .collect(),
        }
    }

    /// Keep steps whose section is in `only` (when non-empty) and not in `skip`
    pub fn retain_sections(self, only: &[String], skip: &[String]) -> Self {
        self.filter(|step| {
            let section = step.section();
            let included = only.is_empty() || only.iter().any(|s| s == section);
            included && !skip.iter().any(|s| s == section)
        })
    }

    /// Keep only the steps with the given ids, in plan order
    pub fn select(self, ids: &[String]) -> Self {
        self.filter(|step| ids.iter().any(|id| id == step.id()))
    }
}

fn as_dyn<C: ?Sized>(step: &BoxedStep<C>) -> &dyn Step<C> {
    step.as_ref()
}

impl<C: ?Sized> Default for Plan<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> FromIterator<BoxedStep<C>> for Plan<C> {
    fn from_iter<I: IntoIterator<Item = BoxedStep<C>>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        id: &'static str,
        section: &'static str,
    }

    impl Step<()> for Named {
        fn id(&self) -> &str {
            self.id
        }

        fn section(&self) -> &str {
            self.section
        }

        fn apply(&self, _ctx: &()) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn sample() -> Plan<()> {
        [
            ("wget", "packages"),
            ("oh-my-zsh", "shell"),
            ("neovim", "editor"),
            ("neovim-plugins", "editor"),
        ]
        .into_iter()
        .map(|(id, section)| Box::new(Named { id, section }) as BoxedStep<()>)
        .collect()
    }

    fn ids(plan: &Plan<()>) -> Vec<&str> {
        plan.iter().map(|step| step.id()).collect()
    }

    #[test]
    fn test_retain_sections_only() {
        let plan = sample().retain_sections(&["editor".into()], &[]);
        assert_eq!(ids(&plan), vec!["neovim", "neovim-plugins"]);
    }

    #[test]
    fn test_retain_sections_skip() {
        let plan = sample().retain_sections(&[], &["editor".into(), "shell".into()]);
        assert_eq!(ids(&plan), vec!["wget"]);
    }

    #[test]
    fn test_retain_sections_empty_keeps_all() {
        assert_eq!(sample().retain_sections(&[], &[]).len(), 4);
    }

    #[test]
    fn test_select_preserves_plan_order() {
        let plan = sample().select(&["neovim-plugins".into(), "wget".into()]);
        assert_eq!(ids(&plan), vec!["wget", "neovim-plugins"]);
    }
}
