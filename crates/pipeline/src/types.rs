//! Core types for step execution

/// What happens to the run when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the whole run
    #[default]
    Fatal,
    /// Log the error and continue with the next step
    Tolerated,
}

/// Options for execution
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Run install branches even when the guard says "already present"
    pub force: bool,
}

/// Summary of a run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps whose install branch ran to completion
    pub applied: Vec<String>,
    /// Steps skipped because their guard was satisfied
    pub skipped: Vec<String>,
    /// Steps that failed under a tolerated policy: (step id, error)
    pub tolerated: Vec<(String, String)>,
    /// Labels of everything installed, for end-of-run reporting
    pub installed: Vec<String>,
}

impl RunSummary {
    /// Record a step whose install branch ran
    pub fn record_applied(&mut self, id: &str, labels: Vec<String>) {
        self.applied.push(id.to_string());
        self.installed.extend(labels);
    }

    /// Record a step skipped by its guard
    pub fn record_skipped(&mut self, id: &str) {
        self.skipped.push(id.to_string());
    }

    /// Record a tolerated failure
    pub fn record_tolerated(&mut self, id: &str, error: &anyhow::Error) {
        self.tolerated.push((id.to_string(), format!("{error:#}")));
    }

    /// Total number of steps that were visited
    pub fn total(&self) -> usize {
        self.applied.len() + self.skipped.len() + self.tolerated.len()
    }

    /// Whether any step failed (tolerated failures included)
    pub fn has_failures(&self) -> bool {
        !self.tolerated.is_empty()
    }
}
