//! Run failure

use crate::types::RunSummary;

/// A fatal step failed; no later step ran
#[derive(Debug, thiserror::Error)]
#[error("step `{step}` failed: {}", render(.error))]
pub struct Halt {
    /// Id of the failing step
    pub step: String,
    /// The step's error
    pub error: anyhow::Error,
    /// Everything recorded before the failure
    pub summary: RunSummary,
}

fn render(error: &anyhow::Error) -> String {
    format!("{error:#}")
}
