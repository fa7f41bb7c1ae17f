//! Progress reporting hooks

/// Progress callback for execution
///
/// Implement this trait to receive progress updates during a run. Positions
/// are 1-based.
pub trait Progress {
    /// Called before a step's guard is evaluated
    fn on_step_start(&mut self, position: usize, total: usize, id: &str, description: &str);

    /// Called when the guard reported the step as already done
    fn on_step_skipped(&mut self, id: &str);

    /// Called when the install branch completed
    fn on_step_applied(&mut self, id: &str);

    /// Called when a tolerated step failed and the run continues
    fn on_step_tolerated(&mut self, id: &str, error: &anyhow::Error);

    /// Called when a fatal step failed, right before the run halts
    fn on_step_failed(&mut self, id: &str, error: &anyhow::Error);
}

/// No-op progress callback
pub struct NoProgress;

impl Progress for NoProgress {
    fn on_step_start(&mut self, _: usize, _: usize, _: &str, _: &str) {}
    fn on_step_skipped(&mut self, _: &str) {}
    fn on_step_applied(&mut self, _: &str) {}
    fn on_step_tolerated(&mut self, _: &str, _: &anyhow::Error) {}
    fn on_step_failed(&mut self, _: &str, _: &anyhow::Error) {}
}
