//! Console progress for step runs.

use pipeline::Progress;

use crate::ui;

/// Prints a numbered banner per step and a one-line outcome
pub struct ConsoleProgress {
    quiet: bool,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Progress for ConsoleProgress {
    fn on_step_start(&mut self, position: usize, total: usize, _id: &str, description: &str) {
        if !self.quiet {
            ui::step(position, total, description);
        }
    }

    fn on_step_skipped(&mut self, id: &str) {
        if !self.quiet {
            ui::dim(&format!("{id} already present, skipping"));
        }
    }

    fn on_step_applied(&mut self, id: &str) {
        if !self.quiet {
            ui::success(id);
        }
    }

    fn on_step_tolerated(&mut self, id: &str, error: &anyhow::Error) {
        ui::warn(&format!("{id} failed, continuing: {error:#}"));
    }

    fn on_step_failed(&mut self, id: &str, error: &anyhow::Error) {
        ui::error(&format!("{id} failed: {error:#}"));
    }
}
