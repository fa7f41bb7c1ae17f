//! Plan executor - runs steps strictly in order

use crate::error::Halt;
use crate::plan::Plan;
use crate::progress::Progress;
use crate::step::Step;
use crate::types::{FailurePolicy, RunOptions, RunSummary};

/// Execute a plan
///
/// For each step: when `force` is unset and the guard reports the step as
/// done, it is skipped; otherwise its install branch runs. A fatal
/// failure stops the run immediately and returns everything recorded so far
/// inside the [`Halt`]. A tolerated failure is logged and the run continues.
///
/// A guard that itself errors is treated like a failure of the step.
pub fn execute<C: ?Sized, P: Progress>(
    plan: &Plan<C>,
    ctx: &C,
    options: RunOptions,
    progress: &mut P,
) -> Result<RunSummary, Halt> {
    let mut summary = RunSummary::default();
    let total = plan.len();

    for (index, step) in plan.iter().enumerate() {
        let id = step.id();
        progress.on_step_start(index + 1, total, id, &step.description());

        match run_step(step, ctx, options) {
            Ok(true) => {
                log::debug!("{id}: applied");
                summary.record_applied(id, step.labels());
                progress.on_step_applied(id);
            }
            Ok(false) => {
                log::debug!("{id}: already present, skipping");
                summary.record_skipped(id);
                progress.on_step_skipped(id);
            }
            Err(error) => match step.policy() {
                FailurePolicy::Tolerated => {
                    log::error!("{id} failed, continuing: {error:#}");
                    progress.on_step_tolerated(id, &error);
                    summary.record_tolerated(id, &error);
                }
                FailurePolicy::Fatal => {
                    log::error!("{id} failed: {error:#}");
                    progress.on_step_failed(id, &error);
                    return Err(Halt {
                        step: id.to_string(),
                        error,
                        summary,
                    });
                }
            },
        }
    }

    Ok(summary)
}

/// Returns `Ok(true)` when the install branch ran, `Ok(false)` when skipped.
fn run_step<C: ?Sized>(step: &dyn Step<C>, ctx: &C, options: RunOptions) -> anyhow::Result<bool> {
    if !options.force && step.is_satisfied(ctx)? {
        return Ok(false);
    }
    step.apply(ctx)?;
    Ok(true)
}
