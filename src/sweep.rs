//! Armor-class sweep: one batch per armor class, stepping the target up by one between batches.

use serde::Serialize;
use thiserror::Error;

use crate::combat::analysis::{summarize, StatsError, SummaryStatistics};
use crate::combat::rng::derive_seed;
use crate::parallel::runner::TrialRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    /// Extra batches after the first; `steps = 0` runs the starting armor class only.
    pub steps: u32,
    pub trials: usize,
    pub seed: u64,
}

/// Rows reserved up front; longer sweeps grow the report as they go.
const PREALLOCATED_ROWS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SweepError {
    #[error("armor class {start} plus {steps} step(s) overflows")]
    ArmorClassOverflow { start: i32, steps: u32 },
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// One report line: a batch summary at a given armor class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRow {
    pub armor_class: i32,
    #[serde(flatten)]
    pub summary: SummaryStatistics,
}

pub fn run_sweep(
    runner: &TrialRunner<'_>,
    start_armor_class: i32,
    options: SweepOptions,
) -> Result<Vec<SweepRow>, SweepError> {
    let overflow = SweepError::ArmorClassOverflow {
        start: start_armor_class,
        steps: options.steps,
    };
    i32::try_from(options.steps)
        .ok()
        .and_then(|steps| start_armor_class.checked_add(steps))
        .ok_or(overflow)?;

    let capacity = (options.steps as usize).saturating_add(1).min(PREALLOCATED_ROWS);
    let mut rows = Vec::with_capacity(capacity);
    for step in 0..=options.steps {
        // Bounded by the check above.
        let armor_class = start_armor_class + step as i32;
        let batch_seed = derive_seed(options.seed, armor_class as u64);
        let rounds = runner.run(armor_class, options.trials, batch_seed);
        let summary = summarize(&rounds)?;
        tracing::info!(
            armor_class,
            hit = summary.hit_percentage,
            crit = summary.crit_percentage,
            dpr = summary.damage_per_round,
            "batch summarized"
        );
        rows.push(SweepRow {
            armor_class,
            summary,
        });
    }
    Ok(rows)
}
