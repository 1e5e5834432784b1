// gridcompare/src/pipeline/batch.rs

use super::errors::PipelineError;
use super::run_comparison;
use super::settings::ComparisonSettings;
use crate::compare::ComparisonResult;
use crate::grid::Grid;
use humantime::format_duration;
use log::{info, warn};
use rayon::prelude::*;
use std::time::Instant;

/// One named pair of grids to compare.
#[derive(Clone, Debug)]
pub struct ComparisonJob {
    pub label: String,
    pub grid_a: Grid,
    pub grid_b: Grid,
    pub settings: ComparisonSettings,
}

impl ComparisonJob {
    pub fn new(
        label: impl Into<String>,
        grid_a: Grid,
        grid_b: Grid,
        settings: ComparisonSettings,
    ) -> Self {
        Self {
            label: label.into(),
            grid_a,
            grid_b,
            settings,
        }
    }
}

/// Run independent comparisons in parallel. Results come back in job order
/// and a failing job does not stop the others.
pub fn run_batch(jobs: &[ComparisonJob]) -> Vec<Result<ComparisonResult, PipelineError>> {
    let start = Instant::now();
    info!("Running {} comparisons", jobs.len());
    let results: Vec<_> = jobs
        .par_iter()
        .map(|job| {
            let result = run_comparison(&job.grid_a, &job.grid_b, &job.settings);
            if let Err(e) = &result {
                warn!("Comparison {} failed: {}", job.label, e);
            }
            result
        })
        .collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        "Finished {} comparisons ({} failed) in {}",
        jobs.len(),
        failed,
        format_duration(start.elapsed())
    );
    results
}
