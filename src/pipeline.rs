use std::path::PathBuf;
use tracing::{info, warn};

use crate::{
    config::OutputPolicy,
    error::Result,
    process::{self, utils::looks_like_csv},
};

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub policy: OutputPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub tracks_read: usize,
    pub tracks_written: usize,
    pub rows_written: usize,
}

/// Read, compute, sort, then write. Nothing touches the output path until
/// every ratio has been computed.
#[tracing::instrument(level = "info", skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub fn run(config: &RunConfig) -> Result<RunReport> {
    if !looks_like_csv(&config.input) {
        warn!(path = %config.input.display(), "input must be csv");
    }
    if !looks_like_csv(&config.output) {
        warn!(path = %config.output.display(), "output must be csv");
    }

    let table = process::load_track_table(&config.input)?;
    let summary = process::compute_ratios(&table)?;
    let sorted = process::sort_by_ratio(summary.points);

    let rows_written = process::write_output_file(
        &config.output,
        &table,
        &sorted,
        summary.max_size_in_track,
        &config.policy,
    )?;

    let report = RunReport {
        tracks_read: table.tracks.len(),
        tracks_written: sorted.len(),
        rows_written,
    };
    info!(?report, "done");
    Ok(report)
}
