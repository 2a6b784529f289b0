//! Diagnostics reporting
//!
//! The analyzer reports what it observes through a [`Diagnostics`] value passed in
//! by the caller. [`TracingDiagnostics`] forwards observations to `tracing`;
//! [`NoopDiagnostics`] drops them.

use crate::config::AnalysisConfig;
use crate::histogram::HistogramSummary;
use crate::segmenter::RowBouts;
use crate::types::{BoutKind, Token};
use tracing::{debug, info};

/// Observation points of an analysis run. Every method defaults to doing nothing.
pub trait Diagnostics {
    /// Analysis is about to start on `source`
    fn analysis_started(&mut self, _config: &AnalysisConfig, _source: &str) {}

    /// The row source stopped early at the configured limit
    fn row_limit_reached(&mut self, _limit: usize) {}

    /// A data row was segmented; `index` counts data rows from zero
    fn row_segmented(&mut self, _index: usize, _bouts: &RowBouts<Token>) {}

    /// A row ended with `leftover` tokens that did not fill a bout
    fn row_truncated(&mut self, _index: usize, _leftover: usize) {}

    /// Total bouts of one kind collected over all rows
    fn bouts_collected(&mut self, _kind: BoutKind, _count: usize) {}

    /// A histogram was built and annotated; `rendered` is its text form
    fn tree_built(&mut self, _kind: BoutKind, _summary: &HistogramSummary, _rendered: &str) {}

    /// A bout table with `rows` rows was written
    fn bout_table_written(&mut self, _rows: usize, _destination: &str) {}
}

/// Diagnostics sink that ignores every observation
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {}

/// Diagnostics sink that emits `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics {
    merged: bool,
}

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose bout labels follow the merge setting of `config`
    pub fn for_config(config: &AnalysisConfig) -> Self {
        Self {
            merged: config.merge_adjacent,
        }
    }
}

impl Diagnostics for TracingDiagnostics {
    fn analysis_started(&mut self, config: &AnalysisConfig, source: &str) {
        self.merged = config.merge_adjacent;
        info!(
            "Creating pattern histograms beginning with {} bout in file: {}",
            config.start_phase.first_kind(),
            source
        );
        info!(
            "Stimulus bout length: {} Pause bout length: {}",
            config.stimulus_len, config.pause_len
        );
    }

    fn row_limit_reached(&mut self, limit: usize) {
        info!("Reached row limit of {} rows", limit);
    }

    fn row_segmented(&mut self, index: usize, bouts: &RowBouts<Token>) {
        let label = if self.merged { "Bout (merged)" } else { "Bout" };
        for bout in &bouts.bouts {
            let span = bout.span();
            debug!(
                row = index,
                "{}: {} start: {} bound end: {} {}",
                bout.kind.alias(),
                label,
                span.start,
                span.end,
                bout.tokens.join(",")
            );
        }
    }

    fn row_truncated(&mut self, index: usize, leftover: usize) {
        debug!(row = index, "Row ends with {} tokens short of a full bout", leftover);
    }

    fn bouts_collected(&mut self, kind: BoutKind, count: usize) {
        info!("Found {} {} bouts in total", count, kind);
    }

    fn tree_built(&mut self, kind: BoutKind, summary: &HistogramSummary, rendered: &str) {
        info!(
            nodes = summary.nodes,
            depth = summary.max_depth,
            "{} histogram:\n{}",
            kind,
            rendered
        );
    }

    fn bout_table_written(&mut self, rows: usize, destination: &str) {
        info!("Wrote {} bout rows to {}", rows, destination);
    }
}
