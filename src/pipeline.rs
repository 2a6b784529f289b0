//! Analysis pipeline orchestration
//!
//! Runs rows through segmentation, normalization, histogram construction and
//! percentage annotation, producing one annotated tree per bout kind.
//!
//! Pipeline: Table → Segmenter → Normalizer → Histogram builders → Annotator

use crate::config::AnalysisConfig;
use crate::diagnostics::{Diagnostics, NoopDiagnostics};
use crate::encoder::render_tree;
use crate::error::BoutError;
use crate::histogram::{HistogramBuilder, HistogramSummary};
use crate::normalizer::BoutNormalizer;
use crate::percentage::{annotate, PercentageTree};
use crate::reader::{DelimitedReader, Table};
use crate::segmenter::{RowBouts, RowSegmenter};
use crate::types::{BoutKind, Token};
use std::path::Path;

/// Normalized bouts of every input row, concatenated back in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoutTable {
    pub rows: Vec<Vec<Token>>,
}

impl BoutTable {
    /// Join each row with `delimiter`; every row ends with a newline
    pub fn to_delimited(&self, delimiter: &str) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.join(delimiter));
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of one analysis run
#[derive(Debug, Clone)]
pub struct BoutAnalysis {
    /// Configuration the run used
    pub config: AnalysisConfig,
    /// Data rows analyzed
    pub rows: usize,
    pub stimulus_bouts: usize,
    pub pause_bouts: usize,
    pub stimulus: PercentageTree<Token>,
    pub pause: PercentageTree<Token>,
    pub stimulus_summary: HistogramSummary,
    pub pause_summary: HistogramSummary,
    /// Present when bout collection was requested
    pub bout_table: Option<BoutTable>,
}

impl BoutAnalysis {
    /// Annotated tree of one bout kind
    pub fn tree(&self, kind: BoutKind) -> &PercentageTree<Token> {
        match kind {
            BoutKind::Stimulus => &self.stimulus,
            BoutKind::Pause => &self.pause,
        }
    }

    /// Both trees, the configured starting phase first
    pub fn trees_in_order(&self) -> [(BoutKind, &PercentageTree<Token>); 2] {
        let first = self.config.start_phase.first_kind();
        let second = first.flipped();
        [(first, self.tree(first)), (second, self.tree(second))]
    }
}

/// Analyzer bound to one validated configuration.
pub struct BoutAnalyzer {
    config: AnalysisConfig,
    segmenter: RowSegmenter,
    collect_bout_table: bool,
}

impl BoutAnalyzer {
    /// Create an analyzer, rejecting unusable configurations
    pub fn new(config: AnalysisConfig) -> Result<Self, BoutError> {
        config.validate()?;
        let segmenter = RowSegmenter::from_config(&config);
        Ok(Self {
            config,
            segmenter,
            collect_bout_table: false,
        })
    }

    /// Also collect the reconstructed bout table
    pub fn with_bout_table(mut self, collect: bool) -> Self {
        self.collect_bout_table = collect;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Reader matching this analyzer's table format
    pub fn reader(&self) -> DelimitedReader {
        DelimitedReader::from_config(&self.config)
    }

    /// Read and analyze a file
    pub fn analyze_path(
        &self,
        path: &Path,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<BoutAnalysis, BoutError> {
        diagnostics.analysis_started(&self.config, &path.display().to_string());
        let table = self.reader().read_path(path)?;
        Ok(self.analyze_table(&table, diagnostics))
    }

    /// Analyze an already parsed table
    pub fn analyze_table(&self, table: &Table, diagnostics: &mut dyn Diagnostics) -> BoutAnalysis {
        if let Some(limit) = table.truncated_at {
            diagnostics.row_limit_reached(limit);
        }
        self.analyze_rows(&table.rows, diagnostics)
    }

    /// Analyze data rows (header rows already removed)
    pub fn analyze_rows(
        &self,
        rows: &[Vec<Token>],
        diagnostics: &mut dyn Diagnostics,
    ) -> BoutAnalysis {
        let merge = self.config.merge_adjacent;
        let pad = &self.config.pad_token;

        let mut stimulus_builder = HistogramBuilder::new();
        let mut pause_builder = HistogramBuilder::new();
        let mut stimulus_bouts = 0;
        let mut pause_bouts = 0;
        let mut bout_table = self.collect_bout_table.then(BoutTable::default);

        for (index, row) in rows.iter().enumerate() {
            let segmented = self.segmenter.segment(row);
            if segmented.leftover > 0 {
                diagnostics.row_truncated(index, segmented.leftover);
            }

            let normalized: Vec<_> = segmented
                .bouts
                .into_iter()
                .map(|bout| BoutNormalizer::normalize(bout, merge))
                .collect();

            let mut table_row = Vec::new();
            for bout in &normalized {
                match bout.kind {
                    BoutKind::Stimulus => {
                        stimulus_builder.insert(&bout.tokens);
                        stimulus_bouts += 1;
                    }
                    BoutKind::Pause => {
                        pause_builder.insert(&bout.tokens);
                        pause_bouts += 1;
                    }
                }
                if bout_table.is_some() {
                    table_row.extend(BoutNormalizer::padded(bout, pad));
                }
            }

            diagnostics.row_segmented(
                index,
                &RowBouts {
                    bouts: normalized,
                    consumed_end: segmented.consumed_end,
                    leftover: segmented.leftover,
                },
            );

            if let Some(table) = bout_table.as_mut() {
                table.rows.push(table_row);
            }
        }

        diagnostics.bouts_collected(BoutKind::Stimulus, stimulus_bouts);
        diagnostics.bouts_collected(BoutKind::Pause, pause_bouts);

        let stimulus_histogram = stimulus_builder.build();
        let pause_histogram = pause_builder.build();
        let stimulus = annotate(&stimulus_histogram);
        let pause = annotate(&pause_histogram);
        let stimulus_summary = stimulus_histogram.summary();
        let pause_summary = pause_histogram.summary();

        let analysis = BoutAnalysis {
            config: self.config.clone(),
            rows: rows.len(),
            stimulus_bouts,
            pause_bouts,
            stimulus,
            pause,
            stimulus_summary,
            pause_summary,
            bout_table,
        };

        for (kind, tree) in analysis.trees_in_order() {
            let summary = match kind {
                BoutKind::Stimulus => &analysis.stimulus_summary,
                BoutKind::Pause => &analysis.pause_summary,
            };
            diagnostics.tree_built(kind, summary, &render_tree(tree));
        }

        analysis
    }
}

/// Analyze delimited text in one call (stateless, no diagnostics).
///
/// # Example
/// ```
/// use boutstats::{analyze_str, AnalysisConfig, StartPhase};
///
/// let mut config = AnalysisConfig::new(2, 1);
/// config.offset = 1;
/// config.start_phase = StartPhase::StimulusFirst;
///
/// let analysis = analyze_str("id1;A;A;B;X;X\n", config).unwrap();
/// assert_eq!(analysis.stimulus_bouts, 2);
/// assert_eq!(analysis.pause_bouts, 1);
/// ```
pub fn analyze_str(text: &str, config: AnalysisConfig) -> Result<BoutAnalysis, BoutError> {
    let analyzer = BoutAnalyzer::new(config)?;
    let table = analyzer.reader().parse_str(text)?;
    Ok(analyzer.analyze_table(&table, &mut NoopDiagnostics))
}
