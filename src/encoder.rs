//! Report encoding
//!
//! Encodes an analysis into a JSON report and renders annotated trees as
//! indented text.

use crate::config::AnalysisConfig;
use crate::error::BoutError;
use crate::histogram::HistogramSummary;
use crate::percentage::PercentageTree;
use crate::pipeline::BoutAnalysis;
use crate::types::{BoutKind, Token};
use crate::{BOUTSTATS_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Where the numbers came from and when they were computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProvenance {
    pub source: String,
    pub computed_at_utc: String,
}

/// One annotated tree with its totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHistogram {
    pub kind: BoutKind,
    pub bouts: usize,
    pub summary: HistogramSummary,
    pub tree: PercentageTree<Token>,
}

/// Full analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoutReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub config: AnalysisConfig,
    pub rows: usize,
    /// Starting phase first
    pub histograms: Vec<ReportHistogram>,
}

/// Report encoder
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode an analysis of `source` into a report
    pub fn encode(&self, analysis: &BoutAnalysis, source: &str) -> BoutReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: BOUTSTATS_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = ReportProvenance {
            source: source.to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
        };

        let histograms = analysis
            .trees_in_order()
            .into_iter()
            .map(|(kind, tree)| {
                let (bouts, summary) = match kind {
                    BoutKind::Stimulus => (analysis.stimulus_bouts, analysis.stimulus_summary),
                    BoutKind::Pause => (analysis.pause_bouts, analysis.pause_summary),
                };
                ReportHistogram {
                    kind,
                    bouts,
                    summary,
                    tree: tree.clone(),
                }
            })
            .collect();

        BoutReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            provenance,
            config: analysis.config.clone(),
            rows: analysis.rows,
            histograms,
        }
    }

    /// Encode to a JSON string
    pub fn encode_to_json(
        &self,
        analysis: &BoutAnalysis,
        source: &str,
        pretty: bool,
    ) -> Result<String, BoutError> {
        let report = self.encode(analysis, source);
        let json = if pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }

    /// Human-readable rendering of both trees, starting phase first
    pub fn encode_to_text(&self, analysis: &BoutAnalysis, source: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Source: {source}");
        let _ = writeln!(
            out,
            "Rows: {}  Stimulus bouts: {}  Pause bouts: {}",
            analysis.rows, analysis.stimulus_bouts, analysis.pause_bouts
        );
        for (kind, tree) in analysis.trees_in_order() {
            let _ = writeln!(out, "\n{} histogram:", capitalize(&kind.to_string()));
            if tree.is_empty() {
                let _ = writeln!(out, "  (no bouts)");
            } else {
                out.push_str(&render_tree(tree));
            }
        }
        out
    }
}

/// Render a tree one node per line: indented token, count and percentage
pub fn render_tree(tree: &PercentageTree<Token>) -> String {
    let mut out = String::new();
    tree.walk(|depth, token, node| {
        let indent = "  ".repeat(depth + 1);
        let _ = writeln!(
            out,
            "{indent}{token}  {count}  {percent:.1}%",
            count = node.count,
            percent = node.percent * 100.0
        );
    });
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
