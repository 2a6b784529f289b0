//! boutstats - Behavior pattern histograms over stimulus/pause bout tables
//!
//! Each row of the input table records one subject over time. From a column
//! offset on, the columns alternate between stimulus and pause bouts of fixed
//! length. boutstats cuts every row into bouts, optionally merges adjacent equal
//! behaviors inside a bout, and counts the resulting behavior sequences in one
//! prefix tree per bout kind. Each tree node finally carries its share of the
//! count among its siblings.
//!
//! Pipeline: table → segmentation → normalization → histogram → percentage tree
//!
//! ## Modules
//!
//! - **Core**: [`segmenter`], [`normalizer`], [`histogram`], [`percentage`]
//! - **Collaborators**: [`reader`] for delimited input, [`encoder`] for reports,
//!   [`diagnostics`] for observation hooks, [`pipeline`] to run it all

pub mod config;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod histogram;
pub mod normalizer;
pub mod percentage;
pub mod pipeline;
pub mod reader;
pub mod segmenter;
pub mod types;

pub use config::AnalysisConfig;
pub use diagnostics::{Diagnostics, NoopDiagnostics, TracingDiagnostics};
pub use encoder::{render_tree, BoutReport, ReportEncoder};
pub use error::BoutError;
pub use histogram::{Histogram, HistogramBuilder, HistogramNode, HistogramSummary};
pub use normalizer::{merge_adjacent, pad_bout, BoutNormalizer};
pub use percentage::{annotate, AnnotatedNode, PercentageTree};
pub use pipeline::{analyze_str, BoutAnalysis, BoutAnalyzer, BoutTable};
pub use reader::{DelimitedReader, Table};
pub use segmenter::{segment_row, RowBouts, RowSegmenter};
pub use types::{Bout, BoutKind, StartPhase, Token};

/// boutstats version embedded in every report
pub const BOUTSTATS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "boutstats";
