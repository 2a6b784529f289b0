//! boutstats CLI - Command-line interface for bout pattern histograms
//!
//! Commands:
//! - analyze: Build stimulus and pause pattern histograms from a bout table
//! - inspect: Show how a bout layout tiles each row of a table

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use boutstats::{
    AnalysisConfig, BoutAnalyzer, BoutError, BoutKind, Diagnostics, ReportEncoder, RowSegmenter,
    StartPhase, Table, TracingDiagnostics, BOUTSTATS_VERSION,
};

/// boutstats - Behavior pattern histograms over stimulus/pause bout tables
#[derive(Parser)]
#[command(name = "boutstats")]
#[command(version = BOUTSTATS_VERSION)]
#[command(about = "Calculate behavior pattern histograms in stimulus and pause bouts", long_about = None)]
struct Cli {
    /// Log level
    #[arg(short, long, global = true, value_enum, default_value = "info")]
    log: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build pattern histograms for stimulus and pause bouts
    Analyze {
        /// Number of stimulus columns per bout
        s: usize,

        /// Number of pause columns per bout
        p: usize,

        /// Bout table to load (use - for stdin)
        file: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Do not combine adjacent equal behaviors in a bout
        #[arg(long)]
        no_merge: bool,

        /// Limit the number of data rows read from the input
        #[arg(short = 'n', long)]
        max_rows: Option<usize>,

        /// Write the (merged and padded) bouts to a new delimited file
        #[arg(long)]
        bout_file: Option<PathBuf>,

        /// Placeholder used to pad merged bouts in the bout file
        #[arg(long)]
        pad_token: Option<String>,

        /// Load settings from a JSON configuration file (flags take precedence)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file path (use - for stdout)
        #[arg(long, default_value = "-")]
        output: PathBuf,
    },

    /// Show per-row column counts and how many full bouts a layout yields
    Inspect {
        /// Bout table to load (use - for stdin)
        file: PathBuf,

        /// Number of stimulus columns per bout
        #[arg(short = 's', long = "stimulus-len", default_value = "1")]
        s: usize,

        /// Number of pause columns per bout
        #[arg(short = 'p', long = "pause-len", default_value = "1")]
        p: usize,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Output report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Table layout flags shared by all commands
#[derive(clap::Args)]
struct LayoutArgs {
    /// The first bout of every row is a stimulus bout
    #[arg(long)]
    stimulus_first: bool,

    /// The first bout of every row is a pause bout (overrides a config file)
    #[arg(long, conflicts_with = "stimulus_first")]
    pause_first: bool,

    /// Column offset to the first bout
    #[arg(short, long)]
    offset: Option<usize>,

    /// Column delimiter
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Number of header rows
    #[arg(long)]
    header_rows: Option<usize>,
}

impl LayoutArgs {
    /// Phase requested on the command line, if any
    fn start_phase(&self) -> Option<StartPhase> {
        (self.stimulus_first || self.pause_first)
            .then(|| StartPhase::from_stimulus_first(self.stimulus_first))
    }

    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(start_phase) = self.start_phase() {
            config.start_phase = start_phase;
        }
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        if let Some(delimiter) = &self.delimiter {
            config.delimiter = delimiter.clone();
        }
        if let Some(header_rows) = self.header_rows {
            config.header_rows = header_rows;
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Indented text trees
    Text,
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log.directive())),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), BoutCliError> {
    match cli.command {
        Commands::Analyze {
            s,
            p,
            file,
            layout,
            no_merge,
            max_rows,
            bout_file,
            pad_token,
            config,
            format,
            output,
        } => {
            let mut analysis_config = match &config {
                Some(path) => AnalysisConfig::from_json(&fs::read_to_string(path)?)?,
                None => AnalysisConfig::default(),
            };
            analysis_config.stimulus_len = s;
            analysis_config.pause_len = p;
            layout.apply(&mut analysis_config);
            if no_merge {
                analysis_config.merge_adjacent = false;
            }
            if max_rows.is_some() {
                analysis_config.max_rows = max_rows;
            }
            if let Some(pad_token) = pad_token {
                analysis_config.pad_token = pad_token;
            }

            cmd_analyze(
                analysis_config,
                &file,
                bout_file.as_deref(),
                format,
                &output,
            )
        }

        Commands::Inspect {
            file,
            s,
            p,
            layout,
            json,
        } => {
            let mut config = AnalysisConfig::new(s, p);
            layout.apply(&mut config);
            cmd_inspect(config, &file, json)
        }
    }
}

fn cmd_analyze(
    config: AnalysisConfig,
    input: &Path,
    bout_file: Option<&Path>,
    format: OutputFormat,
    output: &Path,
) -> Result<(), BoutCliError> {
    let analyzer = BoutAnalyzer::new(config)?.with_bout_table(bout_file.is_some());
    let mut diagnostics = TracingDiagnostics::for_config(analyzer.config());
    let source = source_name(input);

    diagnostics.analysis_started(analyzer.config(), &source);
    let table = read_table(&analyzer, input)?;
    let analysis = analyzer.analyze_table(&table, &mut diagnostics);

    if let (Some(path), Some(bout_table)) = (bout_file, analysis.bout_table.as_ref()) {
        info!("Writing bout file");
        fs::write(path, bout_table.to_delimited(&analyzer.config().delimiter))?;
        diagnostics.bout_table_written(bout_table.len(), &path.display().to_string());
    }

    let encoder = ReportEncoder::new();
    let output_data = match format {
        OutputFormat::Text => encoder.encode_to_text(&analysis, &source),
        OutputFormat::Json => encoder.encode_to_json(&analysis, &source, false)? + "\n",
        OutputFormat::JsonPretty => encoder.encode_to_json(&analysis, &source, true)? + "\n",
    };

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_inspect(config: AnalysisConfig, input: &Path, json: bool) -> Result<(), BoutCliError> {
    let analyzer = BoutAnalyzer::new(config)?;
    let table = read_table(&analyzer, input)?;
    let segmenter = RowSegmenter::from_config(analyzer.config());

    let rows: Vec<RowInspection> = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let bouts = segmenter.segment(row);
            RowInspection {
                index,
                columns: row.len(),
                stimulus_bouts: bouts.stimuli().count(),
                pause_bouts: bouts.pauses().count(),
                leftover: bouts.leftover,
            }
        })
        .collect();

    let report = InspectReport {
        source: source_name(input),
        offset: segmenter.offset(),
        stimulus_len: segmenter.length_of(BoutKind::Stimulus),
        pause_len: segmenter.length_of(BoutKind::Pause),
        first_bout: analyzer.config().start_phase.first_kind(),
        header_rows: table.header_rows.len(),
        data_rows: rows.len(),
        uneven_rows: rows.iter().filter(|r| r.leftover > 0).count(),
        rows,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Inspection Report");
        println!("=================");
        println!("Source:       {}", report.source);
        println!(
            "Layout:       offset {}, {} bout first, S={} P={}",
            report.offset, report.first_bout, report.stimulus_len, report.pause_len
        );
        println!("Header rows:  {}", report.header_rows);
        println!("Data rows:    {}", report.data_rows);
        println!("Uneven rows:  {}", report.uneven_rows);
        println!();
        println!("{:>6} {:>8} {:>9} {:>6} {:>9}", "row", "columns", "stimulus", "pause", "leftover");
        for row in &report.rows {
            println!(
                "{:>6} {:>8} {:>9} {:>6} {:>9}",
                row.index, row.columns, row.stimulus_bouts, row.pause_bouts, row.leftover
            );
        }
    }

    Ok(())
}

fn read_table(analyzer: &BoutAnalyzer, input: &Path) -> Result<Table, BoutCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            warn!("Reading bout table from an interactive terminal; end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(analyzer.reader().parse_str(&buffer)?)
    } else {
        Ok(analyzer.reader().read_path(input)?)
    }
}

fn source_name(input: &Path) -> String {
    if input.to_string_lossy() == "-" {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}

// Error types

#[derive(Debug)]
enum BoutCliError {
    Io(io::Error),
    Analysis(BoutError),
    Json(serde_json::Error),
}

impl From<io::Error> for BoutCliError {
    fn from(e: io::Error) -> Self {
        BoutCliError::Io(e)
    }
}

impl From<BoutError> for BoutCliError {
    fn from(e: BoutError) -> Self {
        BoutCliError::Analysis(e)
    }
}

impl From<serde_json::Error> for BoutCliError {
    fn from(e: serde_json::Error) -> Self {
        BoutCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<BoutCliError> for CliError {
    fn from(e: BoutCliError) -> Self {
        match e {
            BoutCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            BoutCliError::Analysis(BoutError::InvalidConfig(msg)) => CliError {
                code: "INVALID_CONFIG".to_string(),
                message: msg,
                hint: Some("Bout lengths must be positive and the delimiter non-empty".to_string()),
            },
            BoutCliError::Analysis(BoutError::ParseError(msg)) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check the delimiter and quoting of the input table".to_string()),
            },
            BoutCliError::Analysis(e) => CliError {
                code: "ANALYSIS_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            BoutCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax of the configuration file".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct InspectReport {
    source: String,
    offset: usize,
    stimulus_len: usize,
    pause_len: usize,
    first_bout: BoutKind,
    header_rows: usize,
    data_rows: usize,
    uneven_rows: usize,
    rows: Vec<RowInspection>,
}

#[derive(serde::Serialize)]
struct RowInspection {
    index: usize,
    columns: usize,
    stimulus_bouts: usize,
    pause_bouts: usize,
    leftover: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn analyze_layout(args: &[&str]) -> LayoutArgs {
        let mut argv = vec!["boutstats", "analyze", "2", "1", "table.csv"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Analyze { layout, .. } => layout,
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pause_first_overrides_config_file() {
        let mut config =
            AnalysisConfig::from_json(r#"{"stimulus_len": 2, "pause_len": 1, "start_phase": "stimulus_first"}"#)
                .unwrap();
        analyze_layout(&["--pause-first"]).apply(&mut config);
        assert_eq!(config.start_phase, StartPhase::PauseFirst);

        analyze_layout(&["--stimulus-first"]).apply(&mut config);
        assert_eq!(config.start_phase, StartPhase::StimulusFirst);
    }

    #[test]
    fn test_phase_flags_absent_keep_config() {
        let mut config = AnalysisConfig::new(2, 1);
        config.start_phase = StartPhase::StimulusFirst;
        analyze_layout(&[]).apply(&mut config);
        assert_eq!(config.start_phase, StartPhase::StimulusFirst);
    }

    #[test]
    fn test_phase_flags_conflict() {
        let result = Cli::try_parse_from([
            "boutstats",
            "analyze",
            "2",
            "1",
            "table.csv",
            "--stimulus-first",
            "--pause-first",
        ]);
        assert!(result.is_err());
    }
}
