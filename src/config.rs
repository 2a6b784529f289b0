//! Analysis configuration
//!
//! Bout layout parameters consumed by the core plus the table-format settings
//! consumed by the row source and the exporters.

use crate::error::BoutError;
use crate::types::StartPhase;
use serde::{Deserialize, Serialize};

/// Default column delimiter
pub const DEFAULT_DELIMITER: &str = ";";

/// Default placeholder appended to merged bouts on export
pub const DEFAULT_PAD_TOKEN: &str = "0";

/// Configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of columns in a stimulus bout
    pub stimulus_len: usize,
    /// Number of columns in a pause bout
    pub pause_len: usize,
    /// Column index of the first bout
    pub offset: usize,
    /// Phase of the first bout of every row
    pub start_phase: StartPhase,
    /// Collapse consecutive equal tokens within a bout
    pub merge_adjacent: bool,
    /// Column delimiter of the input table
    pub delimiter: String,
    /// Leading rows passed through untouched
    pub header_rows: usize,
    /// Maximum number of data rows to analyze
    pub max_rows: Option<usize>,
    /// Filler used when padding merged bouts back to their declared length
    pub pad_token: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stimulus_len: 0,
            pause_len: 0,
            offset: 0,
            start_phase: StartPhase::PauseFirst,
            merge_adjacent: true,
            delimiter: DEFAULT_DELIMITER.to_string(),
            header_rows: 0,
            max_rows: None,
            pad_token: DEFAULT_PAD_TOKEN.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with the given bout lengths and default settings
    pub fn new(stimulus_len: usize, pause_len: usize) -> Self {
        Self {
            stimulus_len,
            pause_len,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, BoutError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, BoutError> {
        serde_json::to_string_pretty(self).map_err(BoutError::JsonError)
    }

    /// Check that the configuration describes a usable layout
    pub fn validate(&self) -> Result<(), BoutError> {
        if self.stimulus_len == 0 {
            return Err(BoutError::InvalidConfig(
                "stimulus bout length must be positive".to_string(),
            ));
        }
        if self.pause_len == 0 {
            return Err(BoutError::InvalidConfig(
                "pause bout length must be positive".to_string(),
            ));
        }
        if self.delimiter.is_empty() {
            return Err(BoutError::InvalidConfig(
                "delimiter must not be empty".to_string(),
            ));
        }
        if self.delimiter.contains('"') {
            return Err(BoutError::InvalidConfig(
                "delimiter must not contain a double quote".to_string(),
            ));
        }
        if self.max_rows == Some(0) {
            return Err(BoutError::InvalidConfig(
                "row limit must be positive when given".to_string(),
            ));
        }
        Ok(())
    }
}
