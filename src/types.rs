//! Bout data types
//!
//! This module defines the values that flow between the segmenter, the normalizer
//! and the histogram builders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior identifier as read from a table cell.
///
/// The core is generic over any ordered, clonable token type; the row source
/// and the report layers work with plain strings.
pub type Token = String;

/// The phase a bout belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoutKind {
    Stimulus,
    Pause,
}

impl BoutKind {
    /// The phase that follows this one
    pub fn flipped(self) -> Self {
        match self {
            BoutKind::Stimulus => BoutKind::Pause,
            BoutKind::Pause => BoutKind::Stimulus,
        }
    }

    /// Single-letter alias used in debug output
    pub fn alias(self) -> &'static str {
        match self {
            BoutKind::Stimulus => "S",
            BoutKind::Pause => "P",
        }
    }
}

impl fmt::Display for BoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoutKind::Stimulus => f.write_str("stimulus"),
            BoutKind::Pause => f.write_str("pause"),
        }
    }
}

/// Which bout kind opens every row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPhase {
    StimulusFirst,
    #[default]
    PauseFirst,
}

impl StartPhase {
    /// Build a phase from a "starts with stimulus" flag
    pub fn from_stimulus_first(stimulus_first: bool) -> Self {
        if stimulus_first {
            StartPhase::StimulusFirst
        } else {
            StartPhase::PauseFirst
        }
    }

    /// Kind of the first bout in a row
    pub fn first_kind(self) -> BoutKind {
        match self {
            StartPhase::StimulusFirst => BoutKind::Stimulus,
            StartPhase::PauseFirst => BoutKind::Pause,
        }
    }
}

/// A run of columns belonging to one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bout<T = Token> {
    /// Stimulus or pause
    pub kind: BoutKind,
    /// Tokens in column order (possibly merged)
    pub tokens: Vec<T>,
    /// Configured length for this kind; equals the raw column count
    pub declared_len: usize,
    /// Column index of the first token in the source row
    pub start: usize,
}

impl<T> Bout<T> {
    /// Create a raw bout whose declared length is its token count
    pub fn new(kind: BoutKind, tokens: Vec<T>) -> Self {
        Self::at(kind, 0, tokens)
    }

    /// Create a raw bout read from the row starting at column `start`
    pub fn at(kind: BoutKind, start: usize, tokens: Vec<T>) -> Self {
        let declared_len = tokens.len();
        Self {
            kind,
            tokens,
            declared_len,
            start,
        }
    }

    /// Source columns covered by the raw bout
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.declared_len
    }

    /// Number of tokens currently held
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the bout holds no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
