//! Row segmentation
//!
//! Splits one table row into alternating stimulus and pause bouts of fixed length.
//! Segmentation of a row stops at the first bout that would run past the end of
//! the row; that partial bout is dropped.

use crate::config::AnalysisConfig;
use crate::types::{Bout, BoutKind, StartPhase};

/// Bouts found in a single row, in left-to-right order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBouts<T> {
    /// All full bouts, alternating kinds
    pub bouts: Vec<Bout<T>>,
    /// Index one past the last consumed column
    pub consumed_end: usize,
    /// Tokens left over after the last full bout
    pub leftover: usize,
}

impl<T> RowBouts<T> {
    /// Stimulus bouts in row order
    pub fn stimuli(&self) -> impl Iterator<Item = &Bout<T>> {
        self.of_kind(BoutKind::Stimulus)
    }

    /// Pause bouts in row order
    pub fn pauses(&self) -> impl Iterator<Item = &Bout<T>> {
        self.of_kind(BoutKind::Pause)
    }

    /// Number of bouts of one kind
    pub fn count(&self, kind: BoutKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Split into (stimulus bouts, pause bouts), each keeping row order
    pub fn into_split(self) -> (Vec<Bout<T>>, Vec<Bout<T>>) {
        self.bouts
            .into_iter()
            .partition(|bout| bout.kind == BoutKind::Stimulus)
    }

    fn of_kind(&self, kind: BoutKind) -> impl Iterator<Item = &Bout<T>> {
        self.bouts.iter().filter(move |bout| bout.kind == kind)
    }
}

/// Segment a row into alternating bouts.
///
/// # Arguments
/// * `row` - All cells of the row, including leading id columns
/// * `offset` - Column index of the first bout
/// * `stimulus_len` - Columns per stimulus bout
/// * `pause_len` - Columns per pause bout
/// * `start_phase` - Kind of the first bout
///
/// A zero bout length yields no bouts rather than looping forever.
pub fn segment_row<T: Clone>(
    row: &[T],
    offset: usize,
    stimulus_len: usize,
    pause_len: usize,
    start_phase: StartPhase,
) -> RowBouts<T> {
    let mut bouts = Vec::new();
    let mut cursor = offset;
    let mut kind = start_phase.first_kind();

    if stimulus_len > 0 && pause_len > 0 {
        loop {
            let length = match kind {
                BoutKind::Stimulus => stimulus_len,
                BoutKind::Pause => pause_len,
            };
            let Some(end) = cursor.checked_add(length) else {
                break;
            };
            let Some(slice) = row.get(cursor..end) else {
                break;
            };
            bouts.push(Bout::at(kind, cursor, slice.to_vec()));
            cursor = end;
            kind = kind.flipped();
        }
    }

    RowBouts {
        bouts,
        consumed_end: cursor.min(row.len()),
        leftover: row.len().saturating_sub(cursor),
    }
}

/// Segmenter bound to one bout layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSegmenter {
    offset: usize,
    stimulus_len: usize,
    pause_len: usize,
    start_phase: StartPhase,
}

impl RowSegmenter {
    /// Create a segmenter for an explicit layout
    pub fn new(offset: usize, stimulus_len: usize, pause_len: usize, start_phase: StartPhase) -> Self {
        Self {
            offset,
            stimulus_len,
            pause_len,
            start_phase,
        }
    }

    /// Create a segmenter from the layout part of a configuration
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.offset,
            config.stimulus_len,
            config.pause_len,
            config.start_phase,
        )
    }

    /// Segment one row
    pub fn segment<T: Clone>(&self, row: &[T]) -> RowBouts<T> {
        segment_row(
            row,
            self.offset,
            self.stimulus_len,
            self.pause_len,
            self.start_phase,
        )
    }

    /// Declared length for a bout kind
    pub fn length_of(&self, kind: BoutKind) -> usize {
        match kind {
            BoutKind::Stimulus => self.stimulus_len,
            BoutKind::Pause => self.pause_len,
        }
    }

    /// Column index of the first bout
    pub fn offset(&self) -> usize {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn tokens(bout: &Bout<String>) -> Vec<&str> {
        bout.tokens.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_alternating_stimulus_first() {
        let cells = row(&["id1", "A", "A", "B", "X", "X"]);
        let result = segment_row(&cells, 1, 2, 1, StartPhase::StimulusFirst);

        let kinds: Vec<BoutKind> = result.bouts.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BoutKind::Stimulus, BoutKind::Pause, BoutKind::Stimulus]
        );
        assert_eq!(tokens(&result.bouts[0]), vec!["A", "A"]);
        assert_eq!(tokens(&result.bouts[1]), vec!["B"]);
        assert_eq!(tokens(&result.bouts[2]), vec!["X", "X"]);
        assert_eq!(result.consumed_end, 6);
        assert_eq!(result.leftover, 0);
    }

    #[test]
    fn test_partial_bout_discarded() {
        let cells = row(&["1", "2", "3", "4", "5", "6", "7"]);
        let result = segment_row(&cells, 0, 3, 2, StartPhase::PauseFirst);

        // P[1,2] S[3,4,5] P[6,7], then a stimulus needs 3 more columns
        assert_eq!(result.bouts.len(), 3);
        assert_eq!(result.count(BoutKind::Pause), 2);
        assert_eq!(result.count(BoutKind::Stimulus), 1);
        assert_eq!(result.leftover, 0);

        let cells = row(&["1", "2", "3", "4"]);
        let result = segment_row(&cells, 0, 3, 2, StartPhase::PauseFirst);
        assert_eq!(result.bouts.len(), 1);
        assert_eq!(result.consumed_end, 2);
        assert_eq!(result.leftover, 2);
    }

    #[test]
    fn test_bouts_tile_row_from_offset() {
        let cells: Vec<String> = (0..23).map(|i| format!("t{}", i % 4)).collect();
        for offset in 0..4 {
            for (s, p) in [(1, 1), (2, 3), (4, 1), (5, 5)] {
                for phase in [StartPhase::StimulusFirst, StartPhase::PauseFirst] {
                    let result = segment_row(&cells, offset, s, p, phase);
                    let joined: Vec<String> = result
                        .bouts
                        .iter()
                        .flat_map(|b| b.tokens.iter().cloned())
                        .collect();
                    assert_eq!(joined, cells[offset..result.consumed_end].to_vec());
                    assert_eq!(result.consumed_end + result.leftover, cells.len());
                    for bout in &result.bouts {
                        let expected = if bout.kind == BoutKind::Stimulus { s } else { p };
                        assert_eq!(bout.len(), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_bout_column_spans() {
        let cells = row(&["id", "a", "b", "c", "d", "e"]);
        let result = segment_row(&cells, 1, 2, 1, StartPhase::StimulusFirst);
        let spans: Vec<_> = result.bouts.iter().map(|b| b.span()).collect();
        assert_eq!(spans, vec![1..3, 3..4, 4..6]);
    }

    #[test]
    fn test_huge_offset_yields_nothing() {
        let cells = row(&["a", "b"]);

        let result = segment_row(&cells, usize::MAX, 1, 1, StartPhase::StimulusFirst);
        assert!(result.bouts.is_empty());
        assert_eq!(result.consumed_end, 2);
        assert_eq!(result.leftover, 0);

        let result = segment_row(&cells, 1, usize::MAX, 1, StartPhase::StimulusFirst);
        assert!(result.bouts.is_empty());
        assert_eq!(result.leftover, 1);

        let result = segment_row(&cells, 1, 1, usize::MAX, StartPhase::StimulusFirst);
        assert_eq!(result.bouts.len(), 1);
        assert_eq!(result.leftover, 0);
    }

    #[test]
    fn test_row_shorter_than_offset() {
        let cells = row(&["id"]);
        let result = segment_row(&cells, 3, 1, 1, StartPhase::StimulusFirst);
        assert!(result.bouts.is_empty());
        assert_eq!(result.consumed_end, 1);
        assert_eq!(result.leftover, 0);
    }

    #[test]
    fn test_empty_row() {
        let cells: Vec<String> = Vec::new();
        let result = segment_row(&cells, 0, 2, 2, StartPhase::PauseFirst);
        assert!(result.bouts.is_empty());
        assert_eq!(result.leftover, 0);
    }

    #[test]
    fn test_zero_length_yields_nothing() {
        let cells = row(&["a", "b"]);
        let result = segment_row(&cells, 0, 0, 1, StartPhase::StimulusFirst);
        assert!(result.bouts.is_empty());
    }

    #[test]
    fn test_into_split_keeps_order() {
        let cells = row(&["a", "b", "c", "d", "e"]);
        let (stimuli, pauses) = segment_row(&cells, 0, 1, 1, StartPhase::StimulusFirst).into_split();
        let s: Vec<&str> = stimuli.iter().map(|b| b.tokens[0].as_str()).collect();
        let p: Vec<&str> = pauses.iter().map(|b| b.tokens[0].as_str()).collect();
        assert_eq!(s, vec!["a", "c", "e"]);
        assert_eq!(p, vec!["b", "d"]);
    }

    #[test]
    fn test_segmenter_from_config() {
        let mut config = AnalysisConfig::new(2, 1);
        config.offset = 1;
        config.start_phase = StartPhase::StimulusFirst;
        let segmenter = RowSegmenter::from_config(&config);
        let result = segmenter.segment(&row(&["id", "A", "B", "C"]));
        assert_eq!(result.stimuli().count(), 1);
        assert_eq!(result.pauses().count(), 1);
        assert_eq!(segmenter.length_of(BoutKind::Stimulus), 2);
        assert_eq!(segmenter.offset(), 1);
    }
}
