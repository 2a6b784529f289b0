//! Bout normalization
//!
//! Collapses runs of equal tokens inside a bout and pads collapsed bouts back to
//! their declared length for export.

use crate::types::Bout;

/// Collapse consecutive equal tokens into one occurrence each
pub fn merge_adjacent<T: PartialEq + Clone>(tokens: &[T]) -> Vec<T> {
    let mut merged: Vec<T> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if merged.last() != Some(token) {
            merged.push(token.clone());
        }
    }
    merged
}

/// Append `pad` until `tokens` reaches `target_len`. Longer input is returned as-is.
pub fn pad_bout<T: Clone>(tokens: &[T], target_len: usize, pad: &T) -> Vec<T> {
    let mut padded = tokens.to_vec();
    if padded.len() < target_len {
        padded.resize(target_len, pad.clone());
    }
    padded
}

/// Normalizer for raw bouts
pub struct BoutNormalizer;

impl BoutNormalizer {
    /// Return the bout unchanged, or with runs collapsed when `merge` is set.
    ///
    /// The declared length is kept so the bout can be padded back later.
    pub fn normalize<T: PartialEq + Clone>(bout: Bout<T>, merge: bool) -> Bout<T> {
        if !merge {
            return bout;
        }
        Bout {
            tokens: merge_adjacent(&bout.tokens),
            ..bout
        }
    }

    /// Tokens of the bout padded back to its declared length
    pub fn padded<T: Clone>(bout: &Bout<T>, pad: &T) -> Vec<T> {
        pad_bout(&bout.tokens, bout.declared_len, pad)
    }
}
