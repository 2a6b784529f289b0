//! Prefix-tree histograms over bout token sequences
//!
//! Every bout of one kind is walked from the root: each token selects (or creates)
//! a child of the current node and increments its count. Depth in the tree is the
//! position inside the bout, so a node's count is the number of bouts that share
//! the exact token prefix leading to it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One position-specific token in the prefix tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramNode<T: Ord> {
    /// Bouts passing through this node
    pub count: u64,
    /// Tokens observed at the next position after this prefix
    pub children: BTreeMap<T, HistogramNode<T>>,
}

impl<T: Ord> Default for HistogramNode<T> {
    fn default() -> Self {
        Self {
            count: 0,
            children: BTreeMap::new(),
        }
    }
}

/// Size figures of a histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistogramSummary {
    /// Bouts inserted, including empty ones
    pub bouts: u64,
    /// Nodes below the root
    pub nodes: usize,
    /// Longest token path
    pub max_depth: usize,
}

/// Prefix tree for one bout kind. The root carries no token, only children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram<T: Ord> {
    pub roots: BTreeMap<T, HistogramNode<T>>,
    bouts: u64,
}

impl<T: Ord> Default for Histogram<T> {
    fn default() -> Self {
        Self {
            roots: BTreeMap::new(),
            bouts: 0,
        }
    }
}

impl<T: Ord + Clone> Histogram<T> {
    /// Build a histogram from an iterator of token sequences
    pub fn from_bouts<I, B>(bouts: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[T]>,
    {
        let mut builder = HistogramBuilder::new();
        builder.extend(bouts);
        builder.build()
    }
}

impl<T: Ord> Histogram<T> {
    /// Whether no token was ever recorded
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of bouts inserted
    pub fn bout_count(&self) -> u64 {
        self.bouts
    }

    /// Look up the node reached by a token path
    pub fn get(&self, path: &[T]) -> Option<&HistogramNode<T>> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(first)?;
        for token in rest {
            node = node.children.get(token)?;
        }
        Some(node)
    }

    /// Node count and depth of the tree
    pub fn summary(&self) -> HistogramSummary {
        let mut summary = HistogramSummary {
            bouts: self.bouts,
            ..HistogramSummary::default()
        };
        let mut stack: Vec<(&HistogramNode<T>, usize)> =
            self.roots.values().map(|node| (node, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            summary.nodes += 1;
            summary.max_depth = summary.max_depth.max(depth);
            stack.extend(node.children.values().map(|child| (child, depth + 1)));
        }
        summary
    }
}

/// Incremental builder for a [`Histogram`]
#[derive(Debug)]
pub struct HistogramBuilder<T: Ord> {
    histogram: Histogram<T>,
}

impl<T: Ord> Default for HistogramBuilder<T> {
    fn default() -> Self {
        Self {
            histogram: Histogram::default(),
        }
    }
}

impl<T: Ord + Clone> HistogramBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one bout
    pub fn insert(&mut self, bout: &[T]) {
        self.histogram.bouts += 1;
        let mut level = &mut self.histogram.roots;
        for token in bout {
            let node = level.entry(token.clone()).or_default();
            node.count += 1;
            level = &mut node.children;
        }
    }

    /// Record every bout of an iterator
    pub fn extend<I, B>(&mut self, bouts: I)
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[T]>,
    {
        for bout in bouts {
            self.insert(bout.as_ref());
        }
    }

    pub fn build(self) -> Histogram<T> {
        self.histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bout(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn path(values: &[&str]) -> Vec<String> {
        bout(values)
    }

    #[test]
    fn test_shared_prefix_counts() {
        let histogram = Histogram::from_bouts(vec![bout(&["A", "B"]), bout(&["A", "C"])]);

        assert_eq!(histogram.roots.len(), 1);
        let a = histogram.get(&path(&["A"])).unwrap();
        assert_eq!(a.count, 2);
        assert_eq!(a.children.len(), 2);
        assert_eq!(histogram.get(&path(&["A", "B"])).unwrap().count, 1);
        assert_eq!(histogram.get(&path(&["A", "C"])).unwrap().count, 1);
        assert!(histogram.get(&path(&["B"])).is_none());
    }

    #[test]
    fn test_empty_bouts_give_no_children() {
        let histogram = Histogram::<String>::from_bouts(vec![bout(&[]), bout(&[])]);
        assert!(histogram.is_empty());
        assert_eq!(histogram.bout_count(), 2);
        assert_eq!(histogram.summary().nodes, 0);
    }

    #[test]
    fn test_shorter_merged_bout_ends_early() {
        // [A] and [A, B] diverge only after A: A keeps a count nothing below explains
        let histogram = Histogram::from_bouts(vec![bout(&["A"]), bout(&["A", "B"])]);
        let a = histogram.get(&path(&["A"])).unwrap();
        assert_eq!(a.count, 2);
        let below: u64 = a.children.values().map(|child| child.count).sum();
        assert_eq!(below, 1);
    }

    #[test]
    fn test_same_token_at_different_depths() {
        let histogram = Histogram::from_bouts(vec![bout(&["A", "A"]), bout(&["B", "A"])]);
        assert_eq!(histogram.get(&path(&["A", "A"])).unwrap().count, 1);
        assert_eq!(histogram.get(&path(&["B", "A"])).unwrap().count, 1);
        assert_eq!(histogram.get(&path(&["A"])).unwrap().count, 1);
    }

    #[test]
    fn test_summary() {
        let mut builder = HistogramBuilder::new();
        builder.insert(&bout(&["1", "2", "3"]));
        builder.insert(&bout(&["1", "2"]));
        builder.insert(&bout(&["4"]));
        let summary = builder.build().summary();
        assert_eq!(summary.bouts, 3);
        assert_eq!(summary.nodes, 4);
        assert_eq!(summary.max_depth, 3);
    }

    #[test]
    fn test_generic_tokens() {
        let histogram = Histogram::from_bouts(vec![vec![1u32, 2], vec![1, 2], vec![3]]);
        assert_eq!(histogram.get(&[1, 2]).unwrap().count, 2);
        assert_eq!(histogram.get(&[3]).unwrap().count, 1);
    }
}
