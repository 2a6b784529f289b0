//! Percentage annotation of prefix trees
//!
//! Each node's share is taken relative to its siblings under the same parent, with
//! a fresh total at every level of the walk.

use crate::histogram::{Histogram, HistogramNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A histogram node with its share of the sibling total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedNode<T: Ord> {
    /// Bouts passing through this node
    pub count: u64,
    /// `count` divided by the summed counts of all siblings, in `[0, 1]`
    pub percent: f64,
    pub children: BTreeMap<T, AnnotatedNode<T>>,
}

/// Annotated prefix tree for one bout kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentageTree<T: Ord> {
    pub roots: BTreeMap<T, AnnotatedNode<T>>,
}

impl<T: Ord> Default for PercentageTree<T> {
    fn default() -> Self {
        Self {
            roots: BTreeMap::new(),
        }
    }
}

impl<T: Ord> PercentageTree<T> {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Look up the node reached by a token path
    pub fn get(&self, path: &[T]) -> Option<&AnnotatedNode<T>> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(first)?;
        for token in rest {
            node = node.children.get(token)?;
        }
        Some(node)
    }

    /// Visit every node depth-first, parents before children, siblings in key order
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &T, &AnnotatedNode<T>),
    {
        fn descend<T: Ord, F: FnMut(usize, &T, &AnnotatedNode<T>)>(
            level: &BTreeMap<T, AnnotatedNode<T>>,
            depth: usize,
            visit: &mut F,
        ) {
            for (token, node) in level {
                visit(depth, token, node);
                descend(&node.children, depth + 1, visit);
            }
        }
        descend(&self.roots, 0, &mut visit);
    }
}

/// Annotate a histogram with per-level percentages. Counts are copied unchanged.
pub fn annotate<T: Ord + Clone>(histogram: &Histogram<T>) -> PercentageTree<T> {
    PercentageTree {
        roots: annotate_level(&histogram.roots),
    }
}

fn annotate_level<T: Ord + Clone>(
    level: &BTreeMap<T, HistogramNode<T>>,
) -> BTreeMap<T, AnnotatedNode<T>> {
    let total: u64 = level.values().map(|node| node.count).sum();
    level
        .iter()
        .map(|(token, node)| {
            // Nodes only exist after a traversal counted them, so total > 0 here
            let percent = node.count as f64 / total as f64;
            let annotated = AnnotatedNode {
                count: node.count,
                percent,
                children: annotate_level(&node.children),
            };
            (token.clone(), annotated)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bout(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn assert_levels_sum_to_one(level: &BTreeMap<String, AnnotatedNode<String>>) {
        if level.is_empty() {
            return;
        }
        let sum: f64 = level.values().map(|node| node.percent).sum();
        assert!((sum - 1.0).abs() < 1e-9, "level sums to {sum}");
        for node in level.values() {
            assert_levels_sum_to_one(&node.children);
        }
    }

    #[test]
    fn test_sibling_percentages() {
        let histogram = Histogram::from_bouts(vec![bout(&["A", "B"]), bout(&["A", "C"])]);
        let tree = annotate(&histogram);

        let a = tree.get(&bout(&["A"])).unwrap();
        assert_eq!(a.count, 2);
        assert!((a.percent - 1.0).abs() < 1e-12);
        assert!((tree.get(&bout(&["A", "B"])).unwrap().percent - 0.5).abs() < 1e-12);
        assert!((tree.get(&bout(&["A", "C"])).unwrap().percent - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_percentages_relative_to_parent_not_grand_total() {
        let histogram = Histogram::from_bouts(vec![
            bout(&["A", "B"]),
            bout(&["A", "B"]),
            bout(&["A", "C"]),
            bout(&["D", "B"]),
        ]);
        let tree = annotate(&histogram);

        assert!((tree.get(&bout(&["A"])).unwrap().percent - 0.75).abs() < 1e-12);
        assert!((tree.get(&bout(&["D"])).unwrap().percent - 0.25).abs() < 1e-12);
        assert!((tree.get(&bout(&["A", "B"])).unwrap().percent - 2.0 / 3.0).abs() < 1e-12);
        assert!((tree.get(&bout(&["D", "B"])).unwrap().percent - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_every_level_sums_to_one() {
        let histogram = Histogram::from_bouts(vec![
            bout(&["1", "2", "3"]),
            bout(&["1", "2"]),
            bout(&["1", "3", "1"]),
            bout(&["2"]),
            bout(&["3", "1", "2"]),
            bout(&["3", "1", "3"]),
            bout(&["3", "2"]),
        ]);
        let tree = annotate(&histogram);
        assert_levels_sum_to_one(&tree.roots);
    }

    #[test]
    fn test_counts_preserved_under_merge_shortening() {
        // The shorter bout ends at A; A's children still sum to 1.0 among themselves
        let histogram = Histogram::from_bouts(vec![bout(&["A"]), bout(&["A", "B"])]);
        let tree = annotate(&histogram);
        let a = tree.get(&bout(&["A"])).unwrap();
        assert_eq!(a.count, 2);
        assert!((tree.get(&bout(&["A", "B"])).unwrap().percent - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = Histogram::<String>::default();
        let tree = annotate(&histogram);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_walk_order() {
        let histogram = Histogram::from_bouts(vec![bout(&["B"]), bout(&["A", "C"])]);
        let tree = annotate(&histogram);
        let mut seen = Vec::new();
        tree.walk(|depth, token, _| seen.push((depth, token.clone())));
        assert_eq!(
            seen,
            vec![
                (0, "A".to_string()),
                (1, "C".to_string()),
                (0, "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_json_shape() {
        let histogram = Histogram::from_bouts(vec![bout(&["A", "B"])]);
        let json = serde_json::to_value(annotate(&histogram)).unwrap();
        assert_eq!(json["A"]["count"], 1);
        assert_eq!(json["A"]["percent"], 1.0);
        assert_eq!(json["A"]["children"]["B"]["count"], 1);
    }
}
