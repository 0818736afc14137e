//! A BK-tree over 64-bit perceptual hashes under the Hamming metric.
//!
//! One tree is owned per hash kind by [`crate::HashIndex`] rather than
//! shared through process-global state.

use icon_model::Hash64;
use std::collections::HashMap;

struct Node {
    hash: Hash64,
    children: HashMap<u32, Box<Node>>,
}

/// A metric-space index supporting radius search under Hamming distance.
#[derive(Default)]
pub struct BkTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl BkTree {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, hash: Hash64) {
        self.len += 1;
        let Some(root) = self.root.as_mut() else {
            self.root = Some(Box::new(Node { hash, children: HashMap::new() }));
            return;
        };

        let mut current = root;
        loop {
            let distance = current.hash.hamming_distance(hash);
            if distance == 0 {
                // Duplicate hash: still tracked (len incremented above) but
                // no new node is needed; callers resolve duplicates by key
                // at the HashIndex layer.
                self.len -= 1;
                return;
            }
            if let Some(child) = current.children.get_mut(&distance) {
                current = child;
            } else {
                current.children.insert(distance, Box::new(Node { hash, children: HashMap::new() }));
                return;
            }
        }
    }

    /// Returns every stored hash within `max_distance` of `target`, paired
    /// with its distance, using the triangle-inequality pruning that makes
    /// BK-trees faster than a linear scan.
    pub fn find_within(&self, target: Hash64, max_distance: u32) -> Vec<(Hash64, u32)> {
        let mut results = Vec::new();
        if let Some(root) = &self.root {
            Self::visit(root, target, max_distance, &mut results);
        }
        results
    }

    fn visit(node: &Node, target: Hash64, max_distance: u32, results: &mut Vec<(Hash64, u32)>) {
        let distance = node.hash.hamming_distance(target);
        if distance <= max_distance {
            results.push((node.hash, distance));
        }
        let lower = distance.saturating_sub(max_distance);
        let upper = distance + max_distance;
        for (edge, child) in &node.children {
            if *edge >= lower && *edge <= upper {
                Self::visit(child, target, max_distance, results);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_exact_match_at_distance_zero() {
        let mut tree = BkTree::new();
        tree.insert(Hash64::new(0xabcd));
        let hits = tree.find_within(Hash64::new(0xabcd), 0);
        assert_eq!(hits, vec![(Hash64::new(0xabcd), 0)]);
    }

    #[test]
    fn finds_nearby_hash_within_radius() {
        let mut tree = BkTree::new();
        tree.insert(Hash64::new(0b0000));
        tree.insert(Hash64::new(0b1111_0000));
        let hits = tree.find_within(Hash64::new(0b0000), 2);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn excludes_hashes_beyond_radius() {
        let mut tree = BkTree::new();
        tree.insert(Hash64::new(0));
        tree.insert(Hash64::new(u64::MAX));
        let hits = tree.find_within(Hash64::new(0), 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, Hash64::new(0));
    }

    #[test]
    fn handles_many_insertions_and_radius_search() {
        let mut tree = BkTree::new();
        for i in 0u64..500 {
            tree.insert(Hash64::new(i.wrapping_mul(0x9E3779B97F4A7C15)));
        }
        assert_eq!(tree.len(), 500);
        // Every inserted hash must be findable at distance 0 from itself.
        let probe = Hash64::new(7u64.wrapping_mul(0x9E3779B97F4A7C15));
        let hits = tree.find_within(probe, 0);
        assert!(hits.iter().any(|(h, d)| *h == probe && *d == 0));
    }
}
