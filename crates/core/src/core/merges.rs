//! Merge rule management for BPE training output.
//!
//! Merge rules are stored using token IDs rather than strings for fast
//! comparison. The rank records the order in which merges were learned;
//! a tokenizer applies them greedily in rank order at encode time.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A pair of adjacent token IDs that can be merged.
pub type Pair = (u32, u32);

/// Merge rule mapping: pair -> (rank, new_token_id).
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// Collection of BPE merge rules with efficient lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRules {
    /// Merge rules: pair -> (rank, new_token_id)
    pub merges: MergeMap,
}

impl MergeRules {
    /// Create a new empty collection of merge rules.
    pub fn new() -> Self {
        Self {
            merges: MergeMap::new(),
        }
    }

    /// Create a new collection with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            merges: MergeMap::with_capacity(capacity),
        }
    }

    /// Add a merge rule.
    ///
    /// # Arguments
    /// * `pair` - The pair of token IDs to merge
    /// * `rank` - The priority rank (lower = learned earlier)
    /// * `new_token_id` - The ID of the token created by this merge
    pub fn add_merge(&mut self, pair: Pair, rank: u32, new_token_id: u32) {
        self.merges.insert(pair, (rank, new_token_id));
    }

    /// Get the merge rule for a pair.
    ///
    /// Returns Some((rank, new_token_id)) if this pair was merged during
    /// training, None otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.merges.get(&pair).copied()
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// List the merge rules in rank order.
    ///
    /// Each entry is `(pair, rank, new_token_id)`; ranks are strictly
    /// increasing. This is the ordering serializers and tokenizers consume.
    pub fn ordered(&self) -> Vec<(Pair, u32, u32)> {
        let mut out: Vec<(Pair, u32, u32)> = self
            .merges
            .iter()
            .map(|(&pair, &(rank, id))| (pair, rank, id))
            .collect();
        out.sort_unstable_by_key(|&(_, rank, _)| rank);
        out
    }
}

impl Default for MergeRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merge() {
        let mut rules = MergeRules::new();
        rules.add_merge((0, 1), 0, 100);
        rules.add_merge((1, 2), 1, 101);

        assert_eq!(rules.get((0, 1)), Some((0, 100)));
        assert_eq!(rules.get((1, 2)), Some((1, 101)));
        assert_eq!(rules.get((2, 3)), None);
    }

    #[test]
    fn test_ordered_by_rank() {
        let mut rules = MergeRules::new();
        rules.add_merge((5, 6), 2, 102);
        rules.add_merge((0, 1), 0, 100);
        rules.add_merge((1, 2), 1, 101);

        let ordered = rules.ordered();
        assert_eq!(
            ordered,
            vec![((0, 1), 0, 100), ((1, 2), 1, 101), ((5, 6), 2, 102)]
        );
    }
}
