//! Adjacent-pair counting over the tokenized corpus.
//!
//! Counting is the only concurrent phase of training: the word list is split
//! into contiguous index shards, each shard computes its own count and
//! position maps with no shared state, and a single aggregator folds the
//! shard results after all workers have joined. Summing counts and unioning
//! position sets are commutative, so worker completion order cannot affect
//! the result.

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use std::ops::Range;
use subvoc_core::{Pair, Word};

/// Below this many words, counting runs in a single shard.
const SINGLE_SHARD_THRESHOLD: usize = 10_000;

/// Shard fan-out for corpora above the threshold.
const SHARD_COUNT: usize = 4;

/// Aggregate pair counts and occurrence positions for the whole corpus.
///
/// `counts` is the single source of truth for pair frequencies during the
/// merge loop; the count snapshot carried by a queued merge candidate may
/// drift from it. `positions` records, per pair, the indices of the words
/// the pair occurs in; it is drained into the scheduler when seeding.
#[derive(Debug, Default)]
pub struct PairCountIndex {
    /// Pair -> aggregate frequency
    pub counts: AHashMap<Pair, u64>,
    /// Pair -> indices of words containing the pair
    pub positions: AHashMap<Pair, AHashSet<usize>>,
}

impl PairCountIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current aggregate count for a pair (0 if never seen).
    #[inline]
    pub fn count(&self, pair: Pair) -> u64 {
        self.counts.get(&pair).copied().unwrap_or(0)
    }
}

/// Count every adjacent symbol pair across all words.
///
/// A pair's count is the sum, over all words containing it, of
/// occurrences-in-word times the word's frequency; a pair occurring twice in
/// one word contributes twice. Words with fewer than two symbols contribute
/// nothing.
pub fn count_pairs(words: &[Word], counts: &[u64]) -> PairCountIndex {
    let shards: Vec<(AHashMap<Pair, u64>, AHashMap<Pair, AHashSet<usize>>)> =
        shard_ranges(words.len())
            .into_par_iter()
            .map(|range| count_shard(words, counts, range))
            .collect();

    // Sequential aggregation; shards own disjoint word ranges.
    let mut index = PairCountIndex::new();
    for (pair_counts, positions) in shards {
        for (pair, count) in pair_counts {
            *index.counts.entry(pair).or_insert(0) += count;
        }
        for (pair, pos) in positions {
            index.positions.entry(pair).or_default().extend(pos);
        }
    }

    index
}

/// Count one contiguous shard of the word list.
fn count_shard(
    words: &[Word],
    counts: &[u64],
    range: Range<usize>,
) -> (AHashMap<Pair, u64>, AHashMap<Pair, AHashSet<usize>>) {
    let mut pair_counts: AHashMap<Pair, u64> = AHashMap::new();
    let mut positions: AHashMap<Pair, AHashSet<usize>> = AHashMap::new();

    for k in range {
        let word = &words[k];
        let count = counts[k];

        for window in word.symbols().windows(2) {
            let pair = (window[0].id, window[1].id);
            *pair_counts.entry(pair).or_insert(0) += count;
            positions.entry(pair).or_default().insert(k);
        }
    }

    (pair_counts, positions)
}

/// Split `0..n` into contiguous shard ranges.
fn shard_ranges(n: usize) -> Vec<Range<usize>> {
    if n < SINGLE_SHARD_THRESHOLD {
        return vec![0..n];
    }

    let size = n.div_ceil(SHARD_COUNT);
    (0..SHARD_COUNT)
        .map(|i| (i * size).min(n)..((i + 1) * size).min(n))
        .collect()
}
