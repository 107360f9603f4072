//! Priority queue for BPE merge candidates.
//!
//! The queue is a plain max-heap with lazy invalidation: entries are never
//! updated in place. When the indexed count for a pair changes, the queued
//! candidate simply becomes stale; the trainer detects this at pop time by
//! comparing the candidate's count snapshot against the index, refreshes the
//! snapshot and re-pushes. This keeps the heap free of arbitrary-position
//! updates at the same amortized cost.

use crate::core::merges::Pair;
use ahash::AHashSet;
use dary_heap::OctonaryHeap;

/// A merge candidate during BPE training.
///
/// `count` is a snapshot of the pair's indexed frequency at insertion time
/// and may drift from the index afterwards. `pos` is the set of word indices
/// the pair occurred in when the candidate was created; it is used to limit
/// re-scanning to affected words. `seq` is the insertion sequence number
/// assigned by the queue, used to break count ties (newer wins).
#[derive(Debug, Clone)]
pub struct MergeCandidate {
    /// The pair of token IDs to merge
    pub pair: Pair,
    /// The frequency snapshot for this pair
    pub count: u64,
    /// Indices of the words this pair occurred in at insertion time
    pub pos: AHashSet<usize>,
    /// Insertion sequence number, assigned by the queue
    pub seq: u64,
}

impl PartialEq for MergeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.seq == other.seq
    }
}

impl Eq for MergeCandidate {}

// Higher count = higher priority; ties go to the most recent insertion.
impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue for BPE merge candidates.
///
/// Uses an 8-ary heap for better cache locality than a binary heap.
pub struct PairPriorityQueue {
    /// The heap storing merge candidates
    heap: OctonaryHeap<MergeCandidate>,
    /// Next insertion sequence number
    next_seq: u64,
}

impl PairPriorityQueue {
    /// Create a new empty priority queue.
    pub fn new() -> Self {
        Self {
            heap: OctonaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Create a new priority queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Push a new candidate for `pair`, assigning it the next insertion
    /// sequence number.
    pub fn push(&mut self, pair: Pair, count: u64, pos: AHashSet<usize>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(MergeCandidate {
            pair,
            count,
            pos,
            seq,
        });
    }

    /// Re-push a candidate whose count snapshot was refreshed from the index.
    ///
    /// The candidate keeps its original insertion sequence, so a refreshed
    /// entry does not jump ahead of genuinely newer candidates with the same
    /// count.
    pub fn requeue(&mut self, candidate: MergeCandidate) {
        self.heap.push(candidate);
    }

    /// Pop the highest priority candidate.
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        self.heap.pop()
    }

    /// Peek at the highest priority candidate without removing it.
    pub fn peek(&self) -> Option<&MergeCandidate> {
        self.heap.peek()
    }

    /// Get the number of (potentially stale) entries in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Clear all entries from the queue.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }
}

impl Default for PairPriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}
