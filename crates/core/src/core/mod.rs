//! Core data structures for BPE vocabulary training.
//!
//! This module contains the fundamental data structures shared by the
//! training pipeline: the vocabulary, merge rules, word symbol sequences,
//! and the merge-candidate priority queue.

pub mod merges;
pub mod priority;
pub mod vocab;
pub mod word;

pub use merges::{MergeMap, MergeRules, Pair};
pub use priority::{MergeCandidate, PairPriorityQueue};
pub use vocab::{Vocab, VocabR, Vocabulary};
pub use word::{PairChange, Symbol, Word};
