//! Subvoc-core - Core data structures for subword-vocabulary training
//!
//! This crate provides the fundamental data structures for training a
//! Byte-Pair-Encoding (BPE) vocabulary from a word-frequency corpus,
//! independent of any corpus ingestion or persistence concern.
//!
//! # Features
//!
//! - Efficient vocabulary storage using `AHashMap` and compact strings
//! - Words as contiguous symbol sequences with in-place pair merging
//! - A lazy-invalidation priority queue for merge candidates
//! - Error handling with detailed diagnostics
//!
//! # Example
//!
//! ```rust
//! use subvoc_core::Vocabulary;
//!
//! // Create a new vocabulary
//! let mut vocab = Vocabulary::new();
//! vocab.add_token("hello");
//! vocab.add_token("world");
//! ```

pub mod error;
pub use error::{Result, TrainerError};

// Core data structure modules
pub mod core;
pub use core::{
    MergeCandidate, MergeMap, MergeRules, Pair, PairChange, PairPriorityQueue, Symbol, Vocab,
    VocabR, Vocabulary, Word,
};
