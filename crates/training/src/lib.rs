//! Subvoc-training - BPE vocabulary training
//!
//! This crate turns a corpus of (word, frequency) pairs into a ranked merge
//! table and vocabulary, the artifact a BPE tokenizer consumes at inference
//! time.
//!
//! # Features
//!
//! - Sharded, fork-join pair counting over the tokenized corpus
//! - Greedy highest-frequency merging with a lazy-invalidation queue
//! - Configurable training parameters (vocab size, min frequency,
//!   subword markers, alphabet limits, special tokens)
//! - A two-file serializer (`vocab.json` + `merges.txt`) for trained models
//!
//! # Example
//!
//! ```rust
//! use ahash::AHashMap;
//! use subvoc_training::{BpeTrainer, TrainerConfig};
//!
//! let mut word_counts: AHashMap<String, u64> = AHashMap::new();
//! word_counts.insert("low".to_string(), 5);
//! word_counts.insert("lower".to_string(), 2);
//!
//! let config = TrainerConfig {
//!     vocab_size: 10,
//!     show_progress: false,
//!     ..Default::default()
//! };
//! let mut trainer = BpeTrainer::new(config);
//! let model = trainer.train(&word_counts).unwrap();
//! assert!(model.vocab.len() <= 10);
//! ```

pub use subvoc_core::{Result, TrainerError};

// Training pipeline
pub mod training;
pub use training::{count_pairs, BpeTrainer, PairCountIndex, TrainedModel, TrainerConfig};

// Persistence
pub mod io;
pub use io::ModelSaver;
