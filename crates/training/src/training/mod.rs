//! Training pipeline for BPE vocabularies.
//!
//! The phases run in a fixed order: alphabet construction, word
//! tokenization, sharded pair counting, then the sequential merge loop.

pub mod alphabet;
pub mod counter;
pub mod tokenize;
pub mod trainer;

pub use counter::{count_pairs, PairCountIndex};
pub use trainer::{BpeTrainer, TrainedModel, TrainerConfig};
