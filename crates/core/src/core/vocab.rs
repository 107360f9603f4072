//! Vocabulary storage and lookup.
//!
//! This module provides efficient vocabulary storage using AHashMap for fast lookups
//! and CompactString for memory-efficient string storage.

use ahash::AHashMap;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Forward mapping: token string -> ID
pub type Vocab = AHashMap<CompactString, u32>;

/// Reverse mapping: ID -> token string
pub type VocabR = AHashMap<u32, CompactString>;

/// Vocabulary with forward and reverse mappings.
///
/// IDs are dense and assigned in insertion order, so the vocabulary only ever
/// grows during training. Special tokens are added first and their IDs are
/// recorded so they are never considered for merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Forward mapping: token string -> ID
    pub vocab: Vocab,
    /// Reverse mapping: ID -> token string
    pub vocab_r: VocabR,
    /// IDs of special tokens, in insertion order
    pub special: Vec<u32>,
}

impl Vocabulary {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Self {
            vocab: Vocab::new(),
            vocab_r: VocabR::new(),
            special: Vec::new(),
        }
    }

    /// Create a new vocabulary with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vocab: Vocab::with_capacity(capacity),
            vocab_r: VocabR::with_capacity(capacity),
            special: Vec::new(),
        }
    }

    /// Add a token to the vocabulary.
    ///
    /// Returns the ID assigned to the token, or the existing ID if the token
    /// is already present.
    pub fn add_token(&mut self, token: &str) -> u32 {
        let token = CompactString::new(token);

        if let Some(&id) = self.vocab.get(&token) {
            return id;
        }

        let id = self.vocab.len() as u32;
        self.vocab_r.insert(id, token.clone());
        self.vocab.insert(token, id);

        id
    }

    /// Add special tokens to the vocabulary, recording their IDs.
    ///
    /// A token already present keeps its existing ID but is still marked
    /// special.
    pub fn add_special_tokens(&mut self, tokens: &[String]) {
        for token in tokens {
            let id = self.add_token(token);
            if !self.special.contains(&id) {
                self.special.push(id);
            }
        }
    }

    /// Get the ID for a token string.
    #[inline]
    pub fn get_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    /// Get the token string for an ID.
    #[inline]
    pub fn get_token(&self, id: u32) -> Option<&str> {
        self.vocab_r.get(&id).map(|s| s.as_str())
    }

    /// Check if an ID belongs to a special token.
    #[inline]
    pub fn is_special(&self, id: u32) -> bool {
        self.special.contains(&id)
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
