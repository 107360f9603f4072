//! BPE trainer implementation.
//!
//! This module implements the core training loop: alphabet construction,
//! word tokenization, sharded pair counting, and the greedy merge loop
//! driven by a lazy-invalidation priority queue.

use ahash::{AHashMap, AHashSet};
use indicatif::{ProgressBar, ProgressStyle};

use super::alphabet::build_alphabet;
use super::counter::count_pairs;
use super::tokenize::tokenize_words;
use subvoc_core::{MergeRules, Pair, PairPriorityQueue, Result, TrainerError, Vocabulary};

/// Configuration for BPE training.
///
/// All fields are optional in the sense that the defaults produce a working
/// trainer; `show_progress` is cosmetic and has no effect on results.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// The minimum frequency a pair must have to produce a merge (0 = unbounded)
    pub min_frequency: u64,
    /// The target vocabulary size
    pub vocab_size: usize,
    /// Whether to show progress while training
    pub show_progress: bool,
    /// Special tokens given the first vocabulary IDs, never split or merged
    pub special_tokens: Vec<String>,
    /// Cap on the number of initial alphabet characters kept before merging
    pub limit_alphabet: Option<usize>,
    /// Characters to include in the alphabet even if absent from the corpus
    pub initial_alphabet: AHashSet<char>,
    /// An optional prefix decorating a subword that continues a word
    pub continuing_subword_prefix: Option<String>,
    /// An optional suffix characterizing an end-of-word subword
    pub end_of_word_suffix: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            min_frequency: 0,
            vocab_size: 30_000,
            show_progress: true,
            special_tokens: Vec::new(),
            limit_alphabet: None,
            initial_alphabet: AHashSet::new(),
            continuing_subword_prefix: None,
            end_of_word_suffix: None,
        }
    }
}

impl TrainerConfig {
    /// Validate the configuration.
    ///
    /// The trainer itself does not validate; a malformed marker propagates
    /// as garbled tokens rather than an explicit failure, so callers should
    /// run this at configuration-construction time.
    pub fn validate(&self) -> Result<()> {
        if self.vocab_size == 0 {
            return Err(TrainerError::InvalidConfig(
                "vocab_size must be at least 1".to_string(),
            ));
        }
        if matches!(self.continuing_subword_prefix.as_deref(), Some("")) {
            return Err(TrainerError::InvalidConfig(
                "continuing_subword_prefix must not be empty".to_string(),
            ));
        }
        if matches!(self.end_of_word_suffix.as_deref(), Some("")) {
            return Err(TrainerError::InvalidConfig(
                "end_of_word_suffix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The output of a training run.
///
/// The trainer mandates no file format; persistence is the responsibility of
/// a serializer consuming this value (see [`crate::io::ModelSaver`]).
#[derive(Debug, Clone)]
pub struct TrainedModel {
    /// The final vocabulary: specials, alphabet, and all merged subwords
    pub vocab: Vocabulary,
    /// The ordered merge table applied greedily at encode time
    pub merges: MergeRules,
    /// The special tokens, echoed from the configuration
    pub special_tokens: Vec<String>,
}

/// BPE trainer.
///
/// Trains a subword vocabulary from a mapping of words to word counts by
/// iteratively merging the most frequent adjacent symbol pair.
///
/// # Example
///
/// ```rust
/// use ahash::AHashMap;
/// use subvoc_training::{BpeTrainer, TrainerConfig};
///
/// let mut word_counts: AHashMap<String, u64> = AHashMap::new();
/// word_counts.insert("hello".to_string(), 2);
/// word_counts.insert("world".to_string(), 1);
///
/// let mut trainer = BpeTrainer::new(TrainerConfig {
///     vocab_size: 12,
///     show_progress: false,
///     ..Default::default()
/// });
/// let model = trainer.train(&word_counts).unwrap();
/// assert!(model.vocab.len() <= 12);
/// ```
pub struct BpeTrainer {
    /// Configuration
    config: TrainerConfig,
    /// Vocabulary being built
    vocab: Vocabulary,
    /// Merge rules learned so far
    merges: MergeRules,
}

impl BpeTrainer {
    /// Create a new BPE trainer with the given configuration.
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            vocab: Vocabulary::new(),
            merges: MergeRules::new(),
        }
    }

    /// Create a new BPE trainer with a frequency floor and target size.
    pub fn with_limits(min_frequency: u64, vocab_size: usize) -> Self {
        Self::new(TrainerConfig {
            min_frequency,
            vocab_size,
            ..Default::default()
        })
    }

    /// Fold a batch of pre-split tokens into a word-count map.
    ///
    /// This is the corpus-ingestion hook: callers that pre-split their text
    /// (whitespace, regex, or otherwise) feed the resulting tokens here to
    /// build the `word_counts` input for [`BpeTrainer::train`].
    pub fn process_tokens<'a, I>(&self, word_counts: &mut AHashMap<String, u64>, tokens: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for token in tokens {
            *word_counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    /// Train on the given word counts.
    ///
    /// Returns the vocabulary, the rank-ordered merge table, and the echoed
    /// special-token list. Output is deterministic for identical input and
    /// configuration. A vocabulary smaller than the target size is not an
    /// error; it is the natural outcome of exhausting mergeable pairs above
    /// the frequency floor.
    pub fn train(&mut self, word_counts: &AHashMap<String, u64>) -> Result<TrainedModel> {
        // A trainer value is reusable; every run starts from scratch.
        self.vocab = Vocabulary::new();
        self.merges = MergeRules::new();

        let progress = self.setup_progress();

        // 1. Special tokens get the first IDs and are never merged.
        self.vocab.add_special_tokens(&self.config.special_tokens);

        // 2. Compute the initial alphabet.
        build_alphabet(
            word_counts,
            &self.config.initial_alphabet,
            self.config.limit_alphabet,
            &mut self.vocab,
        );

        // 3. Tokenize words against the alphabet.
        self.update_progress(&progress, word_counts.len(), "Tokenizing words");
        let (mut words, counts) = tokenize_words(
            word_counts,
            &mut self.vocab,
            self.config.continuing_subword_prefix.as_deref(),
            self.config.end_of_word_suffix.as_deref(),
        );
        self.finalize_progress(&progress, words.len());
        log::info!(
            "tokenized {} distinct words, base vocabulary {}",
            words.len(),
            self.vocab.len()
        );

        // 4. Count adjacent pairs across word shards.
        self.update_progress(&progress, words.len(), "Counting pairs");
        let mut index = count_pairs(&words, &counts);
        self.finalize_progress(&progress, words.len());

        // 5. Seed the scheduler, in sorted pair order for reproducibility.
        let mut queue = PairPriorityQueue::with_capacity(index.positions.len());
        let mut seeds: Vec<Pair> = index.positions.keys().copied().collect();
        seeds.sort_unstable();
        for pair in seeds {
            let count = index.count(pair);
            if let Some(pos) = index.positions.remove(&pair) {
                if !pos.is_empty() {
                    queue.push(pair, count, pos);
                }
            }
        }

        // 6. Merge from the top count down.
        self.update_progress(&progress, self.config.vocab_size, "Computing merges");
        let mut rank: u32 = 0;

        loop {
            if self.vocab.len() >= self.config.vocab_size {
                break;
            }

            let Some(mut top) = queue.pop() else {
                break;
            };

            // Stale snapshot: the index moved since this candidate was
            // queued. Refresh and re-queue instead of committing.
            let current = index.count(top.pair);
            if top.count != current {
                top.count = current;
                queue.requeue(top);
                continue;
            }

            if top.count < 1 || top.count < self.config.min_frequency {
                break;
            }

            // An earlier merge may have consumed the pair in every word
            // that produced this candidate.
            if !top.pos.iter().any(|&i| words[i].contains_pair(top.pair)) {
                log::debug!(
                    "discarding pair ({}, {}): no adjacent occurrence left",
                    top.pair.0,
                    top.pair.1
                );
                continue;
            }

            let new_token = self.merged_token(top.pair)?;
            let new_id = self.vocab.add_token(&new_token);
            self.merges.add_merge(top.pair, rank, new_id);
            rank += 1;

            // Apply the merge to every word that contained the pair, folding
            // newly formed adjacencies back into the index. Destroyed
            // adjacencies are not decremented; their stale counts age out
            // through the revalidation above. Position sets are rebuilt
            // fresh: membership is only re-established by this merge round.
            let mut affected: Vec<usize> = top.pos.iter().copied().collect();
            affected.sort_unstable();
            let mut where_to_update: AHashMap<Pair, AHashSet<usize>> = AHashMap::new();

            for i in affected {
                let changes = words[i].merge(top.pair.0, top.pair.1, new_id);
                if changes.is_empty() {
                    log::debug!(
                        "word {} no longer contains pair ({}, {})",
                        i,
                        top.pair.0,
                        top.pair.1
                    );
                    continue;
                }

                for change in changes {
                    if change.change > 0 {
                        let delta = change.change as u64 * counts[i];
                        *index.counts.entry(change.pair).or_insert(0) += delta;
                        where_to_update.entry(change.pair).or_default().insert(i);
                    }
                }
            }

            // Re-queue the pairs this merge touched, in sorted order.
            let mut formed: Vec<Pair> = where_to_update.keys().copied().collect();
            formed.sort_unstable();
            for pair in formed {
                let count = index.count(pair);
                if count > 0 {
                    if let Some(pos) = where_to_update.remove(&pair) {
                        queue.push(pair, count, pos);
                    }
                }
            }

            if let Some(p) = &progress {
                p.inc(1);
            }
        }

        self.finalize_progress(&progress, self.merges.len());
        log::info!(
            "finished: vocabulary {} tokens, {} merges",
            self.vocab.len(),
            self.merges.len()
        );

        Ok(TrainedModel {
            vocab: self.vocab.clone(),
            merges: self.merges.clone(),
            special_tokens: self.config.special_tokens.clone(),
        })
    }

    /// Synthesize the surface form for a committed merge.
    ///
    /// The new subword is the concatenation of both parts, stripping a
    /// leading continuing-subword-prefix from the right-hand part so that
    /// e.g. "un" + "##able" becomes "unable" rather than "un##able".
    fn merged_token(&self, pair: Pair) -> Result<String> {
        let left = self
            .vocab
            .get_token(pair.0)
            .ok_or(TrainerError::UnknownTokenId(pair.0))?;
        let mut right = self
            .vocab
            .get_token(pair.1)
            .ok_or(TrainerError::UnknownTokenId(pair.1))?;

        if let Some(prefix) = self.config.continuing_subword_prefix.as_deref() {
            right = right.strip_prefix(prefix).unwrap_or(right);
        }

        Ok(format!("{}{}", left, right))
    }

    /// Setup a progress bar if asked to show progress.
    fn setup_progress(&self) -> Option<ProgressBar> {
        if self.config.show_progress {
            let p = ProgressBar::new(0);
            p.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {msg:<30!} {wide_bar} {pos:<9!}/{len:>9!}")
                    .expect("Invalid progress template"),
            );
            Some(p)
        } else {
            None
        }
    }

    /// Update the progress bar with a new length and message.
    fn update_progress(&self, p: &Option<ProgressBar>, len: usize, message: &'static str) {
        if let Some(p) = p {
            p.set_message(message);
            p.set_length(len as u64);
            p.reset();
        }
    }

    /// Set the progress bar in the finish state.
    fn finalize_progress(&self, p: &Option<ProgressBar>, final_len: usize) {
        if let Some(p) = p {
            p.set_length(final_len as u64);
            p.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(entries: &[(&str, u64)]) -> AHashMap<String, u64> {
        entries
            .iter()
            .map(|&(w, c)| (w.to_string(), c))
            .collect()
    }

    fn quiet(config: TrainerConfig) -> TrainerConfig {
        TrainerConfig {
            show_progress: false,
            ..config
        }
    }

    /// Token strings of the merge table in rank order.
    fn merge_tokens(model: &TrainedModel) -> Vec<String> {
        model
            .merges
            .ordered()
            .iter()
            .map(|&(_, _, id)| model.vocab.get_token(id).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_reference_corpus_scenario() {
        // 10 distinct characters; three merges allowed on top.
        let wc = corpus(&[("low", 5), ("lower", 2), ("newest", 6), ("widest", 3)]);
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig {
            vocab_size: 13,
            min_frequency: 2,
            ..Default::default()
        }));

        let model = trainer.train(&wc).unwrap();

        // The top pair counts after alphabet construction are
        // es/st at 9 and we at 8; the three committed merges follow them.
        assert_eq!(model.vocab.len(), 13);
        assert_eq!(merge_tokens(&model), vec!["st", "est", "we"]);

        let ranks: Vec<u32> = model.merges.ordered().iter().map(|&(_, r, _)| r).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_corpus() {
        let wc = AHashMap::new();
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig {
            special_tokens: vec!["<unk>".to_string()],
            ..Default::default()
        }));

        let model = trainer.train(&wc).unwrap();

        assert_eq!(model.vocab.len(), 1);
        assert_eq!(model.vocab.get_id("<unk>"), Some(0));
        assert!(model.merges.is_empty());
        assert_eq!(model.special_tokens, vec!["<unk>".to_string()]);
    }

    #[test]
    fn test_overlapping_pairs_single_word() {
        let wc = corpus(&[("aaaa", 10)]);
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig::default()));

        let model = trainer.train(&wc).unwrap();

        // "a" -> "aa" -> "aaaa"; the overlapping run merges pairwise.
        assert_eq!(model.vocab.get_id("a"), Some(0));
        assert_eq!(model.vocab.get_id("aa"), Some(1));
        assert_eq!(model.vocab.get_id("aaaa"), Some(2));
        assert_eq!(model.vocab.len(), 3);
        assert_eq!(model.merges.len(), 2);
    }

    #[test]
    fn test_vocab_never_exceeds_target() {
        let wc = corpus(&[("abcdefg", 4), ("gfedcba", 3), ("aabbcc", 2)]);
        for target in [7, 9, 12] {
            let mut trainer = BpeTrainer::new(quiet(TrainerConfig {
                vocab_size: target,
                ..Default::default()
            }));
            let model = trainer.train(&wc).unwrap();
            assert!(model.vocab.len() <= target);
            // Never below the alphabet either.
            assert!(model.vocab.len() >= 7);
        }
    }

    #[test]
    fn test_min_frequency_floor() {
        let wc = corpus(&[("low", 5), ("lower", 2), ("newest", 6), ("widest", 3)]);
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig {
            vocab_size: 100,
            min_frequency: 10,
            ..Default::default()
        }));

        let model = trainer.train(&wc).unwrap();

        // Top pair count is 9 < 10: no merge commits, alphabet only.
        assert_eq!(model.vocab.len(), 10);
        assert!(model.merges.is_empty());
    }

    #[test]
    fn test_every_merge_adds_one_token() {
        let wc = corpus(&[("banana", 8), ("bandana", 3)]);
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig {
            vocab_size: 11,
            ..Default::default()
        }));

        let model = trainer.train(&wc).unwrap();

        // 4 characters (a, b, d, n) plus one token per merge.
        let alphabet_len = 4;
        assert_eq!(model.vocab.len(), alphabet_len + model.merges.len());

        let ordered = model.merges.ordered();
        for (k, &(_, r, id)) in ordered.iter().enumerate() {
            assert_eq!(r, k as u32);
            assert!(model.vocab.get_token(id).is_some());
        }
    }

    #[test]
    fn test_determinism() {
        let wc = corpus(&[
            ("hugging", 10),
            ("face", 8),
            ("hug", 7),
            ("hugger", 4),
            ("learning", 4),
            ("learner", 3),
        ]);
        let config = quiet(TrainerConfig {
            vocab_size: 24,
            ..Default::default()
        });

        let model_a = BpeTrainer::new(config.clone()).train(&wc).unwrap();
        let model_b = BpeTrainer::new(config).train(&wc).unwrap();

        assert_eq!(model_a.vocab.vocab, model_b.vocab.vocab);
        assert_eq!(model_a.vocab.vocab_r, model_b.vocab.vocab_r);
        assert_eq!(model_a.merges.ordered(), model_b.merges.ordered());
    }

    #[test]
    fn test_trainer_is_reusable() {
        let wc = corpus(&[("abab", 5)]);
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig::default()));

        let first = trainer.train(&wc).unwrap();
        let second = trainer.train(&wc).unwrap();

        assert_eq!(first.vocab.vocab, second.vocab.vocab);
        assert_eq!(first.merges.ordered(), second.merges.ordered());
    }

    #[test]
    fn test_special_tokens_first_and_echoed() {
        let wc = corpus(&[("ab", 2)]);
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig {
            special_tokens: vec!["<s>".to_string(), "</s>".to_string()],
            ..Default::default()
        }));

        let model = trainer.train(&wc).unwrap();

        assert_eq!(model.vocab.get_id("<s>"), Some(0));
        assert_eq!(model.vocab.get_id("</s>"), Some(1));
        assert_eq!(
            model.special_tokens,
            vec!["<s>".to_string(), "</s>".to_string()]
        );
    }

    #[test]
    fn test_suffix_carried_through_merges() {
        let wc = corpus(&[("ab", 3)]);
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig {
            end_of_word_suffix: Some("</w>".to_string()),
            ..Default::default()
        }));

        let model = trainer.train(&wc).unwrap();

        assert!(model.vocab.get_id("ab</w>").is_some());
    }

    #[test]
    fn test_merged_token_strips_prefix() {
        let mut trainer = BpeTrainer::new(quiet(TrainerConfig {
            continuing_subword_prefix: Some("##".to_string()),
            ..Default::default()
        }));
        trainer.vocab.add_token("un");
        trainer.vocab.add_token("##able");

        assert_eq!(trainer.merged_token((0, 1)).unwrap(), "unable");
    }

    #[test]
    fn test_merged_token_unknown_id() {
        let trainer = BpeTrainer::new(quiet(TrainerConfig::default()));
        assert!(matches!(
            trainer.merged_token((0, 1)),
            Err(TrainerError::UnknownTokenId(0))
        ));
    }

    #[test]
    fn test_process_tokens_counts() {
        let trainer = BpeTrainer::new(quiet(TrainerConfig::default()));
        let mut wc = AHashMap::new();

        trainer.process_tokens(&mut wc, "the cat the dog".split_whitespace());
        trainer.process_tokens(&mut wc, "the bird".split_whitespace());

        assert_eq!(wc["the"], 3);
        assert_eq!(wc["cat"], 1);
        assert_eq!(wc["bird"], 1);
    }

    #[test]
    fn test_with_limits_constructor() {
        let trainer = BpeTrainer::with_limits(2, 500);
        assert_eq!(trainer.config.min_frequency, 2);
        assert_eq!(trainer.config.vocab_size, 500);
    }

    #[test]
    fn test_config_validation() {
        assert!(TrainerConfig::default().validate().is_ok());

        let bad_size = TrainerConfig {
            vocab_size: 0,
            ..Default::default()
        };
        assert!(bad_size.validate().is_err());

        let bad_prefix = TrainerConfig {
            continuing_subword_prefix: Some(String::new()),
            ..Default::default()
        };
        assert!(bad_prefix.validate().is_err());
    }
}
