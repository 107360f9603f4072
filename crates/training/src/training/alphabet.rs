//! Initial alphabet construction.
//!
//! The alphabet is the base single-character vocabulary derived from the
//! corpus. Multi-character subwords are layered on top of it by the word
//! tokenizer and the merge loop.

use ahash::{AHashMap, AHashSet};
use subvoc_core::Vocabulary;

/// Compute the initial alphabet from the corpus and insert it into `vocab`.
///
/// Every character is weighted by the summed frequency of the words it
/// appears in; characters from `initial_alphabet` are forced in with a
/// maximal weight. If `limit_alphabet` is set and the natural alphabet is
/// larger, the excess is removed by sorting characters and truncating: the
/// lexicographically smallest `limit` characters survive. The cut is by
/// character order, not frequency, so results are reproducible and match
/// previously trained vocabularies.
///
/// Survivors are inserted in sorted character order, which fixes their IDs
/// for identical inputs. An empty corpus yields an empty alphabet.
pub fn build_alphabet(
    word_counts: &AHashMap<String, u64>,
    initial_alphabet: &AHashSet<char>,
    limit_alphabet: Option<usize>,
    vocab: &mut Vocabulary,
) {
    let mut alphabet: AHashMap<char, u64> = AHashMap::new();

    for (word, &count) in word_counts {
        for c in word.chars() {
            *alphabet.entry(c).or_insert(0) += count;
        }
    }

    // Cover characters that are not necessarily in the training set.
    for &c in initial_alphabet {
        alphabet.insert(c, u64::MAX);
    }

    let mut kept: Vec<(char, u64)> = alphabet.into_iter().collect();
    kept.sort_unstable_by_key(|&(c, _)| c);

    if let Some(limit) = limit_alphabet {
        if kept.len() > limit {
            log::debug!(
                "limiting alphabet from {} to {} characters",
                kept.len(),
                limit
            );
            kept.truncate(limit);
        }
    }

    for (c, _) in kept {
        let mut buf = [0u8; 4];
        vocab.add_token(c.encode_utf8(&mut buf));
    }
}
