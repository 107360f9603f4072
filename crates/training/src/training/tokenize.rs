//! Word tokenization against the initial alphabet.
//!
//! Turns every corpus word into a `Word` of symbol IDs, assigning fresh
//! vocabulary IDs to decorated surface forms as they are first seen. Words
//! are processed in sorted key order so ID assignment, and therefore the
//! final vocabulary numbering, is reproducible for identical input.

use ahash::AHashMap;
use subvoc_core::{Vocabulary, Word};

/// Tokenize the corpus into symbol sequences, extending `vocab` with any new
/// surface forms.
///
/// The first character of a word may be decorated with
/// `continuing_subword_prefix` and the last with `end_of_word_suffix`; for a
/// one-character word the suffix decoration wins. Interior characters pass
/// through undecorated. Characters dropped by alphabet truncation are
/// skipped. Returns the words and the parallel per-word frequency list.
pub fn tokenize_words(
    word_counts: &AHashMap<String, u64>,
    vocab: &mut Vocabulary,
    continuing_subword_prefix: Option<&str>,
    end_of_word_suffix: Option<&str>,
) -> (Vec<Word>, Vec<u64>) {
    let mut keys: Vec<&String> = word_counts.keys().collect();
    keys.sort_unstable();

    let mut words = Vec::with_capacity(keys.len());
    let mut counts = Vec::with_capacity(keys.len());

    for key in keys {
        counts.push(word_counts[key]);

        let chars: Vec<char> = key.chars().collect();
        let last = chars.len().saturating_sub(1);
        let mut word = Word::with_capacity(chars.len());

        for (i, &c) in chars.iter().enumerate() {
            let mut buf = [0u8; 4];
            let plain = &*c.encode_utf8(&mut buf);

            // Dropped by the alphabet limit.
            if vocab.get_id(plain).is_none() {
                continue;
            }

            let surface = if i == last {
                match end_of_word_suffix {
                    Some(suffix) => format!("{}{}", plain, suffix),
                    None => plain.to_string(),
                }
            } else if i == 0 {
                match continuing_subword_prefix {
                    Some(prefix) => format!("{}{}", prefix, plain),
                    None => plain.to_string(),
                }
            } else {
                plain.to_string()
            };

            let id = vocab.add_token(&surface);
            word.add(id, surface.len());
        }

        words.push(word);
    }

    (words, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    use crate::training::alphabet::build_alphabet;

    fn corpus(entries: &[(&str, u64)]) -> AHashMap<String, u64> {
        entries
            .iter()
            .map(|&(w, c)| (w.to_string(), c))
            .collect()
    }

    fn prepared_vocab(wc: &AHashMap<String, u64>) -> Vocabulary {
        let mut vocab = Vocabulary::new();
        build_alphabet(wc, &AHashSet::new(), None, &mut vocab);
        vocab
    }

    #[test]
    fn test_plain_tokenization() {
        let wc = corpus(&[("ab", 3), ("ba", 1)]);
        let mut vocab = prepared_vocab(&wc);

        let (words, counts) = tokenize_words(&wc, &mut vocab, None, None);

        // Sorted key order: "ab" then "ba".
        assert_eq!(counts, vec![3, 1]);
        let ids: Vec<Vec<u32>> = words
            .iter()
            .map(|w| w.symbols().iter().map(|s| s.id).collect())
            .collect();
        assert_eq!(ids, vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_prefix_decorates_first_char() {
        let wc = corpus(&[("ab", 1)]);
        let mut vocab = prepared_vocab(&wc);

        let (words, _) = tokenize_words(&wc, &mut vocab, Some("##"), None);

        assert_eq!(vocab.get_id("##a"), Some(2));
        let symbols = words[0].symbols();
        assert_eq!(symbols[0].id, 2);
        assert_eq!(symbols[0].len, 3);
        assert_eq!(symbols[1].id, vocab.get_id("b").unwrap());
    }

    #[test]
    fn test_suffix_decorates_last_char() {
        let wc = corpus(&[("ab", 1)]);
        let mut vocab = prepared_vocab(&wc);

        let (words, _) = tokenize_words(&wc, &mut vocab, None, Some("</w>"));

        assert_eq!(vocab.get_id("b</w>"), Some(2));
        let symbols = words[0].symbols();
        assert_eq!(symbols[1].id, 2);
        assert_eq!(symbols[1].len, 5);
    }

    #[test]
    fn test_single_char_word_suffix_wins() {
        let wc = corpus(&[("a", 1)]);
        let mut vocab = prepared_vocab(&wc);

        let (words, _) = tokenize_words(&wc, &mut vocab, Some("##"), Some("</w>"));

        assert_eq!(words[0].len(), 1);
        assert_eq!(
            vocab.get_token(words[0].symbols()[0].id),
            Some("a</w>")
        );
        assert_eq!(vocab.get_id("##a"), None);
    }

    #[test]
    fn test_dropped_chars_are_skipped() {
        let wc = corpus(&[("abc", 1)]);
        let mut vocab = Vocabulary::new();
        // Alphabet limited to "a" and "b"; "c" has no ID.
        build_alphabet(&wc, &AHashSet::new(), Some(2), &mut vocab);

        let (words, _) = tokenize_words(&wc, &mut vocab, None, None);

        let ids: Vec<u32> = words[0].symbols().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_multibyte_surface_length() {
        let wc = corpus(&[("héé", 2)]);
        let mut vocab = prepared_vocab(&wc);

        let (words, _) = tokenize_words(&wc, &mut vocab, None, None);

        let symbols = words[0].symbols();
        assert_eq!(symbols.len(), 3);
        assert_eq!(symbols[0].len, 1); // "h"
        assert_eq!(symbols[1].len, 2); // "é"
    }
}
