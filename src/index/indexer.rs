//! Tokenization, normalization and per-document word counting

use crate::index::stopwords::is_stop_word;
use crate::storage::IndexEntry;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::{mpsc, LazyLock};
use std::thread;

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

/// Below this many tokens the text is normalized on the calling thread
const PARALLEL_THRESHOLD: usize = 256;

/// Normalizes one raw token into its index form
///
/// Leading and trailing punctuation is trimmed, the token is lowercased,
/// stop words are dropped and the rest is stemmed.
///
/// # Examples
///
/// ```
/// use kensaku::index::normalize;
///
/// assert_eq!(normalize("Indexed,"), Some("index".to_string()));
/// assert_eq!(normalize("The"), None);
/// assert_eq!(normalize("--"), None);
/// ```
pub fn normalize(token: &str) -> Option<String> {
    let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if is_stop_word(&lower) {
        return None;
    }

    Some(STEMMER.stem(&lower).into_owned())
}

/// Counts normalized words in `text`
///
/// Large inputs are split into one chunk per available core; each worker
/// sends its stems over a shared channel and the calling thread tallies
/// them into an ordered map, so the result does not depend on scheduling.
pub fn word_counts(text: &str) -> BTreeMap<String, i64> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut counts = BTreeMap::new();

    if tokens.len() < PARALLEL_THRESHOLD {
        for stem in tokens.iter().filter_map(|t| normalize(t)) {
            *counts.entry(stem).or_insert(0) += 1;
        }
        return counts;
    }

    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    let chunk_size = tokens.len().div_ceil(workers);

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<String>();

        for chunk in tokens.chunks(chunk_size) {
            let tx = tx.clone();
            scope.spawn(move || {
                for stem in chunk.iter().filter_map(|t| normalize(t)) {
                    if tx.send(stem).is_err() {
                        return;
                    }
                }
            });
        }
        drop(tx);

        for stem in rx {
            *counts.entry(stem).or_insert(0) += 1;
        }
    });

    counts
}

/// Builds the index entries for one document
///
/// Each distinct normalized word yields exactly one entry carrying its
/// occurrence count. Entries come back sorted by word.
pub fn index(text: &str, doc_id: &str) -> Vec<IndexEntry> {
    word_counts(text)
        .into_iter()
        .map(|(word, count)| IndexEntry::new(doc_id, word, count))
        .collect()
}
