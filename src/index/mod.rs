//! Indexing pipeline
//!
//! Turns page text into index entries: whitespace tokenization, punctuation
//! trimming, case folding, stop-word removal and English Snowball stemming.
//! The same [`normalize`] function is applied to search queries so both sides
//! agree on word forms.

mod indexer;
mod stopwords;

pub use indexer::{index, normalize, word_counts};
pub use stopwords::is_stop_word;
