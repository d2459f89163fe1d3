//! Error types for corpus preparation.

use std::io;

use thiserror::Error;

/// Errors raised while reading, encoding, or aligning a corpus.
///
/// Every variant except the IO and JSON wrappers is a corpus integrity
/// defect: the preparation run must abort instead of skipping the sentence.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("record {record}: edge references unknown word id {word_id}")]
    UnknownWordId { record: usize, word_id: i64 },

    #[error("sentence {sentence}: dimension mismatch (words: {words}, tags: {tags}, labels: {labels})")]
    DimensionMismatch {
        sentence: usize,
        words: usize,
        tags: usize,
        labels: usize,
    },

    #[error("corpus files disagree on sentence count (words: {words}, tags: {tags}, labels: {labels})")]
    SentenceCountMismatch { words: usize, tags: usize, labels: usize },

    #[error("sentence {sentence}: tag '{tag}' is not in the tag dictionary")]
    UnknownTag { sentence: usize, tag: String },

    #[error("sentence {sentence}: encoded sequence has {len} positions, at least 3 are required")]
    SequenceTooShort { sentence: usize, len: usize },

    #[error("record {record}: alignment needs {needed} source words but the tree has {available}")]
    AlignmentOverrun {
        record: usize,
        needed: usize,
        available: usize,
    },

    #[error("default dependency label '{0}' is not in the label dictionary")]
    MissingDefaultLabel(String),

    #[error("{records} corpus records but {sentences} encoded sentences")]
    RecordCountMismatch { records: usize, sentences: usize },

    #[error("expected {expected} keep probabilities, got {actual}")]
    PredictionLength { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}
