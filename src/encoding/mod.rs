//! Encoding module: turns tokenized sentences into model-facing id sequences
//!
//! - `constants`: reserved tokens and positional conventions
//! - `encoder`: word/tag/label encoding with fallback statistics
//! - `aligner`: keep/delete target alignment against the original tree
//! - `pipeline`: whole-corpus preparation
//! - `inference`: encoding parser output and decoding model predictions

pub mod aligner;
pub mod constants;
pub mod encoder;
pub mod inference;
pub mod pipeline;


pub use aligner::{align_target, walk_len, TargetAligner};
pub use encoder::{
    EncodedSentence, LabelFallbackSample, LabelFallbackStats, LabelResolution, SequenceEncoder,
};
pub use inference::{
    compressed_text, decode_predictions, InferenceInput, ParsedSentence, TokenDecision,
    DEFAULT_KEEP_THRESHOLD,
};
pub use pipeline::{
    attach_targets, encode_corpus, materialize_corpus, prepare_corpus, write_examples,
    CorpusFiles, PreparedCorpus, TokenizedCorpus, TrainingExample,
};
