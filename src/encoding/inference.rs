//! Inference-time encoding and decoding around the external parser and model.
//!
//! Uses the persisted dictionaries verbatim and the same word normalization as
//! corpus preparation, so fallbacks behave identically in both paths.

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::corpus::{LineReader, ReadOptions};
use crate::encoding::constants::{ABSENT_ID, DELETE_DISPLAY, UNKNOWN_DISPLAY};
use crate::encoding::encoder::{EncodedSentence, LabelFallbackStats, SequenceEncoder};
use crate::errors::CorpusError;
use crate::vocab::{Dictionary, DictionarySet};

/// Keep probabilities above this value keep the word
pub const DEFAULT_KEEP_THRESHOLD: f32 = 0.5;

/// Output of the external dependency parser for one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSentence {
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
    /// (label, head, dependent) triples with 1-based token indices
    pub dependencies: Vec<(String, usize, usize)>,
}

impl ParsedSentence {
    /// Labels ordered by dependent position
    pub fn label_sequence(&self) -> Vec<String> {
        let mut dependencies: Vec<&(String, usize, usize)> = self.dependencies.iter().collect();
        dependencies.sort_by_key(|(_, _, dependent)| *dependent);
        dependencies.into_iter().map(|(label, _, _)| label.clone()).collect()
    }
}

/// Marker-wrapped sequences ready for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceInput {
    /// Original surface forms, used for display
    pub display: Vec<String>,
    pub words: Vec<String>,
    pub tags: Vec<String>,
    pub labels: Vec<String>,
}

impl InferenceInput {
    /// Wrap a parsed sentence in boundary markers and normalize its words, markers
    /// included. Markers stand in as their own tag and label, as in the prepared corpus.
    pub fn from_parsed(parsed: &ParsedSentence, config: &PipelineConfig) -> Result<Self, CorpusError> {
        let labels = parsed.label_sequence();
        if parsed.tokens.len() != parsed.tags.len() || parsed.tokens.len() != labels.len() {
            return Err(CorpusError::DimensionMismatch {
                sentence: 0,
                words: parsed.tokens.len(),
                tags: parsed.tags.len(),
                labels: labels.len(),
            });
        }

        let reader = LineReader::new(config)?;
        let options = ReadOptions::for_words(config);
        let wrap = |inner: Vec<String>| {
            let mut wrapped = Vec::with_capacity(inner.len() + 2);
            wrapped.push(config.start_marker.clone());
            wrapped.extend(inner);
            wrapped.push(config.end_marker.clone());
            wrapped
        };

        Ok(Self {
            display: wrap(parsed.tokens.clone()),
            words: wrap(parsed.tokens.clone())
                .iter()
                .map(|token| reader.normalize(token, options))
                .collect(),
            tags: wrap(parsed.tags.clone()),
            labels: wrap(labels),
        })
    }

    pub fn encode(&self, encoder: &SequenceEncoder<'_>, stats: &mut LabelFallbackStats) -> Result<EncodedSentence, CorpusError> {
        encoder.encode_lenient(&self.words, &self.tags, &self.labels, stats)
    }
}

/// Per-token keep decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDecision {
    pub position: usize,
    pub word: String,
    pub tag: String,
    pub label: String,
    pub keep: bool,
}

/// Display form of an id: 0 is a deletion, the out-of-vocabulary id is unknown
pub fn display_token(dictionary: &Dictionary, id: u32, oov_id: u32) -> String {
    if id == ABSENT_ID {
        return DELETE_DISPLAY.to_string();
    }
    if id == oov_id {
        return UNKNOWN_DISPLAY.to_string();
    }
    dictionary.token(id).unwrap_or(UNKNOWN_DISPLAY).to_string()
}

/// Turn per-position keep probabilities into decisions.
///
/// Boundary markers are skipped and the sentence-final slot is always kept.
/// The input, every encoded sequence and the probabilities must share one length.
pub fn decode_predictions(
    input: &InferenceInput,
    encoded: &EncodedSentence,
    probabilities: &[f32],
    dictionaries: &DictionarySet,
    threshold: f32,
) -> Result<Vec<TokenDecision>, CorpusError> {
    let len = encoded.len();
    if input.display.len() != len || encoded.tags.len() != len || encoded.labels.len() != len {
        return Err(CorpusError::DimensionMismatch {
            sentence: 0,
            words: input.display.len(),
            tags: encoded.tags.len(),
            labels: encoded.labels.len(),
        });
    }
    if probabilities.len() != len {
        return Err(CorpusError::PredictionLength {
            expected: len,
            actual: probabilities.len(),
        });
    }
    if len < 2 {
        return Ok(Vec::new());
    }

    let oov_id = dictionaries.oov_id();
    let decisions = (1..len - 1)
        .map(|position| TokenDecision {
            position,
            word: input.display[position].clone(),
            tag: display_token(&dictionaries.tags, encoded.tags[position], oov_id),
            label: display_token(&dictionaries.labels, encoded.labels[position], oov_id),
            keep: probabilities[position] > threshold || position == len - 2,
        })
        .collect();
    Ok(decisions)
}

/// The kept words joined with spaces
pub fn compressed_text(decisions: &[TokenDecision]) -> String {
    decisions
        .iter()
        .filter(|decision| decision.keep)
        .map(|decision| decision.word.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
