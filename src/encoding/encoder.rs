//! Sequence encoding against immutable dictionaries.
//!
//! Misses are always resolved by substitution, never by extending a dictionary:
//! unseen words get the out-of-vocabulary id, unseen labels go through the
//! normalization table and then the default label.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::encoding::constants::ABSENT_ID;
use crate::errors::CorpusError;
use crate::vocab::DictionarySet;

/// Number of individual fallback events kept as samples per run
pub const MAX_FALLBACK_SAMPLES: usize = 32;

/// Parallel id sequences for one sentence, markers included
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedSentence {
    pub words: Vec<u32>,
    pub tags: Vec<u32>,
    pub labels: Vec<u32>,
}

impl EncodedSentence {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// How an unseen label was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelResolution {
    Normalized,
    Defaulted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFallbackSample {
    pub sentence: usize,
    pub position: usize,
    pub label: String,
    pub resolved_to: String,
    pub resolution: LabelResolution,
}

/// Label fallback events collected over one corpus pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFallbackStats {
    /// Raw label -> occurrences resolved through the normalization table
    pub normalized: BTreeMap<String, usize>,
    /// Raw label -> occurrences replaced by the default label
    pub defaulted: BTreeMap<String, usize>,
    /// The first [`MAX_FALLBACK_SAMPLES`] events
    pub samples: Vec<LabelFallbackSample>,
}

impl LabelFallbackStats {
    pub fn normalized_count(&self) -> usize {
        self.normalized.values().sum()
    }

    pub fn defaulted_count(&self) -> usize {
        self.defaulted.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty() && self.defaulted.is_empty()
    }

    fn record(&mut self, sample: LabelFallbackSample) {
        let counts = match sample.resolution {
            LabelResolution::Normalized => &mut self.normalized,
            LabelResolution::Defaulted => &mut self.defaulted,
        };
        *counts.entry(sample.label.clone()).or_insert(0) += 1;
        if self.samples.len() < MAX_FALLBACK_SAMPLES {
            self.samples.push(sample);
        }
    }
}

/// Maps word/tag/label tokens to ids using a borrowed [`DictionarySet`]
#[derive(Debug, Clone)]
pub struct SequenceEncoder<'a> {
    dictionaries: &'a DictionarySet,
    normalization: &'a BTreeMap<String, String>,
    default_label: &'a str,
    default_label_id: Option<u32>,
}

impl<'a> SequenceEncoder<'a> {
    pub fn new(dictionaries: &'a DictionarySet, config: &'a PipelineConfig) -> Self {
        let default_label_id = dictionaries.labels.id(&config.default_label);
        if default_label_id.is_none() {
            log::debug!(
                "default label '{}' is not in the label dictionary; unresolvable labels will fail",
                config.default_label
            );
        }
        Self {
            dictionaries,
            normalization: &config.label_normalization,
            default_label: &config.default_label,
            default_label_id,
        }
    }

    /// Dictionary id for words in the capped vocabulary, otherwise the out-of-vocabulary id
    pub fn encode_word(&self, word: &str) -> u32 {
        if self.dictionaries.word_vocab.contains(word) {
            if let Some(id) = self.dictionaries.words.id(word) {
                return id;
            }
        }
        self.dictionaries.oov_id()
    }

    pub fn encode_tag(&self, sentence: usize, tag: &str) -> Result<u32, CorpusError> {
        self.dictionaries.tags.id(tag).ok_or_else(|| CorpusError::UnknownTag {
            sentence,
            tag: tag.to_string(),
        })
    }

    /// Resolve a label: raw, then normalized spelling, then the default label.
    ///
    /// Fails only when the default label itself has no id.
    pub fn encode_label(
        &self,
        sentence: usize,
        position: usize,
        label: &str,
        stats: &mut LabelFallbackStats,
    ) -> Result<u32, CorpusError> {
        if let Some(id) = self.dictionaries.labels.id(label) {
            return Ok(id);
        }

        if let Some(canonical) = self.normalization.get(label) {
            if let Some(id) = self.dictionaries.labels.id(canonical) {
                log::debug!("sentence {}: label '{}' normalized to '{}'", sentence, label, canonical);
                stats.record(LabelFallbackSample {
                    sentence,
                    position,
                    label: label.to_string(),
                    resolved_to: canonical.clone(),
                    resolution: LabelResolution::Normalized,
                });
                return Ok(id);
            }
        }

        log::warn!(
            "sentence {}: unknown dependency label '{}' at position {}, using '{}'",
            sentence,
            label,
            position,
            self.default_label
        );
        stats.record(LabelFallbackSample {
            sentence,
            position,
            label: label.to_string(),
            resolved_to: self.default_label.to_string(),
            resolution: LabelResolution::Defaulted,
        });
        self.default_label_id
            .ok_or_else(|| CorpusError::MissingDefaultLabel(self.default_label.to_string()))
    }

    /// Encode one sentence. A tag missing from the tag dictionary is a corpus defect.
    pub fn encode_sentence<S: AsRef<str>>(
        &self,
        sentence: usize,
        words: &[S],
        tags: &[S],
        labels: &[S],
        stats: &mut LabelFallbackStats,
    ) -> Result<EncodedSentence, CorpusError> {
        if words.len() != tags.len() || words.len() != labels.len() {
            return Err(CorpusError::DimensionMismatch {
                sentence,
                words: words.len(),
                tags: tags.len(),
                labels: labels.len(),
            });
        }

        let mut encoded = EncodedSentence {
            words: Vec::with_capacity(words.len()),
            tags: Vec::with_capacity(words.len()),
            labels: Vec::with_capacity(words.len()),
        };
        for (position, ((word, tag), label)) in words.iter().zip(tags).zip(labels).enumerate() {
            encoded.words.push(self.encode_word(word.as_ref()));
            encoded.tags.push(self.encode_tag(sentence, tag.as_ref())?);
            encoded.labels.push(self.encode_label(sentence, position, label.as_ref(), stats)?);
        }
        Ok(encoded)
    }

    /// Encode a sentence at inference time. An unknown tag, or a label with no
    /// usable fallback, becomes the padding id instead of an error.
    pub fn encode_lenient<S: AsRef<str>>(
        &self,
        words: &[S],
        tags: &[S],
        labels: &[S],
        stats: &mut LabelFallbackStats,
    ) -> Result<EncodedSentence, CorpusError> {
        if words.len() != tags.len() || words.len() != labels.len() {
            return Err(CorpusError::DimensionMismatch {
                sentence: 0,
                words: words.len(),
                tags: tags.len(),
                labels: labels.len(),
            });
        }

        let mut encoded = EncodedSentence::default();
        for (position, ((word, tag), label)) in words.iter().zip(tags).zip(labels).enumerate() {
            encoded.words.push(self.encode_word(word.as_ref()));
            let tag_id = self.dictionaries.tags.id(tag.as_ref()).unwrap_or_else(|| {
                log::warn!("unknown tag '{}' at position {}, encoding as padding", tag.as_ref(), position);
                ABSENT_ID
            });
            encoded.tags.push(tag_id);
            let label_id = match self.encode_label(0, position, label.as_ref(), stats) {
                Ok(id) => id,
                Err(err) => {
                    log::warn!("{}, encoding as padding", err);
                    ABSENT_ID
                }
            };
            encoded.labels.push(label_id);
        }
        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{Vocabularies, Vocabulary};

    fn dictionaries() -> DictionarySet {
        DictionarySet::from_vocabularies(Vocabularies {
            words: Vocabulary::from_tokens(["<bos>", "the", "cat", "sat", ".", "<eos>"]),
            tags: Vocabulary::from_tokens(["<bos>", "det", "nn", "vb", "p", "<eos>"]),
            labels: Vocabulary::from_tokens(["<bos>", "det", "nsubj", "root", "p", "nn", "iobj", "<eos>"]),
        })
    }

    fn seq(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn test_encode_sentence() {
        let dicts = dictionaries();
        let config = PipelineConfig::default();
        let encoder = SequenceEncoder::new(&dicts, &config);
        let mut stats = LabelFallbackStats::default();

        let encoded = encoder
            .encode_sentence(
                0,
                &seq("<bos> the cat sat . <eos>"),
                &seq("<bos> det nn vb p <eos>"),
                &seq("<bos> det nsubj root p <eos>"),
                &mut stats,
            )
            .unwrap();

        assert_eq!(encoded.words, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(encoded.tags, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(encoded.labels, vec![1, 2, 3, 4, 5, 8]);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_unknown_word_gets_oov_id() {
        let dicts = dictionaries();
        let config = PipelineConfig::default();
        let encoder = SequenceEncoder::new(&dicts, &config);
        assert_eq!(encoder.encode_word("zorblex"), 7);
        assert_eq!(encoder.encode_word("zorblex"), dicts.oov_id());
    }

    #[test]
    fn test_dictionary_entry_outside_vocabulary_is_oov() {
        let mut dicts = dictionaries();
        dicts.word_vocab = Vocabulary::from_tokens(["<bos>", "the"]);
        let config = PipelineConfig::default();
        let encoder = SequenceEncoder::new(&dicts, &config);

        assert_eq!(encoder.encode_word("the"), 2);
        assert_eq!(encoder.encode_word("cat"), 3);
        assert_eq!(dicts.oov_id(), 3);
    }

    #[test]
    fn test_label_normalization_resolves_canonical_id() {
        let dicts = dictionaries();
        let config = PipelineConfig::default();
        let encoder = SequenceEncoder::new(&dicts, &config);
        let mut stats = LabelFallbackStats::default();

        assert_eq!(encoder.encode_label(3, 1, "obj", &mut stats).unwrap(), dicts.labels.id("iobj").unwrap());
        assert_eq!(encoder.encode_label(3, 2, "punct", &mut stats).unwrap(), dicts.labels.id("p").unwrap());
        assert_eq!(stats.normalized_count(), 2);
        assert_eq!(stats.defaulted_count(), 0);
        assert_eq!(stats.samples[0].resolved_to, "iobj");
    }

    #[test]
    fn test_unresolvable_label_uses_default_and_is_recorded() {
        let dicts = dictionaries();
        let config = PipelineConfig::default();
        let encoder = SequenceEncoder::new(&dicts, &config);
        let mut stats = LabelFallbackStats::default();

        // "nmod" normalizes to "pobj", which this dictionary does not have either
        let nn = dicts.labels.id("nn").unwrap();
        assert_eq!(encoder.encode_label(0, 4, "nmod", &mut stats).unwrap(), nn);
        assert_eq!(encoder.encode_label(1, 2, "xyzzy", &mut stats).unwrap(), nn);
        assert_eq!(encoder.encode_label(2, 2, "xyzzy", &mut stats).unwrap(), nn);

        assert_eq!(stats.defaulted.get("xyzzy"), Some(&2));
        assert_eq!(stats.defaulted.get("nmod"), Some(&1));
        assert_eq!(stats.samples.len(), 3);
        assert_eq!(stats.samples[1].resolution, LabelResolution::Defaulted);
        assert_eq!(stats.samples[1].sentence, 1);
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let dicts = dictionaries();
        let config = PipelineConfig::default();
        let encoder = SequenceEncoder::new(&dicts, &config);
        let mut stats = LabelFallbackStats::default();

        let result = encoder.encode_sentence(
            9,
            &seq("<bos> the <eos>"),
            &seq("<bos> xx <eos>"),
            &seq("<bos> det <eos>"),
            &mut stats,
        );
        assert!(matches!(result, Err(CorpusError::UnknownTag { sentence: 9, .. })));
    }

    #[test]
    fn test_lenient_encoding_pads_unknown_tags() {
        let dicts = dictionaries();
        let config = PipelineConfig::default();
        let encoder = SequenceEncoder::new(&dicts, &config);
        let mut stats = LabelFallbackStats::default();

        let encoded = encoder
            .encode_lenient(&seq("<bos> the <eos>"), &seq("<bos> xx <eos>"), &seq("<bos> det <eos>"), &mut stats)
            .unwrap();
        assert_eq!(encoded.tags, vec![1, ABSENT_ID, 6]);
    }

    #[test]
    fn test_missing_default_label_fails_only_when_needed() {
        let dicts = dictionaries();
        let config = PipelineConfig { default_label: "dep".to_string(), ..PipelineConfig::default() };
        let encoder = SequenceEncoder::new(&dicts, &config);
        let mut stats = LabelFallbackStats::default();

        assert_eq!(encoder.encode_label(0, 1, "det", &mut stats).unwrap(), 2);
        assert!(matches!(
            encoder.encode_label(0, 2, "xyzzy", &mut stats),
            Err(CorpusError::MissingDefaultLabel(label)) if label == "dep"
        ));
    }

    #[test]
    fn test_lenient_encoding_pads_labels_without_default() {
        let dicts = dictionaries();
        let config = PipelineConfig { default_label: "dep".to_string(), ..PipelineConfig::default() };
        let encoder = SequenceEncoder::new(&dicts, &config);
        let mut stats = LabelFallbackStats::default();

        let encoded = encoder
            .encode_lenient(&seq("<bos> the <eos>"), &seq("<bos> det <eos>"), &seq("<bos> xyzzy <eos>"), &mut stats)
            .unwrap();
        assert_eq!(encoded.labels, vec![1, ABSENT_ID, 8]);
        assert_eq!(stats.defaulted_count(), 1);
    }

    #[test]
    fn test_samples_are_capped_but_counts_are_not() {
        let dicts = dictionaries();
        let config = PipelineConfig::default();
        let encoder = SequenceEncoder::new(&dicts, &config);
        let mut stats = LabelFallbackStats::default();

        for sentence in 0..2 * MAX_FALLBACK_SAMPLES {
            encoder.encode_label(sentence, 1, "xyzzy", &mut stats).unwrap();
        }
        assert_eq!(stats.defaulted.get("xyzzy"), Some(&(2 * MAX_FALLBACK_SAMPLES)));
        assert_eq!(stats.samples.len(), MAX_FALLBACK_SAMPLES);
        assert_eq!(stats.samples.last().map(|s| s.sentence), Some(MAX_FALLBACK_SAMPLES - 1));
    }
}
