//! Whole-corpus preparation: materialize flat files, read them back, build
//! dictionaries, encode, and align training targets.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::corpus::{self, check_dimensions, FeatureSelection, LineReader, ReadOptions};
use crate::data::record::CorpusRecord;
use crate::data::tree::TreeReader;
use crate::encoding::aligner::TargetAligner;
use crate::encoding::constants::{COMPRESSIONS_FILE, LABELS_FILE, TAGS_FILE, WORDS_FILE};
use crate::encoding::encoder::{EncodedSentence, LabelFallbackStats, SequenceEncoder};
use crate::errors::CorpusError;
use crate::vocab::{DictionarySet, VocabularyBuilder};

/// Paths of the four positionally aligned flat files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFiles {
    pub words: PathBuf,
    pub tags: PathBuf,
    pub labels: PathBuf,
    pub compressions: PathBuf,
}

impl CorpusFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            words: dir.join(WORDS_FILE),
            tags: dir.join(TAGS_FILE),
            labels: dir.join(LABELS_FILE),
            compressions: dir.join(COMPRESSIONS_FILE),
        }
    }
}

/// Clear `files` and stream every record's word, tag, label and compression lines.
/// Returns the number of sentences written.
///
/// Each record is resolved before any of its lines is written, so the files stay
/// line-aligned even when a later record turns out to be defective.
pub fn materialize_corpus(records: &[CorpusRecord], files: &CorpusFiles) -> Result<usize, CorpusError> {
    corpus::truncate_outputs(&[
        files.words.as_path(),
        files.tags.as_path(),
        files.labels.as_path(),
        files.compressions.as_path(),
    ])?;

    let mut words = corpus::open_append(&files.words)?;
    let mut tags = corpus::open_append(&files.tags)?;
    let mut labels = corpus::open_append(&files.labels)?;
    let mut compressions = corpus::open_append(&files.compressions)?;

    let mut written = 0;
    for (record_index, record) in records.iter().enumerate() {
        let segments = TreeReader::new(record_index, record).segments()?;
        corpus::write_segments(&mut words, &segments, FeatureSelection::WORDS)?;
        corpus::write_segments(&mut tags, &segments, FeatureSelection::TAGS)?;
        corpus::write_segments(&mut labels, &segments, FeatureSelection::LABELS)?;
        corpus::write_compression(&mut compressions, &record.compression.text)?;
        written += 1;
    }

    for writer in [&mut words, &mut tags, &mut labels, &mut compressions] {
        writer.flush()?;
    }
    log::info!("Materialized {} sentences into {}", written, files.words.display());
    Ok(written)
}

/// Parallel token sequences read back from the flat files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedCorpus {
    pub words: Vec<Vec<String>>,
    pub tags: Vec<Vec<String>>,
    pub labels: Vec<Vec<String>>,
}

impl TokenizedCorpus {
    /// Read the word, tag and label files. Only words are case-folded and number-normalized.
    pub fn read(files: &CorpusFiles, config: &PipelineConfig) -> Result<Self, CorpusError> {
        let reader = LineReader::new(config)?;
        Ok(Self {
            words: reader.read_file(&files.words, ReadOptions::for_words(config))?,
            tags: reader.read_file(&files.tags, ReadOptions::RAW)?,
            labels: reader.read_file(&files.labels, ReadOptions::RAW)?,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Output of one preparation pass
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    pub dictionaries: DictionarySet,
    pub sentences: Vec<EncodedSentence>,
    pub fallbacks: LabelFallbackStats,
}

/// Verify dimensions, build vocabularies and dictionaries, then encode every sentence
pub fn prepare_corpus(corpus: &TokenizedCorpus, config: &PipelineConfig) -> Result<PreparedCorpus, CorpusError> {
    check_dimensions(&corpus.words, &corpus.tags, &corpus.labels)?;

    let vocabularies = VocabularyBuilder::new(config.vocab_size).build(&corpus.words, &corpus.tags, &corpus.labels);
    let dictionaries = DictionarySet::from_vocabularies(vocabularies);
    let (sentences, fallbacks) = encode_corpus(corpus, &dictionaries, config)?;

    Ok(PreparedCorpus {
        dictionaries,
        sentences,
        fallbacks,
    })
}

/// Encode a verified corpus against existing dictionaries
pub fn encode_corpus(
    corpus: &TokenizedCorpus,
    dictionaries: &DictionarySet,
    config: &PipelineConfig,
) -> Result<(Vec<EncodedSentence>, LabelFallbackStats), CorpusError> {
    check_dimensions(&corpus.words, &corpus.tags, &corpus.labels)?;

    let encoder = SequenceEncoder::new(dictionaries, config);
    let mut stats = LabelFallbackStats::default();
    let mut sentences = Vec::with_capacity(corpus.len());
    for (index, ((words, tags), labels)) in corpus.words.iter().zip(&corpus.tags).zip(&corpus.labels).enumerate() {
        sentences.push(encoder.encode_sentence(index, words, tags, labels, &mut stats)?);
    }

    if !stats.is_empty() {
        log::warn!(
            "Label fallbacks: {} normalized, {} defaulted",
            stats.normalized_count(),
            stats.defaulted_count()
        );
    }
    Ok((sentences, stats))
}

/// One model-facing training example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub words: Vec<u32>,
    pub tags: Vec<u32>,
    pub labels: Vec<u32>,
    pub target: Vec<u32>,
}

/// Align every record with its encoded sentence. Records and sentences pair up by position.
pub fn attach_targets(
    sentences: &[EncodedSentence],
    records: &[CorpusRecord],
) -> Result<Vec<TrainingExample>, CorpusError> {
    if sentences.len() != records.len() {
        return Err(CorpusError::RecordCountMismatch {
            records: records.len(),
            sentences: sentences.len(),
        });
    }

    let aligner = TargetAligner::new();
    sentences
        .iter()
        .zip(records)
        .enumerate()
        .map(|(index, (sentence, record))| {
            let target = aligner.align(index, record, &sentence.words)?;
            Ok(TrainingExample {
                words: sentence.words.clone(),
                tags: sentence.tags.clone(),
                labels: sentence.labels.clone(),
                target,
            })
        })
        .collect()
}

/// Write examples as JSON lines
pub fn write_examples(path: &Path, examples: &[TrainingExample]) -> Result<usize, CorpusError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for example in examples {
        serde_json::to_writer(&mut writer, example)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(examples.len())
}
