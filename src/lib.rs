pub mod config;
pub mod corpus;
pub mod data;
pub mod encoding;
pub mod errors;
pub mod vocab;

pub use config::PipelineConfig;
pub use corpus::{FeatureSelection, LineReader, ReadOptions};
pub use data::{CorpusParser, CorpusRecord, Segment, TreeReader};
pub use encoding::{
    EncodedSentence, LabelFallbackStats, PreparedCorpus, SequenceEncoder, TargetAligner,
    TrainingExample,
};
pub use errors::CorpusError;
pub use vocab::{Dictionary, DictionarySet, Vocabulary, VocabularyBuilder};
