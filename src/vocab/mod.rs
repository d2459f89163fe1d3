//! Vocabularies, dictionaries and their persisted form

pub mod dictionary;
pub mod store;
pub mod vocabulary;

pub use dictionary::Dictionary;
pub use store::DictionarySet;
pub use vocabulary::{TokenCounter, Vocabularies, Vocabulary, VocabularyBuilder};
