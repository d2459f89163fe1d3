//! The persisted dictionary bundle shared by preparation and inference.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};

use crate::encoding::constants::{DEP_DICT_FILE, POS_DICT_FILE, WORD_DICT_FILE, WORD_VOCAB_FILE};
use crate::vocab::dictionary::Dictionary;
use crate::vocab::vocabulary::{Vocabularies, Vocabulary};

/// Word vocabulary plus the word, tag and label dictionaries.
///
/// Built once per corpus pass, then only borrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionarySet {
    pub word_vocab: Vocabulary,
    pub words: Dictionary,
    pub tags: Dictionary,
    pub labels: Dictionary,
}

impl DictionarySet {
    pub fn from_vocabularies(vocab: Vocabularies) -> Self {
        Self {
            words: Dictionary::from_vocabulary(&vocab.words),
            tags: Dictionary::from_vocabulary(&vocab.tags),
            labels: Dictionary::from_vocabulary(&vocab.labels),
            word_vocab: vocab.words,
        }
    }

    /// Id given to any word outside the capped vocabulary
    pub fn oov_id(&self) -> u32 {
        self.word_vocab.len() as u32 + 1
    }

    /// Write `word_vocab.txt`, `word_dict.json`, `pos_dict.json` and `dep_dict.json` into `dir`
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;

        let mut vocab_text = self.word_vocab.tokens().join("\n");
        vocab_text.push('\n');
        fs::write(dir.join(WORD_VOCAB_FILE), vocab_text)?;

        self.words.save(&dir.join(WORD_DICT_FILE))?;
        self.tags.save(&dir.join(POS_DICT_FILE))?;
        self.labels.save(&dir.join(DEP_DICT_FILE))?;

        log::info!(
            "Saved dictionaries to {} ({} words, {} tags, {} labels)",
            dir.display(),
            self.words.len(),
            self.tags.len(),
            self.labels.len()
        );
        Ok(())
    }

    /// Load a bundle written by [`DictionarySet::save`]. Nothing is rebuilt.
    pub fn load(dir: &Path) -> Result<Self> {
        let vocab_path = dir.join(WORD_VOCAB_FILE);
        let vocab_text = fs::read_to_string(&vocab_path)
            .map_err(|e| anyhow!("Failed to read word vocabulary {}: {}", vocab_path.display(), e))?;
        let word_vocab = Vocabulary::from_tokens(vocab_text.split_whitespace());

        let set = Self {
            word_vocab,
            words: Dictionary::load(&dir.join(WORD_DICT_FILE))?,
            tags: Dictionary::load(&dir.join(POS_DICT_FILE))?,
            labels: Dictionary::load(&dir.join(DEP_DICT_FILE))?,
        };

        if let Some(missing) = set.word_vocab.tokens().iter().find(|token| !set.words.contains(token)) {
            return Err(anyhow!(
                "Word vocabulary entry '{}' has no id in {}",
                missing,
                WORD_DICT_FILE
            ));
        }
        log::debug!("Loaded dictionaries from {}", dir.display());
        Ok(set)
    }
}
