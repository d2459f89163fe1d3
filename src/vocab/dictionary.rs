use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use anyhow::{Result, anyhow};

use crate::vocab::vocabulary::Vocabulary;

/// Dense token -> id mapping. Ids start at 1; 0 is never assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    token_to_id: HashMap<String, u32>,
    /// `id_to_token[id - 1]` is the token with that id
    id_to_token: Vec<String>,
}

impl Dictionary {
    /// Assign `position + 1` to every vocabulary entry
    pub fn from_vocabulary(vocab: &Vocabulary) -> Self {
        let id_to_token = vocab.tokens().to_vec();
        let token_to_id = id_to_token
            .iter()
            .enumerate()
            .map(|(position, token)| (token.clone(), position as u32 + 1))
            .collect();
        Self { token_to_id, id_to_token }
    }

    /// Get the ID for a given token
    pub fn id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    /// Get the token for a given ID
    pub fn token(&self, id: u32) -> Option<&str> {
        let index = (id as usize).checked_sub(1)?;
        self.id_to_token.get(index).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    /// Tokens in id order
    pub fn tokens(&self) -> &[String] {
        &self.id_to_token
    }

    /// Rebuild from a persisted token -> id object, checking ids are dense and start at 1
    pub fn from_map(map: HashMap<String, u32>) -> Result<Self> {
        let mut id_to_token = vec![String::new(); map.len()];
        let mut seen = vec![false; map.len()];
        for (token, &id) in &map {
            let index = (id as usize)
                .checked_sub(1)
                .filter(|index| *index < map.len())
                .ok_or_else(|| anyhow!("Dictionary id {} for '{}' is outside 1..={}", id, token, map.len()))?;
            if seen[index] {
                return Err(anyhow!("Dictionary id {} is assigned twice", id));
            }
            seen[index] = true;
            id_to_token[index] = token.clone();
        }
        Ok(Self { token_to_id: map, id_to_token })
    }

    /// Save the dictionary as a flat JSON object
    pub fn save(&self, path: &Path) -> Result<()> {
        let ordered: BTreeMap<&str, u32> = self
            .token_to_id
            .iter()
            .map(|(token, id)| (token.as_str(), *id))
            .collect();
        let json = serde_json::to_string_pretty(&ordered)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a dictionary written by [`Dictionary::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read dictionary {}: {}", path.display(), e))?;
        let map: HashMap<String, u32> = serde_json::from_str(&content)?;
        Self::from_map(map).map_err(|e| anyhow!("Invalid dictionary {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_start_at_one() {
        let vocab = Vocabulary::from_tokens(["nsubj", "dobj", "root"]);
        let dict = Dictionary::from_vocabulary(&vocab);

        assert_eq!(dict.id("nsubj"), Some(1));
        assert_eq!(dict.id("dobj"), Some(2));
        assert_eq!(dict.id("root"), Some(3));
        assert_eq!(dict.id("unknown"), None);

        assert_eq!(dict.token(0), None);
        assert_eq!(dict.token(2), Some("dobj"));
        assert_eq!(dict.token(4), None);
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_save_load() {
        let dict = Dictionary::from_vocabulary(&Vocabulary::from_tokens(["<bos>", "the", "<eos>"]));
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("word_dict.json");

        dict.save(&path).unwrap();
        let loaded = Dictionary::load(&path).unwrap();

        assert_eq!(loaded, dict);
        assert_eq!(loaded.tokens(), dict.tokens());
    }

    #[test]
    fn test_load_rejects_zero_and_duplicate_ids() {
        let zero: HashMap<String, u32> = [("a".to_string(), 0)].into_iter().collect();
        assert!(Dictionary::from_map(zero).is_err());

        let duplicate: HashMap<String, u32> =
            [("a".to_string(), 1), ("b".to_string(), 1)].into_iter().collect();
        assert!(Dictionary::from_map(duplicate).is_err());

        let sparse: HashMap<String, u32> =
            [("a".to_string(), 1), ("b".to_string(), 3)].into_iter().collect();
        assert!(Dictionary::from_map(sparse).is_err());
    }
}
