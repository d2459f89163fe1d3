//! Pipeline configuration loaded from YAML

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::encoding::constants::{
    DEFAULT_LABEL, DEFAULT_VOCAB_SIZE, END_MARKER, LABEL_NORMALIZATION, NUMERIC_PLACEHOLDER,
    START_MARKER,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of words kept in the word vocabulary
    pub vocab_size: usize,
    pub start_marker: String,
    pub end_marker: String,
    /// Token that replaces any word containing a digit
    pub numeric_placeholder: String,
    pub lowercase_words: bool,
    pub normalize_numbers: bool,
    /// Label used when neither the raw nor the normalized label is known
    pub default_label: String,
    /// Alternate label spelling -> canonical label
    pub label_normalization: BTreeMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vocab_size: DEFAULT_VOCAB_SIZE,
            start_marker: START_MARKER.to_string(),
            end_marker: END_MARKER.to_string(),
            numeric_placeholder: NUMERIC_PLACEHOLDER.to_string(),
            lowercase_words: true,
            normalize_numbers: true,
            default_label: DEFAULT_LABEL.to_string(),
            label_normalization: LABEL_NORMALIZATION
                .iter()
                .map(|(alternate, canonical)| (alternate.to_string(), canonical.to_string()))
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }

        let yaml_str = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        let config: PipelineConfig = serde_yaml::from_str(&yaml_str)
            .map_err(|e| anyhow!("Invalid YAML config in {}: {}", path.display(), e))?;

        config.validate()?;
        log::debug!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Load from the given path, or fall back to defaults
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::from_yaml(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.vocab_size == 0 {
            return Err(anyhow!("vocab_size must be positive"));
        }
        if self.start_marker == self.end_marker {
            return Err(anyhow!("start and end markers must differ"));
        }
        for marker in [&self.start_marker, &self.end_marker, &self.numeric_placeholder] {
            if marker.is_empty() || marker.chars().any(char::is_whitespace) {
                return Err(anyhow!("reserved token '{}' must be a single non-empty token", marker));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.vocab_size, 50_000);
        assert_eq!(config.start_marker, "<bos>");
        assert_eq!(config.end_marker, "<eos>");
        assert_eq!(config.numeric_placeholder, "##");
        assert_eq!(config.default_label, "nn");
        assert_eq!(config.label_normalization.get("obj").map(String::as_str), Some("iobj"));
        assert_eq!(config.label_normalization.len(), 11);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("pipeline.yaml");
        fs::write(&path, "vocab_size: 10\nlowercase_words: false\n").unwrap();

        let config = PipelineConfig::from_yaml(&path).unwrap();
        assert_eq!(config.vocab_size, 10);
        assert!(!config.lowercase_words);
        assert!(config.normalize_numbers);
        assert_eq!(config.end_marker, "<eos>");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("pipeline.yaml");
        fs::write(&path, "start_marker: \"<s>\"\nend_marker: \"<s>\"\n").unwrap();
        assert!(PipelineConfig::from_yaml(&path).is_err());

        assert!(PipelineConfig::from_yaml(temp_dir.path().join("missing.yaml")).is_err());
    }
}
