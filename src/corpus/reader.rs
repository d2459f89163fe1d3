//! Tokenized-line reader for flat corpus files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;

use crate::config::PipelineConfig;
use crate::encoding::constants::NUMERIC_TOKEN_PATTERN;
use crate::errors::CorpusError;

/// Per-file normalization switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub lowercase: bool,
    pub normalize_numbers: bool,
}

impl ReadOptions {
    /// Tags and labels are read verbatim
    pub const RAW: Self = Self { lowercase: false, normalize_numbers: false };

    /// Options for the word file as configured
    pub fn for_words(config: &PipelineConfig) -> Self {
        Self {
            lowercase: config.lowercase_words,
            normalize_numbers: config.normalize_numbers,
        }
    }
}

/// Turns corpus lines into marker-wrapped token sequences
#[derive(Debug, Clone)]
pub struct LineReader {
    start_marker: String,
    end_marker: String,
    placeholder: String,
    numeric: Regex,
}

impl LineReader {
    pub fn new(config: &PipelineConfig) -> Result<Self, CorpusError> {
        Ok(Self {
            start_marker: config.start_marker.clone(),
            end_marker: config.end_marker.clone(),
            placeholder: config.numeric_placeholder.clone(),
            numeric: Regex::new(NUMERIC_TOKEN_PATTERN)?,
        })
    }

    /// Apply case folding and numeric normalization to a whole line, before splitting
    pub fn normalize(&self, line: &str, options: ReadOptions) -> String {
        let mut text = if options.lowercase {
            line.to_lowercase()
        } else {
            line.to_string()
        };
        if options.normalize_numbers {
            text = self
                .numeric
                .replace_all(&text, regex::NoExpand(&self.placeholder))
                .into_owned();
        }
        text
    }

    /// Tokenize one line (without its terminator). The markers are attached first,
    /// so normalization sees them as part of the line.
    pub fn tokenize(&self, line: &str, options: ReadOptions) -> Vec<String> {
        let wrapped = format!("{} {} {}", self.start_marker, line, self.end_marker);
        self.normalize(&wrapped, options)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Read every line of a stream, preserving order
    pub fn read<R: BufRead>(&self, reader: R, options: ReadOptions) -> Result<Vec<Vec<String>>, CorpusError> {
        let mut sentences = Vec::new();
        for line in reader.lines() {
            sentences.push(self.tokenize(&line?, options));
        }
        Ok(sentences)
    }

    pub fn read_file(&self, path: &Path, options: ReadOptions) -> Result<Vec<Vec<String>>, CorpusError> {
        let file = File::open(path)?;
        let sentences = self.read(BufReader::new(file), options)?;
        log::debug!("Read {} sentences from {}", sentences.len(), path.display());
        Ok(sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader() -> LineReader {
        LineReader::new(&PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_markers_wrap_every_line() {
        let input = "the cat sat . \nHello \n";
        let sentences = reader().read(Cursor::new(input), ReadOptions::RAW).unwrap();

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], vec!["<bos>", "the", "cat", "sat", ".", "<eos>"]);
        assert_eq!(sentences[1], vec!["<bos>", "Hello", "<eos>"]);
    }

    #[test]
    fn test_lowercase_applies_to_whole_line() {
        let options = ReadOptions { lowercase: true, normalize_numbers: false };
        let tokens = reader().tokenize("The CAT Sat", options);
        assert_eq!(tokens, vec!["<bos>", "the", "cat", "sat", "<eos>"]);
    }

    #[test]
    fn test_numeric_tokens_collapse_to_placeholder() {
        let options = ReadOptions { lowercase: true, normalize_numbers: true };
        let tokens = reader().tokenize("the 42nd ( 1990 ) 3.5% rank-2 votes", options);
        assert_eq!(tokens, vec!["<bos>", "the", "##", "(", "##", ")", "##", "##", "votes", "<eos>"]);
    }

    #[test]
    fn test_numeric_placeholder_is_not_expanded() {
        let mut config = PipelineConfig::default();
        config.numeric_placeholder = "$num".to_string();
        let reader = LineReader::new(&config).unwrap();
        let options = ReadOptions { lowercase: false, normalize_numbers: true };
        assert_eq!(reader.tokenize("in 2019", options), vec!["<bos>", "in", "$num", "<eos>"]);
    }

    #[test]
    fn test_markers_are_normalized_with_the_line() {
        let config = PipelineConfig {
            start_marker: "<S>".to_string(),
            end_marker: "<e1>".to_string(),
            ..PipelineConfig::default()
        };
        let reader = LineReader::new(&config).unwrap();

        let words = reader.tokenize("Cat", ReadOptions::for_words(&config));
        assert_eq!(words, vec!["<s>", "cat", "##"]);
        let tags = reader.tokenize("NN", ReadOptions::RAW);
        assert_eq!(tags, vec!["<S>", "NN", "<e1>"]);
    }

    #[test]
    fn test_empty_line_keeps_markers() {
        let sentences = reader().read(Cursor::new("\n"), ReadOptions::RAW).unwrap();
        assert_eq!(sentences, vec![vec!["<bos>".to_string(), "<eos>".to_string()]]);
    }

    #[test]
    fn test_windows_line_endings() {
        let sentences = reader().read(Cursor::new("a b\r\nc\r\n"), ReadOptions::RAW).unwrap();
        assert_eq!(sentences[0], vec!["<bos>", "a", "b", "<eos>"]);
        assert_eq!(sentences[1], vec!["<bos>", "c", "<eos>"]);
    }
}
