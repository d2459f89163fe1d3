use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use anyhow::{Result, anyhow, Context};
use flate2::read::GzDecoder;
use serde::Deserialize;

use crate::data::record::CorpusRecord;

/// Wrapper object used by the distributed corpus files
#[derive(Debug, Deserialize)]
struct SentenceBundle {
    sentences: Vec<CorpusRecord>,
}

/// Parser for corpus files (plain or gzipped JSON)
#[derive(Debug, Default, Clone, Copy)]
pub struct CorpusParser;

impl CorpusParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a corpus file (regular or gzipped)
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> Result<Vec<CorpusRecord>> {
        let path = file_path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open corpus file {}", path.display()))?;

        // Check if file is gzipped by looking at magic bytes
        let mut reader = BufReader::new(file);
        let mut magic = [0u8; 2];
        let is_gzip = match reader.read_exact(&mut magic) {
            Ok(()) => magic == [0x1f, 0x8b],
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
            Err(e) => return Err(e.into()),
        };

        let file = File::open(path)?;
        let records = if is_gzip {
            self.parse_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            self.parse_reader(BufReader::new(file))
        };

        records.with_context(|| format!("Failed to parse corpus file {}", path.display()))
    }

    /// Parse several corpus files, concatenating their records in the given order
    pub fn parse_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<CorpusRecord>> {
        let mut records = Vec::new();
        for path in paths {
            let parsed = self.parse_file(path)?;
            log::info!("Read {} records from {}", parsed.len(), path.as_ref().display());
            records.extend(parsed);
        }
        Ok(records)
    }

    /// Parse from a reader
    pub fn parse_reader<R: Read>(&self, mut reader: BufReader<R>) -> Result<Vec<CorpusRecord>> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.parse_json(&content)
    }

    /// Parse a JSON string.
    ///
    /// Accepts a `{"sentences": [...]}` bundle, an array of records, a single
    /// record, or one record per line.
    pub fn parse_json(&self, json_str: &str) -> Result<Vec<CorpusRecord>> {
        if json_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        if let Ok(bundle) = serde_json::from_str::<SentenceBundle>(json_str) {
            return Ok(bundle.sentences);
        }

        if let Ok(records) = serde_json::from_str::<Vec<CorpusRecord>>(json_str) {
            return Ok(records);
        }

        if let Ok(record) = serde_json::from_str::<CorpusRecord>(json_str) {
            return Ok(vec![record]);
        }

        // Line-delimited records
        let mut records = Vec::new();
        for (line_num, line) in json_str.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: CorpusRecord = serde_json::from_str(line)
                .map_err(|e| anyhow!("Invalid corpus record on line {}: {}", line_num + 1, e))?;
            records.push(record);
        }

        Ok(records)
    }
}
