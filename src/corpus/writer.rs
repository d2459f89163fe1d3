//! Flat corpus materialization: segment lines and gold compression lines.
//!
//! Output files are opened in append mode per call. Callers clear them with
//! [`truncate_outputs`] before a fresh run.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::tree::Segment;
use crate::errors::CorpusError;

/// Which segment fields are written, in (word, tag, label) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSelection {
    pub word: bool,
    pub tag: bool,
    pub label: bool,
}

impl FeatureSelection {
    pub const WORDS: Self = Self { word: true, tag: false, label: false };
    pub const TAGS: Self = Self { word: false, tag: true, label: false };
    pub const LABELS: Self = Self { word: false, tag: false, label: true };
    pub const ALL: Self = Self { word: true, tag: true, label: true };

    pub fn is_empty(&self) -> bool {
        !(self.word || self.tag || self.label)
    }
}

/// Format one sentence line. Every selected field is followed by a space.
pub fn segment_line(segments: &[Segment], selection: FeatureSelection) -> String {
    let mut line = String::new();
    for segment in segments {
        if selection.word {
            line.push_str(&segment.form);
            line.push(' ');
        }
        if selection.tag {
            line.push_str(&segment.tag);
            line.push(' ');
        }
        if selection.label {
            line.push_str(&segment.label);
            line.push(' ');
        }
    }
    line.push('\n');
    line
}

/// Format the gold compression text: last character dropped, final period re-appended
pub fn compression_line(text: &str) -> String {
    let mut chars = text.chars();
    chars.next_back();
    format!("{} . \n", chars.as_str())
}

pub fn write_segments<W: Write>(
    writer: &mut W,
    segments: &[Segment],
    selection: FeatureSelection,
) -> Result<(), CorpusError> {
    writer.write_all(segment_line(segments, selection).as_bytes())?;
    Ok(())
}

pub fn write_compression<W: Write>(writer: &mut W, text: &str) -> Result<(), CorpusError> {
    writer.write_all(compression_line(text).as_bytes())?;
    Ok(())
}

/// Open `path` for buffered appending, creating it if needed
pub fn open_append(path: &Path) -> Result<BufWriter<File>, CorpusError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

/// Append one sentence line per segment list to `path`
pub fn append_segments<'a, I>(path: &Path, sentences: I, selection: FeatureSelection) -> Result<usize, CorpusError>
where
    I: IntoIterator<Item = &'a [Segment]>,
{
    let mut writer = open_append(path)?;
    let mut count = 0;
    for segments in sentences {
        write_segments(&mut writer, segments, selection)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Empty the given output files, creating them if needed
pub fn truncate_outputs(paths: &[&Path]) -> Result<(), CorpusError> {
    for path in paths {
        File::create(path)?;
    }
    Ok(())
}
