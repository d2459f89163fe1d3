//! Target alignment: keep/delete ids over the original sentence positions.
//!
//! The encoded word sequence is laid out as
//! `[start, w_1 .. w_n, final, end]`: two boundary markers and one trailing
//! slot (normally terminal punctuation) around the walked words. Walked words
//! kept by the compression copy their id from the encoded sequence, deleted
//! ones get [`ABSENT_ID`]. The trailing slot is always kept, whether or not the
//! compression lists it.

use std::collections::HashSet;

use crate::data::record::CorpusRecord;
use crate::data::tree::TreeReader;
use crate::encoding::constants::{
    ABSENT_ID, BOUNDARY_MARKER_COUNT, MIN_ALIGNABLE_LEN, TRAILING_PUNCTUATION_SLOT,
};
use crate::errors::CorpusError;

/// Number of original words walked for an encoded sequence of `encoded_len` positions
pub fn walk_len(encoded_len: usize) -> usize {
    encoded_len.saturating_sub(BOUNDARY_MARKER_COUNT + TRAILING_PUNCTUATION_SLOT)
}

/// Align one sentence.
///
/// `sentence_word_ids` are the original word ids in sentence order (root excluded),
/// `kept` the child ids of the compression edge list, and `encoded_words` the
/// already encoded word sequence of the same sentence.
pub fn align_target(
    record: usize,
    sentence_word_ids: &[i64],
    kept: &HashSet<i64>,
    encoded_words: &[u32],
) -> Result<Vec<u32>, CorpusError> {
    let len = encoded_words.len();
    if len < MIN_ALIGNABLE_LEN {
        return Err(CorpusError::SequenceTooShort { sentence: record, len });
    }

    let walk = walk_len(len);
    if sentence_word_ids.len() < walk {
        return Err(CorpusError::AlignmentOverrun {
            record,
            needed: walk,
            available: sentence_word_ids.len(),
        });
    }

    let mut target = Vec::with_capacity(len);
    target.push(encoded_words[0]);

    for (offset, word_id) in sentence_word_ids[..walk].iter().enumerate() {
        if kept.contains(word_id) {
            target.push(encoded_words[offset + 1]);
        } else {
            target.push(ABSENT_ID);
        }
    }

    target.push(encoded_words[len - 2]);
    target.push(encoded_words[len - 1]);
    Ok(target)
}

/// Aligns corpus records against their encoded word sequences
#[derive(Debug, Default, Clone, Copy)]
pub struct TargetAligner;

impl TargetAligner {
    pub fn new() -> Self {
        Self
    }

    pub fn align(
        &self,
        record_index: usize,
        record: &CorpusRecord,
        encoded_words: &[u32],
    ) -> Result<Vec<u32>, CorpusError> {
        let reader = TreeReader::new(record_index, record);
        let kept = reader.compression_word_ids()?;
        let sentence_word_ids = reader.word_table().sentence_word_ids();
        align_target(record_index, &sentence_word_ids, &kept, encoded_words)
    }
}
