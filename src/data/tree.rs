//! Dependency-tree reading: word tables, ordered segments and compression ids.
//!
//! Segments follow the tree's edge enumeration order. That order is taken as
//! the sentence order even though the source data does not guarantee it;
//! [`edge_order_irregularities`] surfaces records where the two disagree.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::data::record::CorpusRecord;
use crate::errors::CorpusError;

/// Surface form and tag of one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub form: String,
    pub tag: String,
}

/// A (form, tag, dependency label) triple for one child word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub form: String,
    pub tag: String,
    pub label: String,
}

/// Word id -> (form, tag) table of one record, ordered by word id
#[derive(Debug, Clone, Default)]
pub struct WordTable {
    entries: BTreeMap<i64, WordEntry>,
}

impl WordTable {
    pub fn from_record(record: &CorpusRecord) -> Self {
        let entries = record
            .words()
            .map(|word| {
                (
                    word.id,
                    WordEntry {
                        form: word.form.clone(),
                        tag: word.tag.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, word_id: i64) -> Option<&WordEntry> {
        self.entries.get(&word_id)
    }

    /// Word ids of the sentence proper. The first entry is the synthetic root and is skipped.
    pub fn sentence_word_ids(&self) -> Vec<i64> {
        self.entries.keys().skip(1).copied().collect()
    }
}

/// Reads one corpus record into its word table and segment list
pub struct TreeReader<'a> {
    record_index: usize,
    record: &'a CorpusRecord,
    table: WordTable,
}

impl<'a> TreeReader<'a> {
    pub fn new(record_index: usize, record: &'a CorpusRecord) -> Self {
        Self {
            record_index,
            record,
            table: WordTable::from_record(record),
        }
    }

    pub fn word_table(&self) -> &WordTable {
        &self.table
    }

    /// Segments in edge-list order. An edge naming an unknown child is a corpus defect.
    pub fn segments(&self) -> Result<Vec<Segment>, CorpusError> {
        self.record
            .source_tree
            .edge
            .iter()
            .map(|edge| {
                let child = self.table.get(edge.child_id).ok_or(CorpusError::UnknownWordId {
                    record: self.record_index,
                    word_id: edge.child_id,
                })?;
                Ok(Segment {
                    form: child.form.clone(),
                    tag: child.tag.clone(),
                    label: edge.label.clone(),
                })
            })
            .collect()
    }

    /// Ids of the original words kept by the compression
    pub fn compression_word_ids(&self) -> Result<HashSet<i64>, CorpusError> {
        let mut kept = HashSet::with_capacity(self.record.compression.edge.len());
        for edge in &self.record.compression.edge {
            if self.table.get(edge.child_id).is_none() {
                return Err(CorpusError::UnknownWordId {
                    record: self.record_index,
                    word_id: edge.child_id,
                });
            }
            kept.insert(edge.child_id);
        }
        Ok(kept)
    }
}

/// A record whose edge order is not the numeric order of its child ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeOrderIrregularity {
    pub record: usize,
    /// Position in the edge list where the child id first decreases
    pub edge_position: usize,
    pub previous_child: i64,
    pub child: i64,
}

/// Flags records whose edge enumeration disagrees with word-id order.
///
/// Advisory only: callers log the result, they never fail on it.
pub fn edge_order_irregularities(records: &[CorpusRecord]) -> Vec<EdgeOrderIrregularity> {
    let mut found = Vec::new();
    for (record_index, record) in records.iter().enumerate() {
        let edges = &record.source_tree.edge;
        let first_break = edges
            .windows(2)
            .position(|pair| pair[1].child_id <= pair[0].child_id);
        if let Some(position) = first_break {
            let irregularity = EdgeOrderIrregularity {
                record: record_index,
                edge_position: position + 1,
                previous_child: edges[position].child_id,
                child: edges[position + 1].child_id,
            };
            log::warn!(
                "record {}: edge {} visits word {} after word {}; sentence order is approximate",
                irregularity.record,
                irregularity.edge_position,
                irregularity.child,
                irregularity.previous_child
            );
            found.push(irregularity);
        }
    }
    found
}
