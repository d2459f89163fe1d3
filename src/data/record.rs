use serde::{Deserialize, Serialize};

/// One annotated sentence: the full dependency tree plus its gold compression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub source_tree: SourceTree,
    #[serde(rename = "compression_untransformed")]
    pub compression: Compression,
}

/// Dependency tree of the original sentence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceTree {
    #[serde(default)]
    pub node: Vec<Node>,
    #[serde(default)]
    pub edge: Vec<Edge>,
}

/// A tree node; the source data nests one or more words per node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub word: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub form: String,
    pub tag: String,
}

/// A labeled dependency edge. Compression edges may omit the parent and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub child_id: i64,
    #[serde(default)]
    pub label: String,
}

/// The gold compression: its surviving edges and its literal text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Compression {
    #[serde(default)]
    pub edge: Vec<Edge>,
    #[serde(default)]
    pub text: String,
}

impl Edge {
    pub fn new(parent_id: i64, child_id: i64, label: &str) -> Self {
        Self {
            parent_id: Some(parent_id),
            child_id,
            label: label.to_string(),
        }
    }
}

impl Word {
    pub fn new(id: i64, form: &str, tag: &str) -> Self {
        Self {
            id,
            form: form.to_string(),
            tag: tag.to_string(),
        }
    }
}

impl CorpusRecord {
    /// All words of the source tree, in node order
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.source_tree.node.iter().flat_map(|node| node.word.iter())
    }

    /// Number of dependency edges in the source tree
    pub fn edge_count(&self) -> usize {
        self.source_tree.edge.len()
    }
}
