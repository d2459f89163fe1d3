pub mod record;
pub mod parser;
pub mod tree;

pub use record::{CorpusRecord, Compression, Edge, Node, SourceTree, Word};
pub use parser::CorpusParser;
pub use tree::{edge_order_irregularities, EdgeOrderIrregularity, Segment, TreeReader, WordEntry, WordTable};
