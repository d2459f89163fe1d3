//! Flat corpus files: materialization, reading, and dimension checks

pub mod reader;
pub mod verify;
pub mod writer;

pub use reader::{LineReader, ReadOptions};
pub use verify::{check_dimensions, verify_dimensions};
pub use writer::{
    append_segments, compression_line, open_append, segment_line, truncate_outputs,
    write_compression, write_segments, FeatureSelection,
};
