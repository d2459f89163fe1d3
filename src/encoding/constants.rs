//! Reserved tokens and positional conventions shared by the encoder and aligner

/// Sentence-start boundary marker
pub const START_MARKER: &str = "<bos>";
/// Sentence-end boundary marker
pub const END_MARKER: &str = "<eos>";
/// Replacement for any whitespace-delimited token containing a digit
pub const NUMERIC_PLACEHOLDER: &str = "##";
/// Greedy pattern matched by numeric normalization
pub const NUMERIC_TOKEN_PATTERN: &str = r"\S*\d+\S*";

/// Size cap of the word vocabulary
pub const DEFAULT_VOCAB_SIZE: usize = 50_000;

/// Id reserved for "deleted" target positions and padding; never assigned to a token
pub const ABSENT_ID: u32 = 0;

/// Start and end markers in every encoded sequence
pub const BOUNDARY_MARKER_COUNT: usize = 2;
/// Sentence-final slot that the aligner always marks as kept
pub const TRAILING_PUNCTUATION_SLOT: usize = 1;
/// Shortest encoded sequence the aligner accepts: both markers plus one content token
pub const MIN_ALIGNABLE_LEN: usize = BOUNDARY_MARKER_COUNT + TRAILING_PUNCTUATION_SLOT;

/// Dependency label substituted when a label cannot be resolved
pub const DEFAULT_LABEL: &str = "nn";

/// Newer parser label spellings mapped to the labels the dictionaries were trained with
pub const LABEL_NORMALIZATION: [(&str, &str); 11] = [
    ("obj", "iobj"),
    ("cop", "conj"),
    ("compound", "nn"),
    ("nummod", "num"),
    ("punct", "p"),
    ("nmod", "pobj"),
    ("npmod", "npadvmod"),
    ("acl", "npadvmod"),
    ("case", "prep"),
    ("relcl", "rel"),
    ("oprd", "pred"),
];

/// Reverse-lookup display for deleted positions
pub const DELETE_DISPLAY: &str = "<delete>";
/// Reverse-lookup display for out-of-vocabulary ids
pub const UNKNOWN_DISPLAY: &str = "<unk>";

/// Persisted dictionary file names
pub const WORD_VOCAB_FILE: &str = "word_vocab.txt";
pub const WORD_DICT_FILE: &str = "word_dict.json";
pub const POS_DICT_FILE: &str = "pos_dict.json";
pub const DEP_DICT_FILE: &str = "dep_dict.json";

/// Materialized corpus file names
pub const WORDS_FILE: &str = "words.txt";
pub const TAGS_FILE: &str = "tags.txt";
pub const LABELS_FILE: &str = "labels.txt";
pub const COMPRESSIONS_FILE: &str = "compressions.txt";
