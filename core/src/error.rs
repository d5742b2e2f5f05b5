use thiserror::Error;

/// The corpus source does not carry the columns the index reads, or a row
/// cannot be decoded into the course schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("row {row} is unreadable: {reason}")]
    Unreadable { row: usize, reason: String },
    #[error("expected a JSON object per course, found {found}")]
    NotAnObject { found: &'static str },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("unsupported corpus format: {0}")]
    UnsupportedFormat(String),
}

/// Degenerate corpora that cannot produce a vector space.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexBuildError {
    #[error("corpus contains no records")]
    EmptyCorpus,
    #[error("empty vocabulary; no record yields indexable text")]
    EmptyVocabulary,
}
