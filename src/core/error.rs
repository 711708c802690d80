use std::path::PathBuf;
use thiserror::Error;

/// Per-file failures. Any of these aborts the file that produced it and
/// nothing else; the batch driver reports it and moves on.
#[derive(Debug, Error)]
pub enum StatError {
    #[error("sequence data at line {line} before any '>' header")]
    MalformedInput { line: usize },

    #[error("duplicate sequence identifier '{id}'")]
    DuplicateIdentifier { id: String },

    #[error("no sequence records")]
    EmptyInput,

    #[error("GC content undefined: no A/T/G/C bases")]
    UndefinedRatio,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file that dropped out of a batch, with the error that removed it.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: StatError,
}
