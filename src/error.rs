use std::io;

use thiserror::Error;

/// Process-terminating conditions. The pager and B-tree never return a
/// recoverable `Result` for these; they either succeed or the caller is
/// expected to bail out to `main` and exit nonzero.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("Unable to open file")]
    OpenFile,

    #[error("Db file is not a whole number of pages. Corrupt file.")]
    CorruptFile,

    #[error("Tried to fetch page number out of bounds. {requested} > {limit}")]
    PageOutOfBounds { requested: u32, limit: u32 },

    #[error("Tried to flush null page")]
    FlushNullPage,

    #[error("Needed to search an internal node, but internal nodes are not implemented")]
    InternalNodeSearch,

    #[error("Needed to split a leaf node, but leaf splitting is not implemented")]
    LeafSplitNotImplemented,

    #[error("Error reading input")]
    ReadInput,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type FatalResult<T> = Result<T, FatalError>;

/// Per-line parse errors. Recoverable: the REPL prints the message and
/// continues.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Syntax error. Could not parse statement")]
    SyntaxError,

    #[error("String is too long")]
    StringTooLong,

    #[error("Id must be positive")]
    InvalidId,

    #[error("Unrecognized keyword at start of [{0}]")]
    UnrecognizedStatement(String),
}

/// Per-statement execution errors. Recoverable: the REPL prints the message
/// and continues.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("Error: Table full")]
    TableFull,

    #[error("Error: Duplicate key")]
    DuplicateKey,
}
