// src/error.rs
use thiserror::Error;

/// Fatal errors. Anything recoverable (missing directory entries, blank hour
/// cells, an empty attendance file) is handled where it occurs and never
/// surfaces here.
#[derive(Error, Debug)]
pub enum TimecardError {
    #[error("Row {row}: malformed date '{value}' (expected YYYY-MM-DD)")]
    MalformedDate { row: usize, value: String },
    #[error("Row {row}: column '{column}' holds non-numeric hours '{value}'")]
    MalformedNumeric {
        row: usize,
        column: String,
        value: String,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rendered report is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] envy::Error),
}

pub type Result<T, E = TimecardError> = std::result::Result<T, E>;
