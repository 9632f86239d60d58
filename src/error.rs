//src/error.rs

use thiserror::Error;

/// Everything that can stop a transformation. None of these are recovered
/// from; the run ends and nothing is written.
#[derive(Error, Debug)]
pub enum FcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("delimited parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `index` is 0-based, `line` is the offending input line.
    #[error("missing field {index} in line: {line:?}")]
    MissingField { line: String, index: usize },

    #[error("non-numeric score {value:?} in line: {line:?}")]
    InvalidScore { line: String, value: String },

    #[error("malformed FASTA header: {0:?}")]
    MalformedHeader(String),

    /// The remote page for `key` has no usable BRITE section.
    #[error("BRITE lookup failed for {key}: {reason}")]
    Lookup { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, FcError>;

/// Returns field `index` of a tab-split line, or a `MissingField` error.
pub(crate) fn field<'a>(fields: &[&'a str], index: usize, line: &str) -> Result<&'a str> {
    fields.get(index).copied().ok_or_else(|| FcError::MissingField {
        line: line.to_string(),
        index,
    })
}
