//! Error types for the pdftoc library.

use std::io;
use thiserror::Error;

/// Result type alias for pdftoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
///
/// Every variant is recoverable at the batch level: a failing document is
/// skipped and reported, and configuration problems fall back to safe
/// defaults. Nothing here aborts a whole run.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The line extractor could not parse a PDF (corrupt, encrypted,
    /// unsupported). The document is skipped; the batch continues.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The native outline entries are malformed or inconsistent.
    /// Treated as absent; the heuristic path runs instead.
    #[error("embedded outline error: {0}")]
    EmbeddedToc(String),

    /// Invalid configuration input (e.g. an unparseable language file).
    /// Unknown language codes never produce this; they fall back to the
    /// default pattern.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error serializing the final result.
    #[error("rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Extraction(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Extraction("bad xref".to_string());
        assert_eq!(err.to_string(), "extraction error: bad xref");

        let err = Error::Config("languages.json: trailing comma".to_string());
        assert!(err.to_string().starts_with("configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
