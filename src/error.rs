//! Error types for the composer pipeline.

use std::io;
use thiserror::Error;

/// Result type alias for composer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a generation run.
///
/// Page overflow is not in here: it is handled by breaking the page.
#[derive(Error, Debug)]
pub enum Error {
    /// Output path unwritable, asset file unreadable, etc.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Font file missing or not a parsable TrueType/OpenType face.
    #[error("Font error: {0}")]
    Font(String),

    /// A content asset could not be decoded.
    #[error("Asset error: {0}")]
    Asset(#[from] serde_json::Error),

    /// The block sequence broke a composer rule (e.g. a late cover page).
    #[error("Composition error: {0}")]
    Composition(String),

    /// The PDF backend refused the layout.
    #[error("Rendering error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::Composition("cover must be page 1".to_string());
        assert_eq!(err.to_string(), "Composition error: cover must be page 1");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn json_error_conversion() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = bad.into();
        assert!(matches!(err, Error::Asset(_)));
    }
}
