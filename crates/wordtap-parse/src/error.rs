//! Error types for the parsing and interpreter layers.
//!
//! Uses [`thiserror`] for derivation. [`BackendError`] converts into
//! [`DocumentParseError`] at the crate boundary.

use thiserror::Error;
use wordtap_core::DocumentParseError;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] DocumentParseError),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<BackendError> for DocumentParseError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => DocumentParseError::Syntax(msg),
            BackendError::Io(e) => DocumentParseError::Io(e.to_string()),
            BackendError::Interpreter(msg) => DocumentParseError::Content(msg),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_parse_display() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn backend_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn backend_error_to_document_error() {
        let syntax: DocumentParseError = BackendError::Parse("bad syntax".into()).into();
        assert_eq!(syntax, DocumentParseError::Syntax("bad syntax".into()));

        let content: DocumentParseError = BackendError::Interpreter("bad stream".into()).into();
        assert_eq!(content, DocumentParseError::Content("bad stream".into()));
    }

    #[test]
    fn backend_error_core_passthrough() {
        let original = DocumentParseError::ResourceLimitExceeded {
            limit_name: "max_input_bytes".to_string(),
            limit_value: 1024,
            actual_value: 2048,
        };
        let backend = BackendError::Core(original.clone());
        let converted: DocumentParseError = backend.into();
        assert_eq!(converted, original);
    }

    #[test]
    fn backend_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(BackendError::Parse("test".to_string()));
        assert_eq!(err.to_string(), "PDF parse error: test");
    }
}
