//! Error and warning types for wordtap.
//!
//! [`DocumentParseError`] is the single fatal error of word extraction: the
//! document could not be opened, parsed or decoded. [`ExtractWarning`]
//! records non-fatal issues that extraction recovers from, and
//! [`ExtractOptions`] bounds the work done on hostile inputs.

use std::fmt;

/// The document could not be opened, parsed, or decoded.
///
/// Extraction never returns partial results alongside this error.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentParseError {
    /// The input could not be read.
    Io(String),
    /// The bytes are not a well-formed document.
    Syntax(String),
    /// A page or its content stream could not be decoded.
    Content(String),
    /// The document is encrypted.
    PasswordRequired,
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit (e.g. "max_pages").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The value that exceeded it.
        actual_value: usize,
    },
}

impl fmt::Display for DocumentParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentParseError::Io(msg) => write!(f, "I/O error: {msg}"),
            DocumentParseError::Syntax(msg) => write!(f, "parse error: {msg}"),
            DocumentParseError::Content(msg) => write!(f, "content error: {msg}"),
            DocumentParseError::PasswordRequired => {
                write!(f, "document is encrypted and requires a password")
            }
            DocumentParseError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
        }
    }
}

impl std::error::Error for DocumentParseError {}

impl From<std::io::Error> for DocumentParseError {
    fn from(err: std::io::Error) -> Self {
        DocumentParseError::Io(err.to_string())
    }
}

/// Machine-readable category of an [`ExtractWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtractWarningCode {
    /// A font referenced by `Tf` is not in the page resources.
    MissingFont,
    /// An object has an unexpected type or structure.
    MalformedObject,
    /// Character decoding fell back to a default mapping.
    EncodingFallback,
    /// An XObject was referenced but could not be used.
    UnsupportedXObject,
    /// A limit stopped part of the extraction.
    ResourceLimitReached,
}

impl ExtractWarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::MalformedObject => "MALFORMED_OBJECT",
            ExtractWarningCode::EncodingFallback => "ENCODING_FALLBACK",
            ExtractWarningCode::UnsupportedXObject => "UNSUPPORTED_XOBJECT",
            ExtractWarningCode::ResourceLimitReached => "RESOURCE_LIMIT_REACHED",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue encountered during extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    pub code: ExtractWarningCode,
    pub description: String,
    /// 0-based page index, if known.
    pub page: Option<usize>,
    pub font_name: Option<String>,
}

impl ExtractWarning {
    pub fn new(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            font_name: None,
        }
    }

    /// Attach the page index (builder pattern).
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach the font resource name (builder pattern).
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        Ok(())
    }
}

/// A value paired with the warnings collected while producing it.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    pub value: T,
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractResult<U> {
        ExtractResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Resource limits and warning behaviour for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Maximum nesting of Form XObjects (default: 10).
    pub max_recursion_depth: usize,
    /// Maximum input size in bytes (default: no limit).
    pub max_input_bytes: Option<usize>,
    /// Maximum number of pages in the document (default: no limit).
    pub max_pages: Option<usize>,
    /// Maximum glyphs produced by one page (default: 100,000).
    pub max_glyphs_per_page: usize,
    /// Whether warnings are kept in results (default: true).
    pub collect_warnings: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            max_input_bytes: None,
            max_pages: None,
            max_glyphs_per_page: 100_000,
            collect_warnings: true,
        }
    }
}

impl ExtractOptions {
    /// Fail with [`DocumentParseError::ResourceLimitExceeded`] when `actual`
    /// is above `limit`.
    pub fn check_limit(
        limit_name: &str,
        limit: Option<usize>,
        actual: usize,
    ) -> Result<(), DocumentParseError> {
        match limit {
            Some(limit_value) if actual > limit_value => {
                Err(DocumentParseError::ResourceLimitExceeded {
                    limit_name: limit_name.to_string(),
                    limit_value,
                    actual_value: actual,
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DocumentParseError::Syntax("bad xref".into()).to_string(),
            "parse error: bad xref"
        );
        assert_eq!(
            DocumentParseError::PasswordRequired.to_string(),
            "document is encrypted and requires a password"
        );
        let limit = DocumentParseError::ResourceLimitExceeded {
            limit_name: "max_pages".into(),
            limit_value: 2,
            actual_value: 5,
        };
        assert_eq!(
            limit.to_string(),
            "resource limit exceeded: max_pages (limit: 2, actual: 5)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: DocumentParseError = io.into();
        assert!(matches!(err, DocumentParseError::Io(ref m) if m.contains("missing.pdf")));
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&DocumentParseError::Content("x".into()));
    }

    #[test]
    fn test_warning_display_with_context() {
        let w = ExtractWarning::new(ExtractWarningCode::MissingFont, "font F9 not found")
            .on_page(2)
            .with_font("F9");
        assert_eq!(
            w.to_string(),
            "[MISSING_FONT] font F9 not found (page 2) [font F9]"
        );
    }

    #[test]
    fn test_extract_result_map_keeps_warnings() {
        let r = ExtractResult::with_warnings(
            2,
            vec![ExtractWarning::new(ExtractWarningCode::EncodingFallback, "x")],
        );
        let mapped = r.map(|v| v * 10);
        assert_eq!(mapped.value, 20);
        assert!(!mapped.is_clean());
        assert!(ExtractResult::ok(()).is_clean());
    }

    #[test]
    fn test_default_options() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.max_recursion_depth, 10);
        assert_eq!(opts.max_glyphs_per_page, 100_000);
        assert_eq!(opts.max_input_bytes, None);
        assert_eq!(opts.max_pages, None);
        assert!(opts.collect_warnings);
    }

    #[test]
    fn test_check_limit() {
        assert!(ExtractOptions::check_limit("max_pages", None, 1000).is_ok());
        assert!(ExtractOptions::check_limit("max_pages", Some(3), 3).is_ok());
        let err = ExtractOptions::check_limit("max_pages", Some(3), 4).unwrap_err();
        assert_eq!(
            err,
            DocumentParseError::ResourceLimitExceeded {
                limit_name: "max_pages".into(),
                limit_value: 3,
                actual_value: 4,
            }
        );
    }
}
