//! PDF parsing backend trait.
//!
//! [`PdfBackend`] separates word extraction from the library that reads the
//! PDF file. The facade only needs page geometry and a stream of character
//! events, so that is all a backend provides.

use wordtap_core::{DocumentParseError, ExtractOptions};

use crate::handler::ContentHandler;
use crate::page_geometry::PageGeometry;

/// Operations a PDF reader must provide for word extraction.
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// for index in 0..MyBackend::page_count(&doc) {
///     let page = MyBackend::get_page(&doc, index)?;
///     let geometry = MyBackend::page_geometry(&doc, &page)?;
///     MyBackend::interpret_page(&doc, &page, &mut handler, &options)?;
/// }
/// ```
pub trait PdfBackend {
    /// The parsed PDF document type.
    type Document;

    /// A reference to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`DocumentParseError`].
    type Error: std::error::Error + Into<DocumentParseError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF or the document
    /// is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// Upright page size and the initial CTM for interpretation.
    ///
    /// # Errors
    ///
    /// Returns an error if the page box is malformed or has no area.
    fn page_geometry(doc: &Self::Document, page: &Self::Page)
    -> Result<PageGeometry, Self::Error>;

    /// Interpret the page content and report every shown character to
    /// `handler`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be decoded or a resource
    /// limit is exceeded.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}
