//! Top-level document type for opening PDFs and extracting word boxes.

use tracing::debug;
use wordtap_core::{
    DocumentParseError, ExtractOptions, ExtractResult, ExtractWarning, Glyph, LayoutPage,
    LayoutParams, PageWords,
};
use wordtap_parse::{
    CharEvent, ContentHandler, LopdfBackend, LopdfDocument, PdfBackend, glyph_from_event,
};

use crate::Page;

/// A PDF document opened for word extraction.
///
/// The document is immutable after opening; every extraction call
/// re-interprets the pages it needs, so repeated calls give identical
/// results.
///
/// # Example
///
/// ```ignore
/// let doc = Document::open(bytes, None)?;
/// let words = doc.extract_words(&LayoutParams::default())?;
/// ```
pub struct Document {
    doc: LopdfDocument,
    options: ExtractOptions,
}

/// Internal handler that turns character events into glyphs.
struct GlyphCollector {
    glyphs: Vec<Glyph>,
    warnings: Vec<ExtractWarning>,
    page_index: usize,
}

impl GlyphCollector {
    fn new(page_index: usize) -> Self {
        Self {
            glyphs: Vec::new(),
            warnings: Vec::new(),
            page_index,
        }
    }
}

impl ContentHandler for GlyphCollector {
    fn on_char(&mut self, event: CharEvent) {
        self.glyphs.push(glyph_from_event(&event));
    }

    fn on_warning(&mut self, mut warning: ExtractWarning) {
        if warning.page.is_none() {
            warning.page = Some(self.page_index);
        }
        self.warnings.push(warning);
    }
}

impl Document {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentParseError::Io`] if the file cannot be read, or any
    /// error [`Document::open`] returns.
    #[cfg(feature = "std")]
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, DocumentParseError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| DocumentParseError::Io(format!("{}: {e}", path.display())))?;
        Self::open(&bytes, options)
    }

    /// Open a PDF document from bytes.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw PDF file bytes.
    /// * `options` - Resource limits and warning behaviour. Uses defaults if `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentParseError::PasswordRequired`] if the PDF is encrypted,
    /// [`DocumentParseError::ResourceLimitExceeded`] if the input is larger
    /// than `max_input_bytes` or has more than `max_pages` pages, and
    /// [`DocumentParseError::Syntax`] if the bytes are not a readable PDF.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, DocumentParseError> {
        let options = options.unwrap_or_default();
        ExtractOptions::check_limit("max_input_bytes", options.max_input_bytes, bytes.len())?;
        let doc = LopdfBackend::open(bytes).map_err(DocumentParseError::from)?;
        Self::from_doc(doc, options)
    }

    fn from_doc(doc: LopdfDocument, options: ExtractOptions) -> Result<Self, DocumentParseError> {
        let page_count = LopdfBackend::page_count(&doc);
        ExtractOptions::check_limit("max_pages", options.max_pages, page_count)?;
        Ok(Self { doc, options })
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Return the number of pages in the document.
    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Interpret one page (0-based index).
    ///
    /// # Errors
    ///
    /// Returns [`DocumentParseError`] if the index is out of range, the page
    /// geometry is unusable or the content stream cannot be interpreted.
    pub fn page(&self, index: usize) -> Result<Page, DocumentParseError> {
        let lopdf_page = LopdfBackend::get_page(&self.doc, index)?;
        let geometry = LopdfBackend::page_geometry(&self.doc, &lopdf_page)?;

        let mut handler = GlyphCollector::new(index);
        LopdfBackend::interpret_page(&self.doc, &lopdf_page, &mut handler, &self.options)?;
        debug!(
            page = index,
            width = geometry.width(),
            height = geometry.height(),
            glyphs = handler.glyphs.len(),
            "extracted page glyphs"
        );

        Ok(
            Page::new(index, geometry.width(), geometry.height(), handler.glyphs)
                .with_rotation(geometry.rotation())
                .with_warnings(handler.warnings),
        )
    }

    /// Glyphs of one page in content order (bottom-left origin).
    ///
    /// # Errors
    ///
    /// Same as [`Document::page`].
    pub fn glyphs(&self, index: usize) -> Result<Vec<Glyph>, DocumentParseError> {
        let page = self.page(index)?;
        Ok(page.glyphs().to_vec())
    }

    /// Layout tree (boxes, lines, glyphs) of one page.
    ///
    /// # Errors
    ///
    /// Same as [`Document::page`].
    pub fn layout(
        &self,
        index: usize,
        params: &LayoutParams,
    ) -> Result<LayoutPage, DocumentParseError> {
        Ok(self.page(index)?.layout(params))
    }

    /// Word boxes of every page, in page order.
    ///
    /// Fails as a whole: a page that cannot be interpreted aborts the call
    /// and no partial list is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`DocumentParseError`] raised by any page.
    pub fn extract_words(&self, params: &LayoutParams) -> Result<Vec<PageWords>, DocumentParseError> {
        let indices: Vec<usize> = (0..self.page_count()).collect();
        self.extract_pages(&indices, params)
    }

    /// Word boxes of the given pages (0-based indices), in the order given.
    ///
    /// # Errors
    ///
    /// Returns the first [`DocumentParseError`] raised by any page,
    /// including an out-of-range index.
    pub fn extract_pages(
        &self,
        indices: &[usize],
        params: &LayoutParams,
    ) -> Result<Vec<PageWords>, DocumentParseError> {
        Ok(self.extract_pages_with_warnings(indices, params)?.value)
    }

    /// Like [`Document::extract_pages`], also returning the warnings
    /// collected while interpreting the pages.
    ///
    /// Warnings are only collected when
    /// [`ExtractOptions::collect_warnings`] is set.
    ///
    /// # Errors
    ///
    /// Same as [`Document::extract_pages`].
    pub fn extract_pages_with_warnings(
        &self,
        indices: &[usize],
        params: &LayoutParams,
    ) -> Result<ExtractResult<Vec<PageWords>>, DocumentParseError> {
        let mut pages = Vec::with_capacity(indices.len());
        let mut warnings = Vec::new();
        for &index in indices {
            let page = self.page(index)?;
            let words = page.words(params);
            debug!(page = index, words = words.words.len(), "extracted words");
            warnings.extend_from_slice(page.warnings());
            pages.push(words);
        }
        Ok(ExtractResult::with_warnings(pages, warnings))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("page_count", &self.page_count())
            .field("options", &self.options)
            .finish()
    }
}
