//! Page type holding the glyphs interpreted from one PDF page.

use wordtap_core::{
    ExtractWarning, Glyph, LayoutPage, LayoutParams, PageWords, extract_page_words,
};

/// A single interpreted page.
///
/// Holds the upright page size and every glyph shown by the content stream,
/// in content order. Constructed by [`Document::page`](crate::Document::page).
#[derive(Debug, Clone)]
pub struct Page {
    /// Page index (0-based).
    index: usize,
    /// Displayed page width in points.
    width: f64,
    /// Displayed page height in points.
    height: f64,
    /// Normalised `/Rotate` (0, 90, 180 or 270).
    rotation: i64,
    glyphs: Vec<Glyph>,
    /// Non-fatal issues seen while interpreting this page.
    warnings: Vec<ExtractWarning>,
}

impl Page {
    /// Create a page from already interpreted glyphs.
    pub fn new(index: usize, width: f64, height: f64, glyphs: Vec<Glyph>) -> Self {
        Self {
            index,
            width,
            height,
            rotation: 0,
            glyphs,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_rotation(mut self, rotation: i64) -> Self {
        self.rotation = rotation;
        self
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<ExtractWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// 0-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based page number, as used in word output.
    pub fn page_number(&self) -> usize {
        self.index + 1
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rotation(&self) -> i64 {
        self.rotation
    }

    /// Glyphs in content-stream order, bottom-left origin.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Group the glyphs into lines and text boxes.
    pub fn layout(&self, params: &LayoutParams) -> LayoutPage {
        LayoutPage::analyze(
            self.page_number(),
            self.width,
            self.height,
            &self.glyphs,
            params,
        )
    }

    /// Word boxes for this page as page percentages (top-left origin).
    pub fn words(&self, params: &LayoutParams) -> PageWords {
        extract_page_words(&self.layout(params))
    }
}
