use crate::geometry::BBox;

/// A single rendered character, or a geometry-less annotation inserted by
/// layout analysis (word gaps and line ends).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    /// Decoded text. Usually one character; ligatures and ToUnicode
    /// mappings may produce several, undecodable codes may produce none.
    pub text: String,
    /// Position on the page (bottom-left origin). `None` for annotations.
    pub bbox: Option<BBox>,
    /// Font resource base name, empty for annotations.
    pub fontname: String,
    /// Effective font size in points, 0 for annotations.
    pub size: f64,
}

impl Glyph {
    /// A rendered glyph with a position on the page.
    pub fn new(text: impl Into<String>, bbox: BBox, fontname: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            bbox: Some(bbox),
            fontname: fontname.into(),
            size,
        }
    }

    /// A layout annotation without geometry.
    pub fn annotation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox: None,
            fontname: String::new(),
            size: 0.0,
        }
    }

    /// True when the text is non-empty and consists only of whitespace.
    pub fn is_space(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }

    pub fn is_annotation(&self) -> bool {
        self.bbox.is_none()
    }

    pub fn width(&self) -> f64 {
        self.bbox.map_or(0.0, |b| b.width())
    }

    pub fn height(&self) -> f64 {
        self.bbox.map_or(0.0, |b| b.height())
    }
}
