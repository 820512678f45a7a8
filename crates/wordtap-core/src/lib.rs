//! Backend-independent data types and algorithms for wordtap.
//!
//! This crate holds the geometry primitives, the glyph and layout model, the
//! layout analysis that groups glyphs into lines and boxes, and the word-box
//! extraction that turns a laid-out page into tap targets. It does not read
//! PDF files; see `wordtap-parse` for that.

pub mod error;
pub mod geometry;
pub mod glyph;
pub mod layout;
pub mod words;

pub use error::{
    DocumentParseError, ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode,
};
pub use geometry::{BBox, Ctm, Point};
pub use glyph::Glyph;
pub use layout::{
    LayoutPage, LayoutParams, TextBox, TextLine, analyze_glyphs, group_glyphs_into_lines,
    group_lines_into_boxes,
};
pub use words::{
    Book, PageWords, WordBox, clean_word_text, extract_line_words, extract_page_words,
    title_from_stem,
};
