//! wordtap: word bounding boxes from PDF picture books.
//!
//! For every page of a PDF, wordtap lists the words printed on it together
//! with their boxes in percentages of the page (top-left origin), ready to be
//! overlaid as tap targets on a rendered page image.
//!
//! # Architecture
//!
//! - **wordtap-core**: Backend-independent types, layout analysis and word extraction
//! - **wordtap-parse**: PDF reading and content stream interpretation
//! - **wordtap** (this crate): Public API that ties everything together
//!
//! # Example
//!
//! ```ignore
//! let pages = wordtap::extract_words("the_gruffalo.pdf")?;
//! for page in &pages {
//!     for word in &page.words {
//!         println!("{} {} {:.2} {:.2}", page.page_number, word.text, word.x, word.y);
//!     }
//! }
//! ```

mod document;
mod page;

pub use document::Document;
pub use page::Page;
pub use wordtap_core;
pub use wordtap_core::{
    BBox, Book, DocumentParseError, ExtractOptions, ExtractResult, ExtractWarning,
    ExtractWarningCode, Glyph, LayoutPage, LayoutParams, PageWords, TextBox, TextLine, WordBox,
    title_from_stem,
};
pub use wordtap_parse;

/// Extract the word boxes of every page with default layout parameters.
///
/// # Errors
///
/// Returns [`DocumentParseError`] if the file cannot be read, parsed or
/// interpreted. No partial result is returned.
#[cfg(feature = "std")]
pub fn extract_words(path: impl AsRef<std::path::Path>) -> Result<Vec<PageWords>, DocumentParseError> {
    extract_words_with(path, &LayoutParams::default(), ExtractOptions::default())
}

/// Extract the word boxes of every page with explicit layout parameters and
/// resource limits.
///
/// # Errors
///
/// Same as [`extract_words`], plus
/// [`DocumentParseError::ResourceLimitExceeded`] when a limit in `options`
/// is exceeded.
#[cfg(feature = "std")]
pub fn extract_words_with(
    path: impl AsRef<std::path::Path>,
    params: &LayoutParams,
    options: ExtractOptions,
) -> Result<Vec<PageWords>, DocumentParseError> {
    Document::open_file(path, Some(options))?.extract_words(params)
}

/// Extract a whole [`Book`]: a title plus the words of every page.
///
/// When `title` is `None` it is derived from the file name with
/// [`book_title`].
///
/// # Errors
///
/// Same as [`extract_words`].
#[cfg(feature = "std")]
pub fn extract_book(
    path: impl AsRef<std::path::Path>,
    title: Option<&str>,
) -> Result<Book, DocumentParseError> {
    extract_book_with(path, title, &LayoutParams::default(), ExtractOptions::default())
}

/// [`extract_book`] with explicit layout parameters and resource limits.
///
/// # Errors
///
/// Same as [`extract_words_with`].
#[cfg(feature = "std")]
pub fn extract_book_with(
    path: impl AsRef<std::path::Path>,
    title: Option<&str>,
    params: &LayoutParams,
    options: ExtractOptions,
) -> Result<Book, DocumentParseError> {
    let path = path.as_ref();
    let title = title.map_or_else(|| book_title(path), str::to_string);
    let pages = extract_words_with(path, params, options)?;
    Ok(Book::new(title, pages))
}

/// The default book title for a PDF path: its file stem through
/// [`title_from_stem`], so `the_very_hungry_caterpillar.pdf` becomes
/// "The Very Hungry Caterpillar". Empty when the path has no stem.
#[cfg(feature = "std")]
pub fn book_title(path: impl AsRef<std::path::Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| title_from_stem(&stem.to_string_lossy()))
        .unwrap_or_default()
}
