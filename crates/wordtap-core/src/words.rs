//! Word-box extraction from laid-out pages.
//!
//! Words are runs of non-space glyphs within one text line. Their boxes are
//! converted to percentages of the page with a top-left origin, the
//! coordinate system the reader app overlays on rendered page images.

use crate::geometry::BBox;
use crate::glyph::Glyph;
use crate::layout::{LayoutPage, TextLine};

/// A word with its box in page percentages (top-left origin).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WordBox {
    pub text: String,
    /// Left edge, percent of page width.
    pub x: f64,
    /// Top edge, percent of page height measured from the top.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Words found on one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PageWords {
    /// 1-based page number.
    pub page_number: usize,
    pub words: Vec<WordBox>,
}

/// A whole book: a title plus the words of every page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,
    pub title: String,
    pub pages: Vec<PageWords>,
}

impl Book {
    pub fn new(title: impl Into<String>, pages: Vec<PageWords>) -> Self {
        Self {
            id: None,
            title: title.into(),
            pages,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }
}

/// Derive a display title from a file stem: `_` and `-` become spaces and
/// each word is title-cased.
///
/// A letter is upper-cased when it follows a non-letter, every other letter
/// is lower-cased: `"the_very-HUNGRY_caterpillar"` → `"The Very Hungry Caterpillar"`.
pub fn title_from_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut prev_is_letter = false;
    for c in stem.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Remove every character outside `[A-Za-z0-9_'-]`.
pub fn clean_word_text(raw: &str) -> String {
    raw.chars().filter(|&c| is_word_char(c)).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '-')
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

impl WordBox {
    /// Convert a page-space bbox into a percentage box on a `page_width` ×
    /// `page_height` page. The result never exceeds the page bounds.
    pub fn from_page_bbox(text: String, bbox: &BBox, page_width: f64, page_height: f64) -> Self {
        let x = (bbox.x0 / page_width * 100.0).min(100.0).max(0.0);
        let y = ((page_height - bbox.y1) / page_height * 100.0)
            .min(100.0)
            .max(0.0);
        let width = (bbox.width() / page_width * 100.0).min(100.0 - x).max(0.0);
        let height = (bbox.height() / page_height * 100.0)
            .min(100.0 - y)
            .max(0.0);
        Self {
            text,
            x: round4(x),
            y: round4(y),
            width: round4(width),
            height: round4(height),
        }
    }
}

/// Accumulates raw text and geometry of the word being scanned.
#[derive(Default)]
struct WordAccumulator {
    raw: String,
    bbox: Option<BBox>,
}

impl WordAccumulator {
    fn push(&mut self, glyph: &Glyph) {
        self.raw.push_str(&glyph.text);
        if let Some(b) = glyph.bbox {
            self.bbox = Some(self.bbox.map_or(b, |acc| acc.union(&b)));
        }
    }

    fn flush(&mut self, page_width: f64, page_height: f64, out: &mut Vec<WordBox>) {
        let acc = std::mem::take(self);
        let Some(bbox) = acc.bbox else {
            return;
        };
        let text = clean_word_text(&acc.raw);
        if text.is_empty() {
            return;
        }
        out.push(WordBox::from_page_bbox(text, &bbox, page_width, page_height));
    }
}

/// Extract the words of one line. The end of the line always flushes.
pub fn extract_line_words(
    line: &TextLine,
    page_width: f64,
    page_height: f64,
    out: &mut Vec<WordBox>,
) {
    let mut acc = WordAccumulator::default();
    for glyph in &line.glyphs {
        if glyph.is_space() {
            acc.flush(page_width, page_height, out);
        } else {
            acc.push(glyph);
        }
    }
    acc.flush(page_width, page_height, out);
}

/// Extract every word on a laid-out page, in reading order.
pub fn extract_page_words(page: &LayoutPage) -> PageWords {
    let mut words = Vec::new();
    for line in page.lines() {
        extract_line_words(line, page.width, page.height, &mut words);
    }
    PageWords {
        page_number: page.page_number,
        words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutParams;

    fn glyph(text: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Glyph {
        Glyph::new(text, BBox::new(x0, y0, x1, y1), "Helvetica", y1 - y0)
    }

    fn page(glyphs: &[Glyph], width: f64, height: f64) -> LayoutPage {
        LayoutPage::analyze(1, width, height, glyphs, &LayoutParams::default())
    }

    fn texts(words: &PageWords) -> Vec<&str> {
        words.words.iter().map(|w| w.text.as_str()).collect()
    }

    #[test]
    fn test_two_letters_on_square_page() {
        let glyphs = vec![
            glyph("A", 0.0, 90.0, 10.0, 100.0),
            glyph(" ", 10.0, 90.0, 20.0, 100.0),
            glyph("B", 20.0, 90.0, 30.0, 100.0),
        ];
        let words = extract_page_words(&page(&glyphs, 100.0, 100.0));
        assert_eq!(
            words.words,
            vec![
                WordBox {
                    text: "A".into(),
                    x: 0.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                },
                WordBox {
                    text: "B".into(),
                    x: 20.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                },
            ]
        );
    }

    #[test]
    fn test_punctuation_only_page_yields_no_words() {
        let glyphs = vec![
            glyph("!", 0.0, 90.0, 5.0, 100.0),
            glyph(".", 5.0, 90.0, 10.0, 100.0),
            glyph(" ", 10.0, 90.0, 15.0, 100.0),
            glyph("?", 15.0, 90.0, 20.0, 100.0),
        ];
        let words = extract_page_words(&page(&glyphs, 100.0, 100.0));
        assert!(words.words.is_empty());
        assert_eq!(words.page_number, 1);
    }

    #[test]
    fn test_word_split_across_line_break() {
        let glyphs = vec![
            glyph("c", 0.0, 90.0, 5.0, 100.0),
            glyph("o", 5.0, 90.0, 10.0, 100.0),
            glyph("n", 10.0, 90.0, 15.0, 100.0),
            glyph("-", 15.0, 90.0, 20.0, 100.0),
            glyph("t", 0.0, 78.0, 5.0, 88.0),
            glyph("o", 5.0, 78.0, 10.0, 88.0),
        ];
        let words = extract_page_words(&page(&glyphs, 100.0, 100.0));
        assert_eq!(texts(&words), vec!["con-", "to"]);
        assert_eq!(words.words[1].y, 12.0);
    }

    #[test]
    fn test_punctuation_stripped_but_box_kept() {
        let glyphs = vec![
            glyph("\"", 0.0, 90.0, 5.0, 100.0),
            glyph("H", 5.0, 90.0, 10.0, 100.0),
            glyph("i", 10.0, 90.0, 15.0, 100.0),
            glyph("!", 15.0, 90.0, 20.0, 100.0),
        ];
        let words = extract_page_words(&page(&glyphs, 100.0, 100.0));
        assert_eq!(texts(&words), vec!["Hi"]);
        assert_eq!(words.words[0].x, 0.0);
        assert_eq!(words.words[0].width, 20.0);
    }

    #[test]
    fn test_apostrophe_and_hyphen_survive() {
        assert_eq!(clean_word_text("don't"), "don't");
        assert_eq!(clean_word_text("well-known,"), "well-known");
        assert_eq!(clean_word_text("snake_case"), "snake_case");
        assert_eq!(clean_word_text("café"), "caf");
        assert_eq!(clean_word_text("\u{2019}"), "");
        assert_eq!(clean_word_text(""), "");
    }

    #[test]
    fn test_clamping_at_page_edges() {
        // extends past the right and bottom edges
        let bbox = BBox::new(90.0, -5.0, 120.0, 5.0);
        let w = WordBox::from_page_bbox("Edge".into(), &bbox, 100.0, 100.0);
        assert_eq!(w.x, 90.0);
        assert_eq!(w.y, 95.0);
        assert_eq!(w.width, 10.0);
        assert_eq!(w.height, 5.0);
    }

    #[test]
    fn test_clamping_negative_origin() {
        let bbox = BBox::new(-10.0, 95.0, 10.0, 110.0);
        let w = WordBox::from_page_bbox("Top".into(), &bbox, 100.0, 100.0);
        assert_eq!(w.x, 0.0);
        assert_eq!(w.y, 0.0);
        assert_eq!(w.width, 20.0);
        assert_eq!(w.height, 15.0);
    }

    #[test]
    fn test_rounding_to_four_decimals() {
        let bbox = BBox::new(100.0, 0.0, 200.0, 100.0);
        let w = WordBox::from_page_bbox("x".into(), &bbox, 300.0, 300.0);
        assert_eq!(w.x, 33.3333);
        assert_eq!(w.width, 33.3333);
        assert_eq!(w.y, 66.6667);
    }

    #[test]
    fn test_annotation_only_word_is_dropped() {
        let line = TextLine {
            glyphs: vec![Glyph::annotation("x"), Glyph::annotation("\n")],
            bbox: BBox::new(0.0, 0.0, 1.0, 1.0),
        };
        let mut out = Vec::new();
        extract_line_words(&line, 100.0, 100.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_words_stay_within_bounds() {
        let glyphs: Vec<Glyph> = (0..40)
            .map(|i| {
                let x = i as f64 * 7.0;
                glyph(if i % 5 == 4 { " " } else { "w" }, x, 700.0, x + 6.0, 712.0)
            })
            .collect();
        let words = extract_page_words(&page(&glyphs, 200.0, 710.0));
        assert!(!words.words.is_empty());
        for w in &words.words {
            assert!((0.0..=100.0).contains(&w.x));
            assert!((0.0..=100.0).contains(&w.y));
            assert!(w.width >= 0.0 && w.width <= 100.0 - w.x + 1e-9);
            assert!(w.height >= 0.0 && w.height <= 100.0 - w.y + 1e-9);
        }
    }

    #[test]
    fn test_title_from_stem() {
        assert_eq!(title_from_stem("my_first-book"), "My First Book");
        assert_eq!(
            title_from_stem("the_very-HUNGRY_caterpillar"),
            "The Very Hungry Caterpillar"
        );
        assert_eq!(title_from_stem("book2go"), "Book2Go");
        assert_eq!(title_from_stem(""), "");
    }

    #[test]
    fn test_book_word_count_and_id() {
        let pages = vec![
            PageWords {
                page_number: 1,
                words: vec![WordBox::from_page_bbox(
                    "a".into(),
                    &BBox::new(0.0, 0.0, 1.0, 1.0),
                    10.0,
                    10.0,
                )],
            },
            PageWords {
                page_number: 2,
                words: vec![],
            },
        ];
        let book = Book::new("Title", pages).with_id("abc");
        assert_eq!(book.word_count(), 1);
        assert_eq!(book.id.as_deref(), Some("abc"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_page_words_json_shape() {
        let page = PageWords {
            page_number: 3,
            words: vec![WordBox {
                text: "Word".into(),
                x: 12.34,
                y: 5.0,
                width: 6.78,
                height: 2.1,
            }],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageNumber"], 3);
        assert_eq!(json["words"][0]["text"], "Word");
        assert_eq!(json["words"][0]["x"], 12.34);
        assert_eq!(json["words"][0]["height"], 2.1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_book_json_omits_missing_id() {
        let book = Book::new("T", vec![]);
        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(json, r#"{"title":"T","pages":[]}"#);
        let with_id = serde_json::to_value(book.with_id("x")).unwrap();
        assert_eq!(with_id["id"], "x");
    }
}
