//! Serde round-trip and JSON shape tests for the types the reader app consumes.

#![cfg(feature = "serde")]

use wordtap_core::*;

fn roundtrip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let json = serde_json::to_string(value).expect("serialize failed");
    let restored: T = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(*value, restored, "round-trip mismatch for JSON: {json}");
}

fn sample_page() -> LayoutPage {
    let glyphs: Vec<Glyph> = "Big cat"
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let x0 = 100.0 + i as f64 * 20.0;
            Glyph::new(
                c.to_string(),
                BBox::new(x0, 700.0, x0 + 20.0, 724.0),
                "Helvetica",
                24.0,
            )
        })
        .collect();
    LayoutPage::analyze(1, 612.0, 792.0, &glyphs, &LayoutParams::default())
}

#[test]
fn test_serde_layout_tree() {
    let page = sample_page();
    assert_eq!(page.lines().count(), 1);
    roundtrip(&page);
    roundtrip(&LayoutParams::default());
}

#[test]
fn test_serde_page_words() {
    let words = extract_page_words(&sample_page());
    assert_eq!(words.words.len(), 2);
    roundtrip(&words);

    let json = serde_json::to_value(&words).unwrap();
    assert_eq!(json["pageNumber"], 1);
    assert_eq!(json["words"][0]["text"], "Big");
    assert_eq!(json["words"][1]["text"], "cat");
    let keys: Vec<&String> = json["words"][0].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 5);
}

#[test]
fn test_serde_book_without_id() {
    let book = Book::new(title_from_stem("big_cat"), vec![extract_page_words(&sample_page())]);
    roundtrip(&book);
    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["title"], "Big Cat");
    assert!(json.get("id").is_none());

    // a missing id deserializes as None
    let restored: Book = serde_json::from_str(r#"{"title":"T","pages":[]}"#).unwrap();
    assert_eq!(restored, Book::new("T", Vec::new()));
}

#[test]
fn test_serde_warning() {
    let warning = ExtractWarning::new(ExtractWarningCode::MissingFont, "font /F3 not found")
        .on_page(2)
        .with_font("F3");
    roundtrip(&warning);
}
