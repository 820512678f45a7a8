use std::path::Path;

use tracing::info;
use wordtap::{Book, LayoutParams, book_title};

use crate::shared::{open_document, print_json};
use crate::words_cmd::collect_words;

pub fn run(
    file: &Path,
    title: Option<&str>,
    id: Option<&str>,
    params: &LayoutParams,
    pretty: bool,
) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page_indices: Vec<usize> = (0..doc.page_count()).collect();
    let pages = collect_words(&doc, &page_indices, params)?;

    let title = title.map_or_else(|| book_title(file), str::to_string);
    let mut book = Book::new(title, pages);
    if let Some(id) = id {
        book = book.with_id(id);
    }
    info!(title = %book.title, words = book.word_count(), "extracted book");
    print_json(&book, pretty)
}
