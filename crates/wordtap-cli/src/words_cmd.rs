use std::path::Path;

use tracing::info;
use wordtap::{LayoutParams, PageWords};

use crate::shared::{ProgressReporter, open_document, page_error, print_json, resolve_pages};

pub fn run(file: &Path, pages: Option<&str>, params: &LayoutParams, pretty: bool) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let result = collect_words(&doc, &page_indices, params)?;
    info!(
        pages = result.len(),
        words = result.iter().map(|p| p.words.len()).sum::<usize>(),
        "extracted words"
    );
    print_json(&result, pretty)
}

/// Extract the selected pages. Any failing page aborts before output.
pub fn collect_words(
    doc: &wordtap::Document,
    page_indices: &[usize],
    params: &LayoutParams,
) -> Result<Vec<PageWords>, i32> {
    let progress = ProgressReporter::new(page_indices.len());
    let mut result = Vec::with_capacity(page_indices.len());
    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);
        let page = doc.page(idx).map_err(|e| page_error(idx, e))?;
        result.push(page.words(params));
    }
    progress.finish();
    Ok(result)
}
