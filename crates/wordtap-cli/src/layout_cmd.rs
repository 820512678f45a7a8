use std::path::Path;

use wordtap::{BBox, LayoutPage, LayoutParams};

use crate::shared::{open_document, page_error, resolve_pages};

pub fn run(file: &Path, pages: Option<&str>, params: &LayoutParams) -> Result<(), i32> {
    let doc = open_document(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;

    let mut layouts = Vec::with_capacity(page_indices.len());
    for &idx in &page_indices {
        layouts.push(doc.layout(idx, params).map_err(|e| page_error(idx, e))?);
    }

    println!("page\tbox\tline\tx0\ty0\tx1\ty1\ttext");
    for layout in &layouts {
        for row in layout_rows(layout) {
            println!("{row}");
        }
    }
    Ok(())
}

/// One tab-separated row per text line, boxes and lines numbered from 1.
fn layout_rows(layout: &LayoutPage) -> Vec<String> {
    let mut rows = Vec::new();
    for (box_no, text_box) in layout.boxes.iter().enumerate() {
        for (line_no, line) in text_box.lines.iter().enumerate() {
            rows.push(format!(
                "{}\t{}\t{}\t{}\t{}",
                layout.page_number,
                box_no + 1,
                line_no + 1,
                format_bbox(&line.bbox),
                line.text().trim_end_matches('\n').replace('\t', " "),
            ));
        }
    }
    rows
}

fn format_bbox(bbox: &BBox) -> String {
    format!(
        "{:.2}\t{:.2}\t{:.2}\t{:.2}",
        bbox.x0, bbox.y0, bbox.x1, bbox.y1
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordtap::{Glyph, TextBox, TextLine};

    #[test]
    fn rows_number_boxes_and_lines() {
        let line = |text: &str, y: f64| TextLine {
            glyphs: vec![
                Glyph::new(text, BBox::new(10.0, y, 20.0, y + 10.0), "Helvetica", 10.0),
                Glyph::annotation("\n"),
            ],
            bbox: BBox::new(10.0, y, 20.0, y + 10.0),
        };
        let layout = LayoutPage {
            page_number: 2,
            width: 100.0,
            height: 100.0,
            boxes: vec![
                TextBox {
                    lines: vec![line("a", 80.0), line("b", 68.0)],
                    bbox: BBox::new(10.0, 68.0, 20.0, 90.0),
                },
                TextBox {
                    lines: vec![line("c", 20.0)],
                    bbox: BBox::new(10.0, 20.0, 20.0, 30.0),
                },
            ],
        };
        let rows = layout_rows(&layout);
        assert_eq!(
            rows,
            vec![
                "2\t1\t1\t10.00\t80.00\t20.00\t90.00\ta",
                "2\t1\t2\t10.00\t68.00\t20.00\t78.00\tb",
                "2\t2\t1\t10.00\t20.00\t20.00\t30.00\tc",
            ]
        );
    }
}
