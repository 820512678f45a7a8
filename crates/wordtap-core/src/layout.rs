//! Layout analysis: grouping glyphs into text lines and lines into text boxes.
//!
//! Lines are built from glyphs in content-stream order. A new glyph joins the
//! current line when it overlaps the previous glyph vertically and sits close
//! enough horizontally. Word gaps inside a line are marked with a space
//! annotation and every line ends with a `"\n"` annotation. Lines are then
//! merged into boxes through a transitive neighbour relation.

use std::cmp::Ordering;

use crate::geometry::BBox;
use crate::glyph::Glyph;

/// Thresholds controlling layout analysis. All values are ratios of glyph or
/// line dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutParams {
    /// Gap (relative to the larger of the next glyph's width and height)
    /// above which a space annotation is inserted between two glyphs.
    pub word_margin: f64,
    /// Maximum horizontal distance (relative to the wider glyph) for two
    /// glyphs to be on the same line.
    pub char_margin: f64,
    /// Minimum vertical overlap (relative to the shorter glyph) for two
    /// glyphs to be on the same line.
    pub line_overlap: f64,
    /// Maximum vertical distance (relative to line height) for two lines to
    /// be in the same box.
    pub line_margin: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            word_margin: 0.1,
            char_margin: 2.0,
            line_overlap: 0.5,
            line_margin: 0.5,
        }
    }
}

/// A horizontal run of glyphs, terminated by a `"\n"` annotation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    pub glyphs: Vec<Glyph>,
    pub bbox: BBox,
}

impl TextLine {
    /// Concatenated glyph text, annotations included.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.text.as_str()).collect()
    }
}

/// A group of neighbouring lines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextBox {
    pub lines: Vec<TextLine>,
    pub bbox: BBox,
}

/// Result of laying out one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPage {
    /// 1-based page number.
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub boxes: Vec<TextBox>,
}

impl LayoutPage {
    /// Lay out `glyphs` for a page of the given size.
    pub fn analyze(
        page_number: usize,
        width: f64,
        height: f64,
        glyphs: &[Glyph],
        params: &LayoutParams,
    ) -> Self {
        Self {
            page_number,
            width,
            height,
            boxes: analyze_glyphs(glyphs, params),
        }
    }

    /// All lines in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.boxes.iter().flat_map(|b| b.lines.iter())
    }
}

/// Run the full analysis: glyphs → lines → boxes, sorted.
pub fn analyze_glyphs(glyphs: &[Glyph], params: &LayoutParams) -> Vec<TextBox> {
    let lines = group_glyphs_into_lines(glyphs, params);
    group_lines_into_boxes(lines, params)
}

/// Whether `b` continues the line that `a` ends.
fn is_horizontally_aligned(a: &BBox, b: &BBox, params: &LayoutParams) -> bool {
    let min_h = a.height().min(b.height());
    let max_w = a.width().max(b.width());
    a.is_voverlap(b)
        && min_h * params.line_overlap < a.voverlap(b)
        && a.hdistance(b) < max_w * params.char_margin
}

struct LineBuilder {
    glyphs: Vec<Glyph>,
    bbox: BBox,
    last_x1: f64,
}

impl LineBuilder {
    fn start(glyph: &Glyph, bbox: BBox) -> Self {
        Self {
            glyphs: vec![glyph.clone()],
            bbox,
            last_x1: bbox.x1,
        }
    }

    fn push(&mut self, glyph: &Glyph, bbox: BBox, word_margin: f64) {
        let margin = word_margin * bbox.width().max(bbox.height());
        if self.last_x1 < bbox.x0 - margin {
            self.glyphs.push(Glyph::annotation(" "));
        }
        self.last_x1 = bbox.x1;
        self.bbox = self.bbox.union(&bbox);
        self.glyphs.push(glyph.clone());
    }

    fn finish(mut self) -> TextLine {
        self.glyphs.push(Glyph::annotation("\n"));
        TextLine {
            glyphs: self.glyphs,
            bbox: self.bbox,
        }
    }
}

/// Group rendered glyphs into lines, preserving content order.
///
/// Annotations in the input are ignored; the output lines carry their own.
pub fn group_glyphs_into_lines(glyphs: &[Glyph], params: &LayoutParams) -> Vec<TextLine> {
    let rendered: Vec<(&Glyph, BBox)> = glyphs
        .iter()
        .filter_map(|g| g.bbox.map(|b| (g, b)))
        .collect();
    let Some(&(last, last_bbox)) = rendered.last() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current: Option<LineBuilder> = None;

    for pair in rendered.windows(2) {
        let (g0, b0) = pair[0];
        let (g1, b1) = pair[1];
        if is_horizontally_aligned(&b0, &b1, params) {
            let line = current.get_or_insert_with(|| LineBuilder::start(g0, b0));
            line.push(g1, b1, params.word_margin);
        } else if let Some(line) = current.take() {
            // g1 is not consumed here; it starts the next pair
            lines.push(line.finish());
        } else {
            lines.push(LineBuilder::start(g0, b0).finish());
        }
    }

    let line = current.unwrap_or_else(|| LineBuilder::start(last, last_bbox));
    lines.push(line.finish());
    lines
}

/// Whether `other` is a box-neighbour of `line`.
fn is_neighbor(line: &BBox, other: &BBox, line_margin: f64) -> bool {
    let d = line_margin * line.height();
    let search = BBox::new(line.x0, line.y0 - d, line.x1, line.y1 + d);
    search.intersects(other)
        && (line.height() - other.height()).abs() <= d
        && ((line.x0 - other.x0).abs() <= d
            || (line.x1 - other.x1).abs() <= d
            || (line.center_x() - other.center_x()).abs() <= d)
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb.max(ra)] = ra.min(rb);
        }
    }
}

fn by_top_desc(a: &BBox, b: &BBox) -> Ordering {
    b.y1.partial_cmp(&a.y1).unwrap_or(Ordering::Equal)
}

/// Merge lines into boxes and sort both levels into reading order.
pub fn group_lines_into_boxes(lines: Vec<TextLine>, params: &LayoutParams) -> Vec<TextBox> {
    let n = lines.len();
    let mut uf = UnionFind::new(n);
    for i in 0..n {
        for j in 0..n {
            if i != j && is_neighbor(&lines[i].bbox, &lines[j].bbox, params.line_margin) {
                uf.union(i, j);
            }
        }
    }

    // Keyed by root, in order of first appearance.
    let mut groups: Vec<(usize, Vec<TextLine>)> = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        let root = uf.find(i);
        match groups.iter_mut().find(|(r, _)| *r == root) {
            Some((_, members)) => members.push(line),
            None => groups.push((root, vec![line])),
        }
    }

    let mut boxes: Vec<TextBox> = groups
        .into_iter()
        .map(|(_, mut members)| {
            members.sort_by(|a, b| by_top_desc(&a.bbox, &b.bbox));
            let bbox = members
                .iter()
                .skip(1)
                .fold(members[0].bbox, |acc, l| acc.union(&l.bbox));
            TextBox {
                lines: members,
                bbox,
            }
        })
        .collect();

    boxes.sort_by(|a, b| {
        by_top_desc(&a.bbox, &b.bbox).then_with(|| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(Ordering::Equal)
        })
    });
    boxes
}
