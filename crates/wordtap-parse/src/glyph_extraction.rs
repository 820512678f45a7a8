//! Glyph bounding boxes from interpreter events.
//!
//! The glyph rectangle spans the advance width horizontally and exactly one
//! font size vertically, starting at the font descent:
//! `(0, d) – (w, d + 1)` in glyph-normalised space, mapped to the page by the
//! text rendering matrix `Trm = [Tfs·Th, 0, 0, Tfs, 0, Trise] × Tm × CTM`.

use wordtap_core::{BBox, Ctm, Glyph, Point};

use crate::handler::CharEvent;

/// Convert a [`CharEvent`] into a [`Glyph`] in page space (bottom-left origin).
///
/// Text falls back from the decoded mapping to the code as a Unicode scalar,
/// then to U+FFFD.
pub fn glyph_from_event(event: &CharEvent) -> Glyph {
    let font_matrix = Ctm::new(
        event.font_size * event.h_scaling,
        0.0,
        0.0,
        event.font_size,
        0.0,
        event.rise,
    );
    let trm = font_matrix.concat(&event.text_matrix).concat(&event.ctm);

    let w = event.width / 1000.0;
    let d = event.descent / 1000.0;
    let corners = [
        trm.transform_point(Point::new(0.0, d)),
        trm.transform_point(Point::new(w, d)),
        trm.transform_point(Point::new(w, d + 1.0)),
        trm.transform_point(Point::new(0.0, d + 1.0)),
    ];
    let origin = corners[0];
    let bbox = BBox::from_points(&corners)
        .unwrap_or_else(|| BBox::new(origin.x, origin.y, origin.x, origin.y));

    let text = event.unicode.clone().unwrap_or_else(|| {
        char::from_u32(event.char_code)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
            .to_string()
    });

    Glyph::new(text, bbox, event.font_name.clone(), event.font_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn event() -> CharEvent {
        CharEvent {
            char_code: 65,
            unicode: Some("A".to_string()),
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            text_matrix: Ctm::new(1.0, 0.0, 0.0, 1.0, 72.0, 720.0),
            ctm: Ctm::identity(),
            width: 667.0,
            h_scaling: 1.0,
            rise: 0.0,
            descent: -207.0,
        }
    }

    #[test]
    fn test_upright_glyph_bbox() {
        let g = glyph_from_event(&event());
        let b = g.bbox.unwrap();
        assert_approx(b.x0, 72.0);
        assert_approx(b.x1, 72.0 + 0.667 * 12.0);
        assert_approx(b.y0, 720.0 - 0.207 * 12.0);
        assert_approx(b.y1, 720.0 - 0.207 * 12.0 + 12.0);
        assert_eq!(g.text, "A");
        assert_eq!(g.fontname, "Helvetica");
        assert_eq!(g.size, 12.0);
    }

    #[test]
    fn test_height_is_font_size() {
        let g = glyph_from_event(&CharEvent {
            descent: 0.0,
            ..event()
        });
        assert_approx(g.height(), 12.0);
    }

    #[test]
    fn test_text_matrix_scaling() {
        let g = glyph_from_event(&CharEvent {
            font_size: 1.0,
            text_matrix: Ctm::new(20.0, 0.0, 0.0, 20.0, 0.0, 0.0),
            descent: 0.0,
            width: 500.0,
            ..event()
        });
        let b = g.bbox.unwrap();
        assert_approx(b.width(), 10.0);
        assert_approx(b.height(), 20.0);
    }

    #[test]
    fn test_rise_and_h_scaling() {
        let g = glyph_from_event(&CharEvent {
            h_scaling: 0.5,
            rise: 3.0,
            descent: 0.0,
            text_matrix: Ctm::identity(),
            ..event()
        });
        let b = g.bbox.unwrap();
        assert_approx(b.width(), 0.667 * 12.0 * 0.5);
        assert_approx(b.y0, 3.0);
    }

    #[test]
    fn test_rotated_ctm() {
        // 90° page rotation on a 100pt wide page
        let g = glyph_from_event(&CharEvent {
            text_matrix: Ctm::new(1.0, 0.0, 0.0, 1.0, 10.0, 20.0),
            ctm: Ctm::new(0.0, -1.0, 1.0, 0.0, 0.0, 100.0),
            descent: 0.0,
            width: 500.0,
            ..event()
        });
        let b = g.bbox.unwrap();
        // x' = y, y' = 100 - x
        assert_approx(b.x0, 20.0);
        assert_approx(b.x1, 32.0);
        assert_approx(b.y0, 84.0);
        assert_approx(b.y1, 90.0);
    }

    #[test]
    fn test_text_fallbacks() {
        let g = glyph_from_event(&CharEvent {
            unicode: None,
            char_code: 0x42,
            ..event()
        });
        assert_eq!(g.text, "B");

        let g = glyph_from_event(&CharEvent {
            unicode: None,
            char_code: 0xD800,
            ..event()
        });
        assert_eq!(g.text, "\u{FFFD}");
    }
}
