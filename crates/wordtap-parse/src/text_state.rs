//! Text state for the content stream interpreter.
//!
//! Tracks the text object (BT/ET), font selection (Tf), spacing parameters
//! (Tc, Tw, Tz, TL, Ts, Tr) and the text and line matrices moved by
//! Tm, Td, TD, T* and glyph advances.

use wordtap_core::Ctm;

/// Text rendering mode (Tr operand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRenderMode {
    #[default]
    Fill,
    Stroke,
    FillStroke,
    /// Neither filled nor stroked. Still extracted.
    Invisible,
    FillClip,
    StrokeClip,
    FillStrokeClip,
    Clip,
}

impl TextRenderMode {
    pub fn from_i64(value: i64) -> Option<Self> {
        Some(match value {
            0 => Self::Fill,
            1 => Self::Stroke,
            2 => Self::FillStroke,
            3 => Self::Invisible,
            4 => Self::FillClip,
            5 => Self::StrokeClip,
            6 => Self::FillStrokeClip,
            7 => Self::Clip,
            _ => return None,
        })
    }
}

/// The part of the text state saved and restored by `q`/`Q`.
///
/// Text and line matrices are not part of the graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    pub char_spacing: f64,
    pub word_spacing: f64,
    /// Horizontal scaling in percent (100 = normal).
    pub h_scaling: f64,
    pub leading: f64,
    pub font_name: String,
    pub font_size: f64,
    pub render_mode: TextRenderMode,
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            render_mode: TextRenderMode::Fill,
            rise: 0.0,
        }
    }
}

/// Full text state: parameters plus the text and line matrices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextState {
    pub params: TextParams,
    in_text_object: bool,
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    pub fn line_matrix(&self) -> &Ctm {
        &self.line_matrix
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scaling_normalized(&self) -> f64 {
        self.params.h_scaling / 100.0
    }

    /// `BT`: reset both matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
        self.in_text_object = true;
    }

    /// `ET`
    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    /// `Tf`
    pub fn set_font(&mut self, font_name: impl Into<String>, font_size: f64) {
        self.params.font_name = font_name.into();
        self.params.font_size = font_size;
    }

    /// `Tm`: replace both matrices.
    pub fn set_text_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: translate the line matrix in text space and start a new line there.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: same as `-ty TL` followed by `tx ty Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.params.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`: same as `0 -TL Td`.
    pub fn move_to_next_line(&mut self) {
        let leading = self.params.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Move the text matrix horizontally by `tx` text space units.
    pub fn advance(&mut self, tx: f64) {
        self.text_matrix = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0).concat(&self.text_matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_defaults() {
        let ts = TextState::new();
        assert!(!ts.in_text_object());
        assert_eq!(ts.params.h_scaling, 100.0);
        assert_eq!(ts.h_scaling_normalized(), 1.0);
        assert_eq!(*ts.text_matrix(), Ctm::identity());
        assert_eq!(ts.params.render_mode, TextRenderMode::Fill);
    }

    #[test]
    fn test_begin_text_resets_matrices() {
        let mut ts = TextState::new();
        ts.set_text_matrix(Ctm::new(2.0, 0.0, 0.0, 2.0, 10.0, 10.0));
        ts.begin_text();
        assert!(ts.in_text_object());
        assert_eq!(*ts.text_matrix(), Ctm::identity());
        assert_eq!(*ts.line_matrix(), Ctm::identity());
        ts.end_text();
        assert!(!ts.in_text_object());
    }

    #[test]
    fn test_td_is_relative_to_line_start() {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.move_text_position(72.0, 720.0);
        ts.advance(50.0);
        ts.move_text_position(0.0, -14.0);
        assert_approx(ts.text_matrix().e, 72.0);
        assert_approx(ts.text_matrix().f, 706.0);
    }

    #[test]
    fn test_td_scaled_by_text_matrix() {
        let mut ts = TextState::new();
        ts.set_text_matrix(Ctm::new(2.0, 0.0, 0.0, 2.0, 100.0, 100.0));
        ts.move_text_position(10.0, 5.0);
        assert_approx(ts.text_matrix().e, 120.0);
        assert_approx(ts.text_matrix().f, 110.0);
    }

    #[test]
    fn test_capital_td_sets_leading() {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.move_text_position_and_set_leading(0.0, -12.0);
        assert_eq!(ts.params.leading, 12.0);
        ts.move_to_next_line();
        assert_approx(ts.text_matrix().f, -24.0);
    }

    #[test]
    fn test_advance_does_not_move_line_matrix() {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.advance(30.0);
        assert_approx(ts.text_matrix().e, 30.0);
        assert_approx(ts.line_matrix().e, 0.0);
    }

    #[test]
    fn test_render_mode_from_i64() {
        assert_eq!(TextRenderMode::from_i64(3), Some(TextRenderMode::Invisible));
        assert_eq!(TextRenderMode::from_i64(7), Some(TextRenderMode::Clip));
        assert_eq!(TextRenderMode::from_i64(8), None);
        assert_eq!(TextRenderMode::from_i64(-1), None);
    }

    #[test]
    fn test_set_font() {
        let mut ts = TextState::new();
        ts.set_font("F1", 24.0);
        assert_eq!(ts.params.font_name, "F1");
        assert_eq!(ts.params.font_size, 24.0);
    }
}
