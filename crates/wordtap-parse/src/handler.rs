//! Callback trait between the content interpreter and glyph collection.

use wordtap_core::{Ctm, ExtractWarning};

/// A rendered character with everything needed to place it on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct CharEvent {
    /// Character code from the content stream (1 or 2 bytes).
    pub char_code: u32,
    /// Decoded text, if the font yields a mapping for this code.
    pub unicode: Option<String>,
    /// Font base name with any subset prefix removed.
    pub font_name: String,
    pub font_size: f64,
    /// Text matrix when the glyph was shown.
    pub text_matrix: Ctm,
    /// CTM when the glyph was shown (page rotation included).
    pub ctm: Ctm,
    /// Glyph width in glyph space (1/1000 of text space).
    pub width: f64,
    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub h_scaling: f64,
    pub rise: f64,
    /// Font descent in glyph space (negative below the baseline).
    pub descent: f64,
}

/// Receives interpreter output. Both methods default to no-ops.
pub trait ContentHandler {
    fn on_char(&mut self, _event: CharEvent) {}

    /// A non-fatal issue; interpretation continues with a fallback.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}
