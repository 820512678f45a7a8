//! Glyph positioning for the text-showing operators (Tj, TJ, ', ").
//!
//! Each character code is placed at the current text matrix, then the text
//! matrix advances by `((w0 / 1000) * Tfs + Tc + Tw) * Th`, where `Tw`
//! applies only to single-byte code 32.

use wordtap_core::Ctm;

use crate::text_state::TextState;

/// A positioned character code, before decoding and bbox computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGlyph {
    pub char_code: u32,
    /// Glyph width in glyph space (1/1000 of text space).
    pub width: f64,
    /// Text matrix at the moment the glyph was shown.
    pub text_matrix: Ctm,
}

/// An element of a `TJ` array, with strings already split into codes.
#[derive(Debug, Clone, PartialEq)]
pub enum TjElement {
    Codes(Vec<u32>),
    /// Thousandths of a text space unit; positive moves left.
    Adjustment(f64),
}

/// Show a run of character codes (`Tj`).
///
/// `word_spacing_applies` is false for fonts with multi-byte codes.
pub fn show_codes(
    text_state: &mut TextState,
    codes: &[u32],
    get_width: &dyn Fn(u32) -> f64,
    word_spacing_applies: bool,
) -> Vec<RawGlyph> {
    let mut glyphs = Vec::with_capacity(codes.len());
    for &char_code in codes {
        let width = get_width(char_code);
        glyphs.push(RawGlyph {
            char_code,
            width,
            text_matrix: *text_state.text_matrix(),
        });

        let params = &text_state.params;
        let word_spacing = if word_spacing_applies && char_code == 32 {
            params.word_spacing
        } else {
            0.0
        };
        let tx = ((width / 1000.0) * params.font_size + params.char_spacing + word_spacing)
            * text_state.h_scaling_normalized();
        text_state.advance(tx);
    }
    glyphs
}

/// Show strings interleaved with position adjustments (`TJ`).
pub fn show_with_positioning(
    text_state: &mut TextState,
    elements: &[TjElement],
    get_width: &dyn Fn(u32) -> f64,
    word_spacing_applies: bool,
) -> Vec<RawGlyph> {
    let mut glyphs = Vec::new();
    for element in elements {
        match element {
            TjElement::Codes(codes) => {
                glyphs.extend(show_codes(
                    text_state,
                    codes,
                    get_width,
                    word_spacing_applies,
                ));
            }
            TjElement::Adjustment(adj) => {
                let tx = -(adj / 1000.0)
                    * text_state.params.font_size
                    * text_state.h_scaling_normalized();
                text_state.advance(tx);
            }
        }
    }
    glyphs
}
