//! Graphics state stack for `q`/`Q`/`cm`.
//!
//! Only the parts of the graphics state that affect glyph placement are
//! tracked: the current transformation matrix and the text parameters.

use wordtap_core::Ctm;

use crate::text_state::TextParams;

#[derive(Debug, Clone, PartialEq)]
struct SavedState {
    ctm: Ctm,
    text: TextParams,
}

/// The current CTM plus the stack of states saved by `q`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsStack {
    ctm: Ctm,
    saved: Vec<SavedState>,
}

impl Default for GraphicsStack {
    fn default() -> Self {
        Self::new(Ctm::identity())
    }
}

impl GraphicsStack {
    pub fn new(initial_ctm: Ctm) -> Self {
        Self {
            ctm: initial_ctm,
            saved: Vec::new(),
        }
    }

    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// `cm`: pre-multiply the CTM by `m`.
    pub fn concat(&mut self, m: &Ctm) {
        self.ctm = m.concat(&self.ctm);
    }

    /// `q`
    pub fn save(&mut self, text: &TextParams) {
        self.saved.push(SavedState {
            ctm: self.ctm,
            text: text.clone(),
        });
    }

    /// `Q`: returns the text parameters to restore, or `None` when the stack
    /// is empty (an unbalanced `Q` is ignored).
    pub fn restore(&mut self) -> Option<TextParams> {
        let state = self.saved.pop()?;
        self.ctm = state.ctm;
        Some(state.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_premultiplies() {
        let mut gs = GraphicsStack::new(Ctm::new(1.0, 0.0, 0.0, 1.0, 0.0, 100.0));
        gs.concat(&Ctm::new(2.0, 0.0, 0.0, 2.0, 10.0, 0.0));
        assert_eq!(*gs.ctm(), Ctm::new(2.0, 0.0, 0.0, 2.0, 10.0, 100.0));
    }

    #[test]
    fn test_save_restore() {
        let mut gs = GraphicsStack::default();
        let text = TextParams {
            font_size: 9.0,
            ..TextParams::default()
        };
        gs.save(&text);
        gs.concat(&Ctm::new(1.0, 0.0, 0.0, 1.0, 5.0, 5.0));
        assert_eq!(gs.depth(), 1);
        let restored = gs.restore();
        assert_eq!(restored.map(|t| t.font_size), Some(9.0));
        assert_eq!(*gs.ctm(), Ctm::identity());
        assert_eq!(gs.depth(), 0);
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut gs = GraphicsStack::new(Ctm::new(1.0, 0.0, 0.0, 1.0, 3.0, 4.0));
        assert_eq!(gs.restore(), None);
        assert_eq!(gs.ctm().e, 3.0);
    }
}
