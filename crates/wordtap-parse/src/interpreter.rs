//! Content stream interpreter.
//!
//! Runs tokenized operators against the graphics and text state and reports
//! every shown character to a [`ContentHandler`]. Form XObjects are
//! interpreted in place, so their text joins the page's glyph stream.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Stream};
use tracing::{debug, warn};
use wordtap_core::{Ctm, ExtractOptions, ExtractWarning, ExtractWarningCode};

use crate::error::BackendError;
use crate::fonts::{LoadedFont, load_font};
use crate::graphics_state::GraphicsStack;
use crate::handler::{CharEvent, ContentHandler};
use crate::lopdf_backend::{decode_stream, dict_get, object_to_f64, resolve};
use crate::text_renderer::{RawGlyph, TjElement, show_with_positioning};
use crate::text_state::{TextRenderMode, TextState};
use crate::tokenizer::{Operand, Operator, tokenize};

/// Fonts loaded for one resource dictionary, keyed by resource name.
type FontCache = HashMap<String, LoadedFont>;

/// Per-page interpreter context shared by nested Form XObjects.
pub(crate) struct ContentInterpreter<'a> {
    doc: &'a Document,
    options: &'a ExtractOptions,
    page_index: usize,
    glyph_count: usize,
}

impl<'a> ContentInterpreter<'a> {
    pub(crate) fn new(doc: &'a Document, options: &'a ExtractOptions, page_index: usize) -> Self {
        Self {
            doc,
            options,
            page_index,
            glyph_count: 0,
        }
    }

    /// Number of characters reported so far on this page.
    pub(crate) fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    /// Interpret one content stream with the given resources.
    ///
    /// `depth` is 0 for the page itself and grows by one per Form XObject.
    pub(crate) fn run(
        &mut self,
        handler: &mut dyn ContentHandler,
        content: &[u8],
        resources: &Dictionary,
        depth: usize,
        gstate: &mut GraphicsStack,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        let operators = tokenize(content)?;
        let mut fonts = FontCache::new();
        for op in &operators {
            self.apply(handler, op, resources, &mut fonts, depth, gstate, tstate)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn apply(
        &mut self,
        handler: &mut dyn ContentHandler,
        op: &Operator,
        resources: &Dictionary,
        fonts: &mut FontCache,
        depth: usize,
        gstate: &mut GraphicsStack,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        let operands = &op.operands;
        match op.name.as_str() {
            "q" => gstate.save(&tstate.params),
            "Q" => {
                if let Some(params) = gstate.restore() {
                    tstate.params = params;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(operands) {
                    gstate.concat(&m);
                }
            }
            "BT" => tstate.begin_text(),
            "ET" => tstate.end_text(),
            "Tf" => {
                let name = operands.first().and_then(Operand::as_name).unwrap_or_default();
                let size = get_f64(operands, 1).unwrap_or(0.0);
                tstate.set_font(name, size);
            }
            "Tc" => set_from(operands, &mut tstate.params.char_spacing),
            "Tw" => set_from(operands, &mut tstate.params.word_spacing),
            "Tz" => set_from(operands, &mut tstate.params.h_scaling),
            "TL" => set_from(operands, &mut tstate.params.leading),
            "Ts" => set_from(operands, &mut tstate.params.rise),
            "Tr" => {
                if let Some(mode) = get_f64(operands, 0).and_then(|v| TextRenderMode::from_i64(v as i64)) {
                    tstate.params.render_mode = mode;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    tstate.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    tstate.move_text_position_and_set_leading(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operands(operands) {
                    tstate.set_text_matrix(m);
                }
            }
            "T*" => tstate.move_to_next_line(),
            "Tj" => {
                if let Some(bytes) = operands.first().and_then(Operand::as_bytes) {
                    self.show(handler, resources, fonts, gstate, tstate, TextRun::Bytes(bytes))?;
                }
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = operands.first() {
                    self.show(handler, resources, fonts, gstate, tstate, TextRun::Array(items))?;
                }
            }
            "'" => {
                tstate.move_to_next_line();
                if let Some(bytes) = operands.first().and_then(Operand::as_bytes) {
                    self.show(handler, resources, fonts, gstate, tstate, TextRun::Bytes(bytes))?;
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    tstate.params.word_spacing = aw;
                    tstate.params.char_spacing = ac;
                }
                tstate.move_to_next_line();
                if let Some(bytes) = operands.get(2).and_then(Operand::as_bytes) {
                    self.show(handler, resources, fonts, gstate, tstate, TextRun::Bytes(bytes))?;
                }
            }
            "Do" => {
                if let Some(name) = operands.first().and_then(Operand::as_name) {
                    self.handle_do(handler, resources, name, depth, gstate, tstate)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn show(
        &mut self,
        handler: &mut dyn ContentHandler,
        resources: &Dictionary,
        fonts: &mut FontCache,
        gstate: &GraphicsStack,
        tstate: &mut TextState,
        run: TextRun<'_>,
    ) -> Result<(), BackendError> {
        let font_name = tstate.params.font_name.clone();
        if !fonts.contains_key(&font_name) {
            let font = self.load_font(handler, resources, &font_name);
            fonts.insert(font_name.clone(), font);
        }
        let Some(font) = fonts.get(&font_name) else {
            return Ok(());
        };

        let elements: Vec<TjElement> = match run {
            TextRun::Bytes(bytes) => vec![TjElement::Codes(font.char_codes(bytes))],
            TextRun::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Operand::String(bytes) => Some(TjElement::Codes(font.char_codes(bytes))),
                    other => other.as_f64().map(TjElement::Adjustment),
                })
                .collect(),
        };
        let get_width = |code: u32| font.width(code);
        let glyphs = show_with_positioning(tstate, &elements, &get_width, !font.is_composite());
        self.emit(handler, font, gstate, tstate, glyphs)
    }

    fn emit(
        &mut self,
        handler: &mut dyn ContentHandler,
        font: &LoadedFont,
        gstate: &GraphicsStack,
        tstate: &TextState,
        glyphs: Vec<RawGlyph>,
    ) -> Result<(), BackendError> {
        for raw in glyphs {
            self.glyph_count += 1;
            ExtractOptions::check_limit(
                "max_glyphs_per_page",
                Some(self.options.max_glyphs_per_page),
                self.glyph_count,
            )?;
            handler.on_char(CharEvent {
                char_code: raw.char_code,
                unicode: font.decode(raw.char_code),
                font_name: font.base_name.clone(),
                font_size: tstate.params.font_size,
                text_matrix: raw.text_matrix,
                ctm: *gstate.ctm(),
                width: raw.width,
                h_scaling: tstate.h_scaling_normalized(),
                rise: tstate.params.rise,
                descent: font.descent(),
            });
        }
        Ok(())
    }

    fn load_font(
        &self,
        handler: &mut dyn ContentHandler,
        resources: &Dictionary,
        name: &str,
    ) -> LoadedFont {
        let font_dict = dict_get(self.doc, resources, b"Font")
            .and_then(|o| o.as_dict().ok())
            .and_then(|fonts| dict_get(self.doc, fonts, name.as_bytes()))
            .and_then(|o| o.as_dict().ok());
        match font_dict {
            Some(dict) => {
                let (font, warnings) = load_font(self.doc, dict);
                debug!(page = self.page_index, resource = name, base_font = %font.base_name, "loaded font");
                for warning in warnings {
                    self.warn(handler, warning);
                }
                font
            }
            None => {
                self.warn(
                    handler,
                    ExtractWarning::new(
                        ExtractWarningCode::MissingFont,
                        format!("font /{name} not found in resources, using default metrics"),
                    )
                    .with_font(name),
                );
                LoadedFont::fallback(name)
            }
        }
    }

    fn handle_do(
        &mut self,
        handler: &mut dyn ContentHandler,
        resources: &Dictionary,
        name: &str,
        depth: usize,
        gstate: &mut GraphicsStack,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        let stream = dict_get(self.doc, resources, b"XObject")
            .and_then(|o| o.as_dict().ok())
            .and_then(|xobjects| dict_get(self.doc, xobjects, name.as_bytes()))
            .and_then(|o| o.as_stream().ok());
        let Some(stream) = stream else {
            self.warn(
                handler,
                ExtractWarning::new(
                    ExtractWarningCode::MalformedObject,
                    format!("XObject /{name} not found in resources"),
                ),
            );
            return Ok(());
        };

        let subtype = dict_get(self.doc, &stream.dict, b"Subtype")
            .and_then(|o| o.as_name().ok())
            .unwrap_or_default();
        match subtype {
            b"Form" => self.run_form(handler, stream, name, resources, depth, gstate, tstate),
            // images carry no text
            b"Image" => Ok(()),
            other => {
                self.warn(
                    handler,
                    ExtractWarning::new(
                        ExtractWarningCode::UnsupportedXObject,
                        format!(
                            "XObject /{name} has unsupported subtype {}",
                            String::from_utf8_lossy(other)
                        ),
                    ),
                );
                Ok(())
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_form(
        &mut self,
        handler: &mut dyn ContentHandler,
        stream: &Stream,
        name: &str,
        parent_resources: &Dictionary,
        depth: usize,
        gstate: &mut GraphicsStack,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        let depth = depth + 1;
        ExtractOptions::check_limit(
            "max_recursion_depth",
            Some(self.options.max_recursion_depth),
            depth,
        )?;

        let content = decode_stream(stream).map_err(|e| {
            BackendError::Interpreter(format!("failed to decode Form XObject /{name}: {e}"))
        })?;
        let resources = dict_get(self.doc, &stream.dict, b"Resources")
            .and_then(|o| o.as_dict().ok())
            .unwrap_or(parent_resources);

        gstate.save(&tstate.params);
        if let Some(m) = dict_get(self.doc, &stream.dict, b"Matrix")
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| lopdf_matrix(self.doc, arr))
        {
            gstate.concat(&m);
        }
        // the text object of the caller is not visible inside the form
        let saved_text = tstate.clone();
        let result = self.run(handler, &content, resources, depth, gstate, tstate);
        *tstate = saved_text;
        if let Some(params) = gstate.restore() {
            tstate.params = params;
        }
        result
    }

    /// Log a warning and pass it to the handler when collection is on.
    fn warn(&self, handler: &mut dyn ContentHandler, warning: ExtractWarning) {
        let warning = warning.on_page(self.page_index);
        warn!(page = self.page_index, code = warning.code.as_str(), "{}", warning.description);
        if self.options.collect_warnings {
            handler.on_warning(warning);
        }
    }
}

/// The string operand(s) of a text-showing operator.
enum TextRun<'o> {
    Bytes(&'o [u8]),
    Array(&'o [Operand]),
}

fn get_f64(operands: &[Operand], index: usize) -> Option<f64> {
    operands.get(index).and_then(Operand::as_f64)
}

fn set_from(operands: &[Operand], target: &mut f64) {
    if let Some(v) = get_f64(operands, 0) {
        *target = v;
    }
}

fn matrix_operands(operands: &[Operand]) -> Option<Ctm> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, operand) in m.iter_mut().zip(&operands[operands.len() - 6..]) {
        *slot = operand.as_f64()?;
    }
    Some(Ctm::from_array(m))
}

fn lopdf_matrix(doc: &Document, items: &[lopdf::Object]) -> Option<Ctm> {
    if items.len() != 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, item) in m.iter_mut().zip(items) {
        *slot = object_to_f64(resolve(doc, item))?;
    }
    Some(Ctm::from_array(m))
}
