//! wordtap-parse: PDF reading and content stream interpretation.
//!
//! Opens documents through a pluggable [`PdfBackend`] (lopdf by default),
//! interprets page content streams and reports every shown character as a
//! [`CharEvent`]. [`glyph_from_event`] turns those events into page-space
//! [`Glyph`](wordtap_core::Glyph)s for layout analysis in `wordtap-core`.

pub mod backend;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font_metrics;
pub mod fonts;
pub mod glyph_extraction;
pub mod graphics_state;
pub mod handler;
mod interpreter;
pub mod lopdf_backend;
pub mod page_geometry;
pub mod standard_fonts;
pub mod text_renderer;
pub mod text_state;
pub mod tokenizer;

pub use backend::PdfBackend;
pub use cmap::ToUnicodeCMap;
pub use encoding::{BaseEncoding, FontEncoding, glyph_name_to_unicode};
pub use error::BackendError;
pub use fonts::{LoadedFont, load_font};
pub use glyph_extraction::glyph_from_event;
pub use handler::{CharEvent, ContentHandler};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use page_geometry::PageGeometry;
pub use tokenizer::{Operand, Operator, tokenize};
pub use wordtap_core;
