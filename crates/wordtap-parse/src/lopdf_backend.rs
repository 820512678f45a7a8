//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] on top of the [lopdf](https://crates.io/crates/lopdf)
//! crate. Also holds the small object helpers the font and interpreter
//! modules share.

use std::sync::LazyLock;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};
use wordtap_core::{BBox, DocumentParseError, ExtractOptions};

use crate::backend::PdfBackend;
use crate::error::BackendError;
use crate::graphics_state::GraphicsStack;
use crate::handler::ContentHandler;
use crate::interpreter::ContentInterpreter;
use crate::page_geometry::PageGeometry;
use crate::text_state::TextState;

/// Longest chain of indirect references followed before giving up.
const MAX_REFERENCE_CHAIN: usize = 32;

/// MediaBox used when a page tree has none (US Letter).
const DEFAULT_MEDIA_BOX: BBox = BBox {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: Document,
    /// Page object ids in page order.
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: ObjectId,
    /// 0-based page index.
    pub index: usize,
}

/// The lopdf-based PDF backend.
///
/// # Example
///
/// ```ignore
/// use wordtap_parse::{LopdfBackend, PdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// let geometry = LopdfBackend::page_geometry(&doc, &page)?;
/// ```
pub struct LopdfBackend;

/// Follow indirect references until a direct object is reached.
///
/// Dangling references resolve to themselves.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    let mut current = obj;
    for _ in 0..MAX_REFERENCE_CHAIN {
        match current {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(next) => current = next,
                Err(_) => return current,
            },
            _ => return current,
        }
    }
    current
}

/// Dictionary lookup with references resolved.
pub(crate) fn dict_get<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().map(|obj| resolve(doc, obj))
}

/// Convert a numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Stream bytes with filters applied. Unfiltered streams are returned as is.
pub(crate) fn decode_stream(stream: &Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))
}

/// Look up a key on the page, walking up the page tree through `/Parent`.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut dict = page_dict(doc, page_id)?;
    // bounded so a cyclic /Parent chain cannot loop forever
    for _ in 0..MAX_REFERENCE_CHAIN {
        if let Some(value) = dict_get(doc, dict, key) {
            return Ok(Some(value));
        }
        match dict_get(doc, dict, b"Parent").and_then(|o| o.as_dict().ok()) {
            Some(parent) => dict = parent,
            None => return Ok(None),
        }
    }
    Ok(None)
}

fn bbox_from_array(doc: &Document, array: &[Object]) -> Result<BBox, BackendError> {
    let values: Option<Vec<f64>> = array
        .iter()
        .map(|o| object_to_f64(resolve(doc, o)))
        .collect();
    match values.as_deref() {
        Some(&[x0, y0, x1, y1]) => Ok(BBox::new(x0, y0, x1, y1)),
        _ => Err(BackendError::Parse(format!(
            "expected 4 numbers for MediaBox, got {array:?}"
        ))),
    }
}

/// Content stream bytes of a page; multiple streams are joined with a
/// newline so tokens never merge across stream boundaries.
fn page_content_bytes(doc: &Document, page: &Dictionary) -> Result<Vec<u8>, BackendError> {
    let Some(contents) = dict_get(doc, page, b"Contents") else {
        return Ok(Vec::new());
    };
    match contents {
        Object::Stream(stream) => decode_stream(stream),
        Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                if !content.is_empty() {
                    content.push(b'\n');
                }
                content.extend_from_slice(&decode_stream(stream)?);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

fn page_resources(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    static EMPTY: LazyLock<Dictionary> = LazyLock::new(Dictionary::new);
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY),
    }
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(DocumentParseError::PasswordRequired));
        }

        // get_pages is keyed by 1-based page number
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        debug!(pages = page_ids.len(), bytes = bytes.len(), "opened PDF");
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_geometry(
        doc: &Self::Document,
        page: &Self::Page,
    ) -> Result<PageGeometry, Self::Error> {
        let inner = &doc.inner;
        let media_box = match resolve_inherited(inner, page.object_id, b"MediaBox")? {
            Some(obj) => {
                let array = obj
                    .as_array()
                    .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
                bbox_from_array(inner, array)?
            }
            None => {
                warn!(page = page.index, "no MediaBox on page or ancestors, using US Letter");
                DEFAULT_MEDIA_BOX
            }
        };
        let rotate = resolve_inherited(inner, page.object_id, b"Rotate")?
            .and_then(object_to_f64)
            .map_or(0, |r| r as i64);

        let geometry = PageGeometry::new(media_box, rotate);
        if geometry.is_empty() {
            return Err(BackendError::Core(DocumentParseError::Content(format!(
                "page {} has zero width or height",
                page.index + 1
            ))));
        }
        Ok(geometry)
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error> {
        let inner = &doc.inner;
        let geometry = Self::page_geometry(doc, page)?;
        let content = page_content_bytes(inner, page_dict(inner, page.object_id)?)?;
        let resources = page_resources(inner, page.object_id)?;

        let mut gstate = GraphicsStack::new(geometry.initial_ctm());
        let mut tstate = TextState::new();
        let mut interpreter = ContentInterpreter::new(inner, options, page.index);
        interpreter.run(handler, &content, resources, 0, &mut gstate, &mut tstate)?;
        debug!(
            page = page.index,
            rotation = geometry.rotation(),
            glyphs = interpreter.glyph_count(),
            "interpreted page"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::CharEvent;
    use lopdf::{Stream, dictionary};

    #[derive(Default)]
    struct Collecting {
        chars: Vec<CharEvent>,
    }

    impl ContentHandler for Collecting {
        fn on_char(&mut self, event: CharEvent) {
            self.chars.push(event);
        }
    }

    /// One-page PDF with Helvetica text; page attributes may live on the
    /// page or on the /Pages node.
    fn build_pdf(content: &[u8], page_extra: Dictionary, pages_extra: Dictionary) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        for (k, v) in page_extra.into_iter() {
            page.set(k, v);
        }
        let page_id = doc.add_object(page);
        let mut pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        };
        for (k, v) in pages_extra.into_iter() {
            pages.set(k, v);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn media_box(w: i64, h: i64) -> Dictionary {
        dictionary! { "MediaBox" => [0, 0, w, h].map(Object::Integer).to_vec() }
    }

    #[test]
    fn test_open_invalid_bytes() {
        let err = LopdfBackend::open(b"not a pdf").unwrap_err();
        assert!(matches!(
            DocumentParseError::from(err),
            DocumentParseError::Syntax(_)
        ));
    }

    #[test]
    fn test_inherited_media_box_and_resources() {
        let bytes = build_pdf(
            b"BT /F1 12 Tf 10 20 Td (A) Tj ET",
            Dictionary::new(),
            media_box(200, 300),
        );
        let doc = LopdfBackend::open(&bytes).unwrap();
        assert_eq!(LopdfBackend::page_count(&doc), 1);
        let page = LopdfBackend::get_page(&doc, 0).unwrap();
        let geo = LopdfBackend::page_geometry(&doc, &page).unwrap();
        assert_eq!((geo.width(), geo.height()), (200.0, 300.0));

        let mut handler = Collecting::default();
        LopdfBackend::interpret_page(&doc, &page, &mut handler, &ExtractOptions::default())
            .unwrap();
        assert_eq!(handler.chars.len(), 1);
        assert_eq!(handler.chars[0].font_name, "Helvetica");
        assert_eq!(handler.chars[0].width, 667.0);
    }

    #[test]
    fn test_inherited_rotation() {
        let mut pages_extra = media_box(200, 300);
        pages_extra.set("Rotate", 90);
        let bytes = build_pdf(b"", Dictionary::new(), pages_extra);
        let doc = LopdfBackend::open(&bytes).unwrap();
        let page = LopdfBackend::get_page(&doc, 0).unwrap();
        let geo = LopdfBackend::page_geometry(&doc, &page).unwrap();
        assert_eq!(geo.rotation(), 90);
        assert_eq!((geo.width(), geo.height()), (300.0, 200.0));
    }

    #[test]
    fn test_zero_area_page_is_an_error() {
        let bytes = build_pdf(b"", media_box(0, 300), Dictionary::new());
        let doc = LopdfBackend::open(&bytes).unwrap();
        let page = LopdfBackend::get_page(&doc, 0).unwrap();
        let err = LopdfBackend::page_geometry(&doc, &page).unwrap_err();
        assert!(matches!(
            DocumentParseError::from(err),
            DocumentParseError::Content(_)
        ));
    }

    #[test]
    fn test_missing_media_box_defaults_to_letter() {
        let bytes = build_pdf(b"", Dictionary::new(), Dictionary::new());
        let doc = LopdfBackend::open(&bytes).unwrap();
        let page = LopdfBackend::get_page(&doc, 0).unwrap();
        let geo = LopdfBackend::page_geometry(&doc, &page).unwrap();
        assert_eq!((geo.width(), geo.height()), (612.0, 792.0));
    }

    #[test]
    fn test_get_page_out_of_range() {
        let bytes = build_pdf(b"", media_box(100, 100), Dictionary::new());
        let doc = LopdfBackend::open(&bytes).unwrap();
        assert!(LopdfBackend::get_page(&doc, 1).is_err());
    }

    #[test]
    fn test_resolve_follows_references() {
        let mut doc = Document::with_version("1.5");
        let target = doc.add_object(Object::Integer(7));
        let hop = doc.add_object(Object::Reference(target));
        assert_eq!(resolve(&doc, &Object::Reference(hop)), &Object::Integer(7));
        let dangling = Object::Reference((999, 0));
        assert_eq!(resolve(&doc, &dangling), &dangling);
    }

    #[test]
    fn test_object_to_f64() {
        assert_eq!(object_to_f64(&Object::Integer(3)), Some(3.0));
        assert_eq!(object_to_f64(&Object::Real(1.5)), Some(1.5));
        assert_eq!(object_to_f64(&Object::Null), None);
    }
}
