//! Font loading: metrics, byte-to-code splitting and text decoding.

use lopdf::{Dictionary, Document, Object};
use wordtap_core::{ExtractWarning, ExtractWarningCode};

use crate::cmap::ToUnicodeCMap;
use crate::encoding::{BaseEncoding, DifferencesItem, FontEncoding, parse_differences};
use crate::font_metrics::{FontMetrics, cid_font_metrics, simple_font_metrics};
use crate::lopdf_backend::{dict_get, resolve};
use crate::standard_fonts::strip_subset_prefix;

/// A font resource ready for text showing.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// `/BaseFont` without its subset prefix.
    pub base_name: String,
    composite: bool,
    metrics: FontMetrics,
    to_unicode: Option<ToUnicodeCMap>,
    encoding: Option<FontEncoding>,
}

impl LoadedFont {
    /// Stand-in for a font that is missing from the resources.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self {
            base_name: name.into(),
            composite: false,
            metrics: FontMetrics::default_metrics(),
            to_unicode: None,
            encoding: Some(FontEncoding::default()),
        }
    }

    /// Whether codes are two bytes wide (Type0).
    pub fn is_composite(&self) -> bool {
        self.composite
    }

    /// Split a string operand into character codes.
    ///
    /// Composite fonts use 2-byte big-endian codes; a trailing odd byte
    /// becomes a code of its own.
    pub fn char_codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.composite {
            bytes
                .chunks(2)
                .map(|pair| pair.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
                .collect()
        } else {
            bytes.iter().map(|&b| u32::from(b)).collect()
        }
    }

    pub fn width(&self, code: u32) -> f64 {
        self.metrics.width(code)
    }

    pub fn descent(&self) -> f64 {
        self.metrics.descent()
    }

    /// Decoded text for a code: `/ToUnicode` first, then the simple-font
    /// encoding. `None` when neither maps it.
    pub fn decode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|m| m.lookup(code)) {
            return Some(text.to_string());
        }
        let encoding = self.encoding.as_ref()?;
        u8::try_from(code).ok().and_then(|b| encoding.decode(b))
    }
}

/// Load a font dictionary. Problems that have a fallback are returned as
/// warnings rather than errors.
pub fn load_font(doc: &Document, font_dict: &Dictionary) -> (LoadedFont, Vec<ExtractWarning>) {
    let mut warnings = Vec::new();
    let raw_name = dict_get(doc, font_dict, b"BaseFont")
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap_or_default();
    let base_name = strip_subset_prefix(&raw_name).to_string();
    let subtype = dict_get(doc, font_dict, b"Subtype")
        .and_then(|o| o.as_name().ok())
        .unwrap_or_default();

    let to_unicode = load_to_unicode(doc, font_dict, &base_name, &mut warnings);

    let font = if subtype == b"Type0" {
        let metrics = match descendant_font(doc, font_dict) {
            Some(cid_font) => cid_font_metrics(doc, cid_font),
            None => {
                warnings.push(
                    ExtractWarning::new(
                        ExtractWarningCode::MalformedObject,
                        "Type0 font has no DescendantFonts",
                    )
                    .with_font(&base_name),
                );
                FontMetrics::default_metrics()
            }
        };
        check_cid_encoding(doc, font_dict, &base_name, &mut warnings);
        LoadedFont {
            base_name,
            composite: true,
            metrics,
            to_unicode,
            encoding: None,
        }
    } else {
        let metrics = simple_font_metrics(doc, font_dict, &base_name);
        let encoding = load_simple_encoding(doc, font_dict, &base_name, &mut warnings);
        LoadedFont {
            base_name,
            composite: false,
            metrics,
            to_unicode,
            encoding: Some(encoding),
        }
    };
    (font, warnings)
}

fn descendant_font<'a>(doc: &'a Document, font_dict: &'a Dictionary) -> Option<&'a Dictionary> {
    let list = dict_get(doc, font_dict, b"DescendantFonts")?.as_array().ok()?;
    resolve(doc, list.first()?).as_dict().ok()
}

fn check_cid_encoding(
    doc: &Document,
    font_dict: &Dictionary,
    base_name: &str,
    warnings: &mut Vec<ExtractWarning>,
) {
    let name = dict_get(doc, font_dict, b"Encoding").and_then(|o| o.as_name().ok());
    match name {
        Some(b"Identity-H" | b"Identity-V") => {}
        Some(other) => warnings.push(
            ExtractWarning::new(
                ExtractWarningCode::EncodingFallback,
                format!(
                    "CMap {} is not supported, codes are used as CIDs",
                    String::from_utf8_lossy(other)
                ),
            )
            .with_font(base_name),
        ),
        // embedded CMap stream
        None => warnings.push(
            ExtractWarning::new(
                ExtractWarningCode::EncodingFallback,
                "embedded CMap is not supported, codes are used as CIDs",
            )
            .with_font(base_name),
        ),
    }
}

fn load_to_unicode(
    doc: &Document,
    font_dict: &Dictionary,
    base_name: &str,
    warnings: &mut Vec<ExtractWarning>,
) -> Option<ToUnicodeCMap> {
    let stream = dict_get(doc, font_dict, b"ToUnicode")?.as_stream().ok()?;
    let data = match stream.decompressed_content() {
        Ok(data) => data,
        Err(_) => stream.content.clone(),
    };
    match ToUnicodeCMap::parse(&data) {
        Ok(cmap) => Some(cmap),
        Err(e) => {
            warnings.push(
                ExtractWarning::new(
                    ExtractWarningCode::MalformedObject,
                    format!("unreadable ToUnicode CMap: {e}"),
                )
                .with_font(base_name),
            );
            None
        }
    }
}

fn load_simple_encoding(
    doc: &Document,
    font_dict: &Dictionary,
    base_name: &str,
    warnings: &mut Vec<ExtractWarning>,
) -> FontEncoding {
    let unknown_base = |name: &[u8], warnings: &mut Vec<ExtractWarning>| {
        let name = String::from_utf8_lossy(name);
        BaseEncoding::from_name(&name).unwrap_or_else(|| {
            warnings.push(
                ExtractWarning::new(
                    ExtractWarningCode::EncodingFallback,
                    format!("unknown encoding {name}, using StandardEncoding"),
                )
                .with_font(base_name),
            );
            BaseEncoding::Standard
        })
    };

    match dict_get(doc, font_dict, b"Encoding") {
        Some(Object::Name(name)) => FontEncoding::new(unknown_base(name.as_slice(), warnings)),
        Some(Object::Dictionary(enc)) => {
            let base = match dict_get(doc, enc, b"BaseEncoding").and_then(|o| o.as_name().ok()) {
                Some(name) => unknown_base(name, warnings),
                None => BaseEncoding::Standard,
            };
            let differences = dict_get(doc, enc, b"Differences")
                .and_then(|o| o.as_array().ok())
                .map(|items| {
                    parse_differences(items.iter().filter_map(|o| match resolve(doc, o) {
                        Object::Integer(i) => Some(DifferencesItem::Code(*i)),
                        Object::Name(n) => std::str::from_utf8(n).ok().map(DifferencesItem::Name),
                        _ => None,
                    }))
                })
                .unwrap_or_default();
            FontEncoding::new(base).with_differences(differences)
        }
        _ => FontEncoding::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    #[test]
    fn test_simple_font_with_differences() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "ABCDEF+Helvetica",
            "Encoding" => dictionary! {
                "Type" => "Encoding",
                "BaseEncoding" => "WinAnsiEncoding",
                "Differences" => vec![Object::Integer(65), Object::Name(b"B".to_vec())],
            },
        };
        let (loaded, warnings) = load_font(&doc, &font);
        assert!(warnings.is_empty());
        assert_eq!(loaded.base_name, "Helvetica");
        assert!(!loaded.is_composite());
        assert_eq!(loaded.decode(65).as_deref(), Some("B"));
        assert_eq!(loaded.decode(0x93).as_deref(), Some("\u{201C}"));
        assert_eq!(loaded.width(u32::from(b'A')), 667.0);
        assert_eq!(loaded.char_codes(b"Hi"), vec![72, 105]);
    }

    #[test]
    fn test_unknown_encoding_name_warns() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Times-Roman",
            "Encoding" => "FancyEncoding",
        };
        let (loaded, warnings) = load_font(&doc, &font);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, ExtractWarningCode::EncodingFallback);
        assert_eq!(loaded.decode(u32::from(b'a')).as_deref(), Some("a"));
    }

    #[test]
    fn test_to_unicode_takes_precedence() {
        let mut doc = Document::with_version("1.5");
        let cmap = Stream::new(
            dictionary! {},
            b"1 beginbfchar <41> <005A> endbfchar".to_vec(),
        );
        let cmap_id = doc.add_object(cmap);
        let font = dictionary! {
            "Subtype" => "TrueType",
            "BaseFont" => "Custom",
            "ToUnicode" => cmap_id,
        };
        let (loaded, _) = load_font(&doc, &font);
        assert_eq!(loaded.decode(0x41).as_deref(), Some("Z"));
        assert_eq!(loaded.decode(0x42).as_deref(), Some("B"));
    }

    #[test]
    fn test_type0_font_uses_two_byte_codes() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Subtype" => "Type0",
            "BaseFont" => "XYZABC+NotoSans",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Dictionary(dictionary! {
                "Subtype" => "CIDFontType2",
                "DW" => 500,
            })],
        };
        let (loaded, warnings) = load_font(&doc, &font);
        assert!(warnings.is_empty());
        assert!(loaded.is_composite());
        assert_eq!(loaded.base_name, "NotoSans");
        assert_eq!(loaded.char_codes(&[0x00, 0x41, 0x01]), vec![0x41, 0x01]);
        assert_eq!(loaded.width(0x41), 500.0);
        assert_eq!(loaded.decode(0x41), None);
    }

    #[test]
    fn test_type0_without_descendants_warns() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Subtype" => "Type0",
            "BaseFont" => "Broken",
            "Encoding" => "Identity-H",
        };
        let (loaded, warnings) = load_font(&doc, &font);
        assert_eq!(warnings[0].code, ExtractWarningCode::MalformedObject);
        assert_eq!(warnings[0].font_name.as_deref(), Some("Broken"));
        assert_eq!(loaded.width(1), 600.0);
    }

    #[test]
    fn test_fallback_font() {
        let font = LoadedFont::fallback("F9");
        assert_eq!(font.base_name, "F9");
        assert_eq!(font.width(65), 600.0);
        assert_eq!(font.decode(u32::from(b'x')).as_deref(), Some("x"));
    }
}
