//! Glyph widths and descent from PDF font dictionaries.
//!
//! Simple fonts read `/FirstChar` + `/Widths`, falling back to the standard
//! font tables. Composite (Type0) fonts read `/DW` and `/W` from their
//! descendant CIDFont. Descent comes from `/FontDescriptor`.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};

use crate::lopdf_backend::{dict_get, object_to_f64, resolve};
use crate::standard_fonts::{self, StandardFont};

/// Width used when a font has neither `/Widths` nor standard metrics.
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Default CID width when `/DW` is absent.
pub const DEFAULT_CID_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone)]
enum WidthTable {
    None,
    Simple { first_char: u32, widths: Vec<f64> },
    Standard(&'static StandardFont),
    Cid(HashMap<u32, f64>),
}

/// Widths (in 1/1000 text space units) and vertical metrics of one font.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    table: WidthTable,
    missing_width: f64,
    descent: f64,
}

impl FontMetrics {
    /// Metrics for an unknown or unloadable font.
    pub fn default_metrics() -> Self {
        Self {
            table: WidthTable::None,
            missing_width: DEFAULT_WIDTH,
            descent: 0.0,
        }
    }

    /// Metrics from an explicit widths array.
    pub fn simple(first_char: u32, widths: Vec<f64>, missing_width: f64, descent: f64) -> Self {
        Self {
            table: WidthTable::Simple { first_char, widths },
            missing_width,
            descent,
        }
    }

    pub fn width(&self, code: u32) -> f64 {
        let found = match &self.table {
            WidthTable::None => None,
            WidthTable::Simple { first_char, widths } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize).copied()),
            WidthTable::Standard(font) => Some(font.width(code)),
            WidthTable::Cid(widths) => widths.get(&code).copied(),
        };
        found.unwrap_or(self.missing_width)
    }

    /// Descent in glyph space; zero or negative.
    pub fn descent(&self) -> f64 {
        self.descent
    }
}

struct DescriptorValues {
    descent: Option<f64>,
    missing_width: Option<f64>,
}

fn descriptor_values(doc: &Document, font_dict: &Dictionary) -> DescriptorValues {
    let desc = dict_get(doc, font_dict, b"FontDescriptor").and_then(|o| o.as_dict().ok());
    let number = |key: &[u8]| {
        desc.and_then(|d| dict_get(doc, d, key))
            .and_then(object_to_f64)
    };
    DescriptorValues {
        // some producers write a positive descent
        descent: number(b"Descent").map(|d| -d.abs()),
        missing_width: number(b"MissingWidth"),
    }
}

/// Metrics of a simple (Type1, TrueType, Type3, MMType1) font.
pub fn simple_font_metrics(doc: &Document, font_dict: &Dictionary, base_name: &str) -> FontMetrics {
    let desc = descriptor_values(doc, font_dict);
    let standard = standard_fonts::lookup(base_name);

    let widths: Option<Vec<f64>> = dict_get(doc, font_dict, b"Widths")
        .and_then(|o| o.as_array().ok())
        .map(|arr| {
            arr.iter()
                .map(|o| object_to_f64(resolve(doc, o)).unwrap_or(0.0))
                .collect()
        });
    let first_char = dict_get(doc, font_dict, b"FirstChar")
        .and_then(object_to_f64)
        .map_or(0, |v| v.max(0.0) as u32);

    let descent = desc
        .descent
        .or(standard.map(|f| f.descent))
        .unwrap_or(0.0);
    let missing_width = desc.missing_width.unwrap_or(DEFAULT_WIDTH);

    let table = match (widths, standard) {
        (Some(widths), _) => WidthTable::Simple { first_char, widths },
        (None, Some(font)) => WidthTable::Standard(font),
        (None, None) => WidthTable::None,
    };
    FontMetrics {
        table,
        missing_width,
        descent,
    }
}

/// Metrics of a descendant CIDFont (`/DW`, `/W`).
pub fn cid_font_metrics(doc: &Document, cid_font: &Dictionary) -> FontMetrics {
    let default_width = dict_get(doc, cid_font, b"DW")
        .and_then(object_to_f64)
        .unwrap_or(DEFAULT_CID_WIDTH);
    let widths = dict_get(doc, cid_font, b"W")
        .and_then(|o| o.as_array().ok())
        .map(|arr| parse_w_array(doc, arr))
        .unwrap_or_default();
    let descent = descriptor_values(doc, cid_font).descent.unwrap_or(0.0);
    FontMetrics {
        table: WidthTable::Cid(widths),
        missing_width: default_width,
        descent,
    }
}

/// Parse a CIDFont `/W` array.
///
/// Two forms are mixed freely: `c [w1 w2 …]` gives consecutive widths from
/// `c`, and `c_first c_last w` gives one width to a whole range.
pub fn parse_w_array(doc: &Document, items: &[Object]) -> HashMap<u32, f64> {
    const MAX_RANGE: u32 = 0x1_0000;
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < items.len() {
        let Some(first) = object_to_f64(resolve(doc, &items[i])).and_then(to_cid) else {
            i += 1;
            continue;
        };
        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    let Some(cid) = u32::try_from(offset).ok().and_then(|o| first.checked_add(o))
                    else {
                        break;
                    };
                    if let Some(w) = object_to_f64(resolve(doc, w)) {
                        widths.insert(cid, w);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let last = object_to_f64(last).and_then(to_cid);
                let w = items.get(i + 2).and_then(|o| object_to_f64(resolve(doc, o)));
                if let (Some(last), Some(w)) = (last, w) {
                    if last >= first && last - first < MAX_RANGE {
                        for cid in first..=last {
                            widths.insert(cid, w);
                        }
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}

/// A CID from a `/W` number. Negative or out-of-range values have none.
fn to_cid(v: f64) -> Option<u32> {
    (v >= 0.0 && v <= f64::from(u32::MAX)).then(|| v as u32)
}
