//! Simple-font encodings: base encodings plus `/Differences`.
//!
//! WinAnsi and MacRoman bytes are decoded with `encoding_rs`
//! (windows-1252 and x-mac-roman). StandardEncoding and `/Differences`
//! entries go through glyph names.

use std::collections::HashMap;

use encoding_rs::Encoding;

/// The base encoding named by a font's `/Encoding` or `/BaseEncoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    #[default]
    Standard,
    WinAnsi,
    MacRoman,
}

impl BaseEncoding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardEncoding" => Some(Self::Standard),
            "WinAnsiEncoding" => Some(Self::WinAnsi),
            "MacRomanEncoding" => Some(Self::MacRoman),
            _ => None,
        }
    }

    /// Decode one byte. Control codes have no mapping.
    pub fn decode(self, code: u8) -> Option<String> {
        if code < 0x20 {
            return None;
        }
        match self {
            Self::WinAnsi => decode_with(encoding_rs::WINDOWS_1252, code),
            Self::MacRoman => decode_with(encoding_rs::MACINTOSH, code),
            Self::Standard => standard_glyph_name(code).and_then(glyph_name_to_unicode),
        }
    }
}

fn decode_with(encoding: &'static Encoding, code: u8) -> Option<String> {
    let bytes = [code];
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes);
    if had_errors || text.is_empty() {
        None
    } else {
        Some(text.into_owned())
    }
}

/// A simple font's code → text mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontEncoding {
    base: BaseEncoding,
    /// Glyph names from `/Differences`, overriding the base encoding.
    differences: HashMap<u8, String>,
}

impl FontEncoding {
    pub fn new(base: BaseEncoding) -> Self {
        Self {
            base,
            differences: HashMap::new(),
        }
    }

    pub fn with_differences(mut self, differences: HashMap<u8, String>) -> Self {
        self.differences = differences;
        self
    }

    pub fn base(&self) -> BaseEncoding {
        self.base
    }

    pub fn decode(&self, code: u8) -> Option<String> {
        match self.differences.get(&code) {
            Some(name) => glyph_name_to_unicode(name),
            None => self.base.decode(code),
        }
    }
}

/// Parse a `/Differences` array given as `(code | name)` items.
///
/// Each integer sets the code for the names that follow it.
pub fn parse_differences<'a>(
    items: impl IntoIterator<Item = DifferencesItem<'a>>,
) -> HashMap<u8, String> {
    let mut map = HashMap::new();
    let mut code: Option<u32> = None;
    for item in items {
        match item {
            DifferencesItem::Code(c) => code = u32::try_from(c).ok(),
            DifferencesItem::Name(name) => {
                if let Some(c) = code {
                    if let Ok(byte) = u8::try_from(c) {
                        map.insert(byte, name.to_string());
                    }
                    code = Some(c + 1);
                }
            }
        }
    }
    map
}

/// One entry of a `/Differences` array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DifferencesItem<'a> {
    Code(i64),
    Name(&'a str),
}

#[rustfmt::skip]
const ASCII_GLYPH_NAMES: [&str; 95] = [
    "space", "exclam", "quotedbl", "numbersign", "dollar", "percent", "ampersand", "quotesingle",
    "parenleft", "parenright", "asterisk", "plus", "comma", "hyphen", "period", "slash",
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
    "colon", "semicolon", "less", "equal", "greater", "question", "at",
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M",
    "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
    "bracketleft", "backslash", "bracketright", "asciicircum", "underscore", "grave",
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m",
    "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z",
    "braceleft", "bar", "braceright", "asciitilde",
];

/// Glyph names for U+00A0..=U+00FF.
#[rustfmt::skip]
const LATIN1_GLYPH_NAMES: [&str; 96] = [
    "nbspace", "exclamdown", "cent", "sterling", "currency", "yen", "brokenbar", "section",
    "dieresis", "copyright", "ordfeminine", "guillemotleft", "logicalnot", "sfthyphen", "registered", "macron",
    "degree", "plusminus", "twosuperior", "threesuperior", "acute", "mu", "paragraph", "periodcentered",
    "cedilla", "onesuperior", "ordmasculine", "guillemotright", "onequarter", "onehalf", "threequarters", "questiondown",
    "Agrave", "Aacute", "Acircumflex", "Atilde", "Adieresis", "Aring", "AE", "Ccedilla",
    "Egrave", "Eacute", "Ecircumflex", "Edieresis", "Igrave", "Iacute", "Icircumflex", "Idieresis",
    "Eth", "Ntilde", "Ograve", "Oacute", "Ocircumflex", "Otilde", "Odieresis", "multiply",
    "Oslash", "Ugrave", "Uacute", "Ucircumflex", "Udieresis", "Yacute", "Thorn", "germandbls",
    "agrave", "aacute", "acircumflex", "atilde", "adieresis", "aring", "ae", "ccedilla",
    "egrave", "eacute", "ecircumflex", "edieresis", "igrave", "iacute", "icircumflex", "idieresis",
    "eth", "ntilde", "ograve", "oacute", "ocircumflex", "otilde", "odieresis", "divide",
    "oslash", "ugrave", "uacute", "ucircumflex", "udieresis", "yacute", "thorn", "ydieresis",
];

fn other_glyph_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "quoteleft" => "\u{2018}",
        "quoteright" => "\u{2019}",
        "quotesinglbase" => "\u{201A}",
        "quotedblleft" => "\u{201C}",
        "quotedblright" => "\u{201D}",
        "quotedblbase" => "\u{201E}",
        "endash" => "\u{2013}",
        "emdash" => "\u{2014}",
        "bullet" => "\u{2022}",
        "ellipsis" => "\u{2026}",
        "dagger" => "\u{2020}",
        "daggerdbl" => "\u{2021}",
        "perthousand" => "\u{2030}",
        "guilsinglleft" => "\u{2039}",
        "guilsinglright" => "\u{203A}",
        "fraction" => "\u{2044}",
        "trademark" => "\u{2122}",
        "Euro" => "\u{20AC}",
        "minus" => "\u{2212}",
        "florin" => "\u{0192}",
        "OE" => "\u{0152}",
        "oe" => "\u{0153}",
        "Scaron" => "\u{0160}",
        "scaron" => "\u{0161}",
        "Zcaron" => "\u{017D}",
        "zcaron" => "\u{017E}",
        "Ydieresis" => "\u{0178}",
        "Lslash" => "\u{0141}",
        "lslash" => "\u{0142}",
        "dotlessi" => "\u{0131}",
        "circumflex" => "\u{02C6}",
        "caron" => "\u{02C7}",
        "breve" => "\u{02D8}",
        "dotaccent" => "\u{02D9}",
        "ring" => "\u{02DA}",
        "ogonek" => "\u{02DB}",
        "tilde" => "\u{02DC}",
        "hungarumlaut" => "\u{02DD}",
        "ff" => "\u{FB00}",
        "fi" => "\u{FB01}",
        "fl" => "\u{FB02}",
        "ffi" => "\u{FB03}",
        "ffl" => "\u{FB04}",
        "nonbreakingspace" => "\u{00A0}",
        "softhyphen" => "\u{00AD}",
        _ => return None,
    })
}

fn hex_groups(hex: &str, group: usize) -> Option<String> {
    if hex.is_empty() || hex.len() % group != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..hex.len())
        .step_by(group)
        .map(|i| {
            u32::from_str_radix(&hex[i..i + group], 16)
                .ok()
                .and_then(char::from_u32)
        })
        .collect()
}

/// Map a glyph name to its text.
///
/// Handles the ASCII and Latin-1 names, common typographic names and
/// ligatures, `uniXXXX` and `uXXXX[XX]` forms, `.suffix` variants and
/// `_`-joined ligature names.
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    let name = name.split('.').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    if let Some(i) = ASCII_GLYPH_NAMES.iter().position(|&n| n == name) {
        return char::from_u32(0x20 + i as u32).map(String::from);
    }
    if let Some(i) = LATIN1_GLYPH_NAMES.iter().position(|&n| n == name) {
        return char::from_u32(0xA0 + i as u32).map(String::from);
    }
    if let Some(s) = other_glyph_name(name) {
        return Some(s.to_string());
    }
    if let Some(hex) = name.strip_prefix("uni") {
        if let Some(s) = hex_groups(hex, 4) {
            return Some(s);
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            if let Some(s) = hex_groups(hex, hex.len()) {
                return Some(s);
            }
        }
    }
    if name.contains('_') {
        return name.split('_').map(glyph_name_to_unicode).collect();
    }
    None
}

/// StandardEncoding glyph name for a code (ASCII except the two quotes).
fn standard_glyph_name(code: u8) -> Option<&'static str> {
    Some(match code {
        0x27 => "quoteright",
        0x60 => "quoteleft",
        0x20..=0x7E => ASCII_GLYPH_NAMES[usize::from(code - 0x20)],
        0xA1 => "exclamdown",
        0xA2 => "cent",
        0xA3 => "sterling",
        0xA4 => "fraction",
        0xA5 => "yen",
        0xA6 => "florin",
        0xA7 => "section",
        0xA8 => "currency",
        0xA9 => "quotesingle",
        0xAA => "quotedblleft",
        0xAB => "guillemotleft",
        0xAC => "guilsinglleft",
        0xAD => "guilsinglright",
        0xAE => "fi",
        0xAF => "fl",
        0xB1 => "endash",
        0xB2 => "dagger",
        0xB3 => "daggerdbl",
        0xB4 => "periodcentered",
        0xB6 => "paragraph",
        0xB7 => "bullet",
        0xB8 => "quotesinglbase",
        0xB9 => "quotedblbase",
        0xBA => "quotedblright",
        0xBB => "guillemotright",
        0xBC => "ellipsis",
        0xBD => "perthousand",
        0xBF => "questiondown",
        0xC1 => "grave",
        0xC2 => "acute",
        0xC3 => "circumflex",
        0xC4 => "tilde",
        0xC5 => "macron",
        0xC6 => "breve",
        0xC7 => "dotaccent",
        0xC8 => "dieresis",
        0xCA => "ring",
        0xCB => "cedilla",
        0xCD => "hungarumlaut",
        0xCE => "ogonek",
        0xCF => "caron",
        0xD0 => "emdash",
        0xE1 => "AE",
        0xE3 => "ordfeminine",
        0xE8 => "Lslash",
        0xE9 => "Oslash",
        0xEA => "OE",
        0xEB => "ordmasculine",
        0xF1 => "ae",
        0xF5 => "dotlessi",
        0xF8 => "lslash",
        0xF9 => "oslash",
        0xFA => "oe",
        0xFB => "germandbls",
        _ => return None,
    })
}
