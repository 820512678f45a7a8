//! Built-in metrics for the standard Type1 fonts.
//!
//! Used when a simple font has no `/Widths` array. Widths cover the
//! printable ASCII range (codes 32–126) in 1/1000 em units, taken from the
//! Adobe AFM files; codes outside that range use the font's space width.

/// Metrics of one standard font.
#[derive(Debug)]
pub struct StandardFont {
    /// Widths for codes 32..=126.
    widths: [u16; 95],
    /// AFM descent in 1/1000 em units.
    pub descent: f64,
}

impl StandardFont {
    pub fn width(&self, code: u32) -> f64 {
        let index = code.checked_sub(32).map(|i| i as usize);
        match index.and_then(|i| self.widths.get(i)) {
            Some(&w) => f64::from(w),
            None => f64::from(self.widths[0]),
        }
    }
}

/// Look up a standard font by base name.
///
/// Subset prefixes (`ABCDEF+`) are ignored and the common TrueType aliases
/// (Arial, Times New Roman, Courier New) map to their standard equivalents.
pub fn lookup(base_name: &str) -> Option<&'static StandardFont> {
    let name = strip_subset_prefix(base_name);
    let font = match name {
        "Helvetica" | "Helvetica-Oblique" | "Arial" | "ArialMT" | "Arial,Italic"
        | "Arial-ItalicMT" => &HELVETICA,
        "Helvetica-Bold" | "Helvetica-BoldOblique" | "Arial,Bold" | "Arial-BoldMT"
        | "Arial,BoldItalic" | "Arial-BoldItalicMT" => &HELVETICA_BOLD,
        "Times-Roman" | "TimesNewRoman" | "TimesNewRomanPSMT" => &TIMES_ROMAN,
        "Times-Bold" | "TimesNewRoman,Bold" | "TimesNewRomanPS-BoldMT" => &TIMES_BOLD,
        "Times-Italic" | "TimesNewRoman,Italic" | "TimesNewRomanPS-ItalicMT" => &TIMES_ITALIC,
        "Times-BoldItalic" | "TimesNewRoman,BoldItalic" | "TimesNewRomanPS-BoldItalicMT" => {
            &TIMES_BOLD_ITALIC
        }
        "Courier" | "Courier-Bold" | "Courier-Oblique" | "Courier-BoldOblique"
        | "CourierNew" | "CourierNewPSMT" => &COURIER,
        _ => return None,
    };
    Some(font)
}

/// Remove a six-letter subset tag such as `ABCDEF+`.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

static COURIER: StandardFont = StandardFont {
    widths: [600; 95],
    descent: -157.0,
};

#[rustfmt::skip]
static HELVETICA: StandardFont = StandardFont {
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
    ],
    descent: -207.0,
};

#[rustfmt::skip]
static HELVETICA_BOLD: StandardFont = StandardFont {
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
    ],
    descent: -207.0,
};

#[rustfmt::skip]
static TIMES_ROMAN: StandardFont = StandardFont {
    widths: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
        921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
        556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
        333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
        500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
    ],
    descent: -217.0,
};

#[rustfmt::skip]
static TIMES_BOLD: StandardFont = StandardFont {
    widths: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
        930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
        611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
        333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
        556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
    ],
    descent: -217.0,
};

#[rustfmt::skip]
static TIMES_ITALIC: StandardFont = StandardFont {
    widths: [
        250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
        920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
        611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
        333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
        500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
    ],
    descent: -217.0,
};

#[rustfmt::skip]
static TIMES_BOLD_ITALIC: StandardFont = StandardFont {
    widths: [
        250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
        832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
        611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
        333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
        500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
    ],
    descent: -218.0,
};
