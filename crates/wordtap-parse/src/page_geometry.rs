//! Page size and rotation.
//!
//! Content is interpreted with an initial CTM that moves the MediaBox
//! origin to (0, 0) and applies the page `/Rotate`, so glyph boxes come out
//! in the upright page space (bottom-left origin) that readers display.

use wordtap_core::{BBox, Ctm};

/// Upright page dimensions and the CTM that maps PDF space into them.
///
/// # Example
///
/// ```
/// use wordtap_core::{BBox, Point};
/// use wordtap_parse::page_geometry::PageGeometry;
///
/// let geo = PageGeometry::new(BBox::new(0.0, 0.0, 612.0, 792.0), 90);
/// assert_eq!(geo.width(), 792.0);
/// assert_eq!(geo.height(), 612.0);
///
/// // the PDF origin ends up at the top-left of the rotated page
/// let p = geo.initial_ctm().transform_point(Point::new(0.0, 0.0));
/// assert_eq!((p.x, p.y), (0.0, 612.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    rotation: i64,
    width: f64,
    height: f64,
    initial_ctm: Ctm,
}

impl PageGeometry {
    /// Build from a raw MediaBox (corners in any order) and `/Rotate`.
    ///
    /// Rotation is taken modulo 360; values that are not a multiple of 90
    /// are treated as 0.
    pub fn new(media_box: BBox, rotate: i64) -> Self {
        let x0 = media_box.x0.min(media_box.x1);
        let x1 = media_box.x0.max(media_box.x1);
        let y0 = media_box.y0.min(media_box.y1);
        let y1 = media_box.y0.max(media_box.y1);
        let native_w = x1 - x0;
        let native_h = y1 - y0;

        let rotation = match rotate.rem_euclid(360) {
            r @ (90 | 180 | 270) => r,
            _ => 0,
        };
        let (width, height, initial_ctm) = match rotation {
            90 => (native_h, native_w, Ctm::new(0.0, -1.0, 1.0, 0.0, -y0, x1)),
            180 => (native_w, native_h, Ctm::new(-1.0, 0.0, 0.0, -1.0, x1, y1)),
            270 => (native_h, native_w, Ctm::new(0.0, 1.0, -1.0, 0.0, y1, -x0)),
            _ => (native_w, native_h, Ctm::new(1.0, 0.0, 0.0, 1.0, -x0, -y0)),
        };
        Self {
            rotation,
            width,
            height,
            initial_ctm,
        }
    }

    /// Displayed width in points.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Displayed height in points.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Normalised rotation: 0, 90, 180 or 270.
    pub fn rotation(&self) -> i64 {
        self.rotation
    }

    pub fn initial_ctm(&self) -> Ctm {
        self.initial_ctm
    }

    /// A page that has no area cannot hold words.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
