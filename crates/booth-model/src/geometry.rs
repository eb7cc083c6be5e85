//! Rectangle types for composite layout.
//!
//! Cell rectangles live in logical canvas units; crop rectangles live in
//! source image pixels and may be fractional.

use serde::{Deserialize, Serialize};

/// An integer rectangle. Used for layout cells (logical units) and for
/// their rasterized counterparts (output pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the two rectangles share any area. Touching edges do not count.
    pub fn overlaps(&self, other: &CellRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Map logical units to output pixels.
    ///
    /// Edges are rounded independently, so adjacent rectangles stay
    /// adjacent after scaling.
    pub fn to_pixels(&self, density: f64) -> CellRect {
        let scale = |v: u32| (v as f64 * density).round() as u32;
        let x = scale(self.x);
        let y = scale(self.y);
        CellRect {
            x,
            y,
            width: scale(self.right()) - x,
            height: scale(self.bottom()) - y,
        }
    }
}

/// A sub-rectangle of a source image, in (possibly fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Width over height; 0 for an empty rect.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether the rect lies inside a `width`x`height` image, allowing
    /// for floating-point error.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        const EPS: f64 = 1e-6;
        self.x >= -EPS
            && self.y >= -EPS
            && self.right() <= width as f64 + EPS
            && self.bottom() <= height as f64 + EPS
    }

    /// Snap to whole pixels, clamped to the image bounds.
    ///
    /// Returns `(x, y, width, height)`; width and height are at least 1
    /// whenever the image itself is non-empty.
    pub fn to_pixel_bounds(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let snap = |start: f64, len: f64, limit: u32| {
            if limit == 0 {
                return (0, 0);
            }
            let start = (start.round().max(0.0) as u32).min(limit - 1);
            let len = (len.round().max(1.0) as u32).min(limit - start);
            (start, len)
        };
        let (x, w) = snap(self.x, self.width, width);
        let (y, h) = snap(self.y, self.height, height);
        (x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_cells_do_not_overlap() {
        let a = CellRect::new(15, 15, 200, 260);
        let b = CellRect::new(215, 15, 200, 260);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&CellRect::new(100, 100, 50, 50)));
    }

    #[test]
    fn pixel_scaling_keeps_edges_shared() {
        let a = CellRect::new(15, 15, 200, 260);
        let b = CellRect::new(a.right(), 15, 200, 260);
        let pa = a.to_pixels(1.5);
        let pb = b.to_pixels(1.5);
        assert_eq!(pa.right(), pb.x);
        assert_eq!(CellRect::new(15, 15, 320, 200).to_pixels(2.0), CellRect::new(30, 30, 640, 400));
    }

    #[test]
    fn crop_rect_bounds() {
        let crop = CropRect::new(240.0, 0.0, 1440.0, 1080.0);
        assert!(crop.fits_within(1920, 1080));
        assert!(!crop.fits_within(1600, 1080));
        assert!((crop.aspect_ratio() - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(crop.to_pixel_bounds(1920, 1080), (240, 0, 1440, 1080));
    }

    #[test]
    fn pixel_bounds_never_exceed_image() {
        let crop = CropRect::new(0.4, 0.0, 99.9, 50.0);
        let (x, y, w, h) = crop.to_pixel_bounds(100, 50);
        assert!(x + w <= 100);
        assert!(y + h <= 50);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn empty_crop_rect() {
        let crop = CropRect::default();
        assert!(crop.is_empty());
        assert_eq!(crop.aspect_ratio(), 0.0);
    }
}
