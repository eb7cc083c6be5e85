//! Grid layout lookup and cell geometry.

use photobooth_model::geometry::CellRect;
use photobooth_model::template::{DeviceClass, Template};
use serde::{Deserialize, Serialize};

/// Space between neighbouring cells, in logical units.
pub const CELL_GAP: u32 = 10;

/// Decorative border around the photo grid, in logical units.
pub const FRAME_MARGIN: u32 = 15;

/// Space reserved below the grid for the caption strip.
pub const LABEL_HEIGHT: u32 = 80;

/// Geometry of a composite canvas, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub cell_width: u32,
    pub cell_height: u32,
    pub gap: u32,
    pub margin: u32,
    pub label_height: u32,
    pub columns: u32,
    pub rows: u32,
}

/// Lay out the photos of `template` for a device class.
///
/// | template | grid | standard cell | compact cell |
/// |---|---|---|---|
/// | diagonal (3) | 1x3 | 320x200 | 260x140 |
/// | grid (4) | 2x2 | 200x260 | 150x210 |
pub fn compute_layout(template: Template, device: DeviceClass) -> LayoutSpec {
    let (columns, rows, (cell_width, cell_height)) = match (template, device) {
        (Template::Diagonal, DeviceClass::Standard) => (1, 3, (320, 200)),
        (Template::Diagonal, DeviceClass::Compact) => (1, 3, (260, 140)),
        (Template::Grid, DeviceClass::Standard) => (2, 2, (200, 260)),
        (Template::Grid, DeviceClass::Compact) => (2, 2, (150, 210)),
    };

    LayoutSpec {
        cell_width,
        cell_height,
        gap: CELL_GAP,
        margin: FRAME_MARGIN,
        label_height: LABEL_HEIGHT,
        columns,
        rows,
    }
}

/// [`compute_layout`] keyed by photo count; `None` for unsupported counts.
pub fn compute_layout_for_count(number_of_photos: usize, device: DeviceClass) -> Option<LayoutSpec> {
    Template::from_photo_count(number_of_photos).map(|t| compute_layout(t, device))
}

impl LayoutSpec {
    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// Top-left corner of cell `index`, filling rows left to right.
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        debug_assert!(
            index < self.cell_count(),
            "cell {index} outside a {}x{} grid",
            self.columns,
            self.rows
        );
        let index = index as u32;
        let col = index % self.columns;
        let row = index / self.columns;
        (
            self.margin + col * (self.cell_width + self.gap),
            self.margin + row * (self.cell_height + self.gap),
        )
    }

    /// Destination rectangle of cell `index`.
    pub fn cell_rect(&self, index: usize) -> CellRect {
        let (x, y) = self.cell_origin(index);
        CellRect::new(x, y, self.cell_width, self.cell_height)
    }

    /// All cell rectangles in slot order.
    pub fn cells(&self) -> Vec<CellRect> {
        (0..self.cell_count()).map(|i| self.cell_rect(i)).collect()
    }

    /// Logical canvas `(width, height)`, including border and caption strip.
    pub fn canvas_size(&self) -> (u32, u32) {
        let width = self.columns * self.cell_width
            + self.columns.saturating_sub(1) * self.gap
            + 2 * self.margin;
        let height = self.rows * self.cell_height
            + self.rows.saturating_sub(1) * self.gap
            + 2 * self.margin
            + self.label_height;
        (width, height)
    }

    /// Raster `(width, height)` at the given pixel density.
    pub fn output_size(&self, density: f64) -> (u32, u32) {
        let (w, h) = self.canvas_size();
        (
            (w as f64 * density).round() as u32,
            (h as f64 * density).round() as u32,
        )
    }

    /// Rectangle of the caption strip below the grid.
    pub fn label_rect(&self) -> CellRect {
        let (width, height) = self.canvas_size();
        CellRect::new(
            0,
            height - self.margin - self.label_height,
            width,
            self.label_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_matches_photo_count() {
        for template in Template::ALL {
            for device in [DeviceClass::Standard, DeviceClass::Compact] {
                let layout = compute_layout(template, device);
                assert_eq!(layout.cell_count(), template.photo_count());
            }
        }
    }

    #[test]
    fn diagonal_standard_geometry() {
        let layout = compute_layout(Template::Diagonal, DeviceClass::Standard);
        assert_eq!((layout.columns, layout.rows), (1, 3));
        assert_eq!(layout.cell_origin(0), (15, 15));
        assert_eq!(layout.cell_origin(1), (15, 225));
        assert_eq!(layout.cell_origin(2), (15, 435));
        // 320 + 2*15 by 3*200 + 2*10 + 2*15 + 80
        assert_eq!(layout.canvas_size(), (350, 730));
    }

    #[test]
    fn grid_compact_geometry() {
        let layout = compute_layout(Template::Grid, DeviceClass::Compact);
        assert_eq!((layout.cell_width, layout.cell_height), (150, 210));
        assert_eq!(layout.cell_origin(1), (175, 15));
        assert_eq!(layout.cell_origin(2), (15, 235));
        assert_eq!(layout.cell_origin(3), (175, 235));
        assert_eq!(layout.canvas_size(), (340, 540));
    }

    #[test]
    fn unsupported_count_has_no_layout() {
        assert!(compute_layout_for_count(2, DeviceClass::Standard).is_none());
        assert_eq!(
            compute_layout_for_count(4, DeviceClass::Standard),
            Some(compute_layout(Template::Grid, DeviceClass::Standard))
        );
    }

    #[test]
    fn cells_never_overlap() {
        for template in Template::ALL {
            for device in [DeviceClass::Standard, DeviceClass::Compact] {
                let cells = compute_layout(template, device).cells();
                for (i, a) in cells.iter().enumerate() {
                    for b in &cells[i + 1..] {
                        assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn label_strip_sits_below_grid() {
        let layout = compute_layout(Template::Grid, DeviceClass::Standard);
        let last = layout.cell_rect(3);
        let label = layout.label_rect();
        assert_eq!(label.y, last.bottom());
        assert_eq!(label.bottom() + layout.margin, layout.canvas_size().1);
    }

    #[test]
    fn output_size_scales_canvas() {
        let layout = compute_layout(Template::Grid, DeviceClass::Standard);
        assert_eq!(layout.canvas_size(), (440, 640));
        assert_eq!(layout.output_size(2.0), (880, 1280));
        assert_eq!(layout.output_size(2.5), (1100, 1600));
    }

    #[test]
    fn layout_serializes_for_clients() {
        let layout = compute_layout(Template::Diagonal, DeviceClass::Compact);
        let json = serde_json::to_value(layout).unwrap();
        assert_eq!(json["cell_width"], 260);
        assert_eq!(json["label_height"], 80);
    }
}
