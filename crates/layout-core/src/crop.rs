//! Center cropping of source photos to a cell's aspect ratio.
//!
//! The crop always fills the cell: no stretching, no letterboxing. Equal
//! amounts are trimmed from both ends of the source's longer dimension.

use photobooth_model::geometry::CropRect;

/// Select the centered region of a `source_width`x`source_height` image
/// that matches the `cell_width`x`cell_height` aspect ratio.
///
/// Compares the per-axis scale factors. A source relatively wider than
/// the cell keeps its full height and loses equal slices left and right;
/// otherwise it keeps its full width and loses equal slices top and
/// bottom. Any zero dimension yields an empty rect.
pub fn compute_crop_rect(
    source_width: u32,
    source_height: u32,
    cell_width: u32,
    cell_height: u32,
) -> CropRect {
    if source_width == 0 || source_height == 0 || cell_width == 0 || cell_height == 0 {
        return CropRect::default();
    }

    let sw = source_width as f64;
    let sh = source_height as f64;
    let cw = cell_width as f64;
    let ch = cell_height as f64;

    let scale_x = sw / cw;
    let scale_y = sh / ch;

    if scale_x > scale_y {
        let width = sh * (cw / ch);
        CropRect::new((sw - width) / 2.0, 0.0, width, sh)
    } else {
        let height = sw * (ch / cw);
        CropRect::new(0.0, (sh - height) / 2.0, sw, height)
    }
}
