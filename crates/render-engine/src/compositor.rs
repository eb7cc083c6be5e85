//! Composite renderer: lays photos out on the decorated canvas.
//!
//! The canvas is rasterized at `logical size × pixel density`. Each slot
//! is center-cropped to its cell's aspect ratio and scaled to exactly fill
//! the cell, so photos are never stretched or letterboxed.

use std::fmt;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use photobooth_common::error::{BoothError, BoothResult, IncompleteSetError};
use photobooth_layout::{compute_crop_rect, LayoutSpec, MAX_PIXEL_DENSITY};
use photobooth_model::background::Background;
use photobooth_model::frame::Frame;
use photobooth_model::photo_set::PhotoSet;

use crate::decode::{ImageCrateDecoder, ImageDecoder};

/// A finished composite. Immutable once produced.
#[derive(Clone)]
pub struct CompositeResult {
    image: Arc<RgbImage>,
    logical_width: u32,
    logical_height: u32,
    density: f64,
    generation: u64,
}

impl CompositeResult {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Canvas size in logical units.
    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    /// Raster size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Render request number; 0 for renders made outside a scheduler.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

impl fmt::Debug for CompositeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeResult")
            .field("logical_size", &self.logical_size())
            .field("pixel_size", &self.pixel_size())
            .field("density", &self.density)
            .field("generation", &self.generation)
            .finish()
    }
}

enum Fill {
    Solid(Rgb<u8>),
    Texture(RgbImage),
}

/// Renders composites. Holds the decoder used for texture backgrounds.
#[derive(Clone)]
pub struct Renderer {
    decoder: Arc<dyn ImageDecoder>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_decoder(Arc::new(ImageCrateDecoder::new()))
    }

    pub fn with_decoder(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }

    /// Render `photos` into the layout.
    ///
    /// Fails with [`BoothError::IncompleteSet`] unless every slot holds a
    /// photo. The texture, if any, is decoded before any drawing starts.
    /// Identical inputs produce pixel-identical output.
    pub async fn render(
        &self,
        photos: &PhotoSet,
        layout: &LayoutSpec,
        background: &Background,
        density: f64,
    ) -> BoothResult<CompositeResult> {
        let frames: Vec<Frame> = photos
            .frames()
            .ok_or(IncompleteSetError {
                filled: photos.filled_count(),
                total: photos.len(),
            })?
            .into_iter()
            .cloned()
            .collect();

        if frames.len() != layout.cell_count() {
            return Err(BoothError::render(format!(
                "layout has {} cells but the set has {} photos",
                layout.cell_count(),
                frames.len()
            )));
        }
        if !(density > 0.0 && density <= MAX_PIXEL_DENSITY) {
            return Err(BoothError::render(format!(
                "pixel density {density} outside (0, {MAX_PIXEL_DENSITY}]"
            )));
        }

        let fill = match background {
            Background::Solid(color) => Fill::Solid(Rgb(color.to_rgb())),
            Background::Texture(source) => Fill::Texture(self.decoder.decode(source).await?),
        };

        let layout = *layout;
        let image = tokio::task::spawn_blocking(move || rasterize(&frames, &layout, fill, density))
            .await
            .map_err(|e| BoothError::render(format!("render task failed: {e}")))?;

        let (logical_width, logical_height) = layout.canvas_size();
        tracing::info!(
            width = image.width(),
            height = image.height(),
            density,
            photos = photos.len(),
            "Composite rendered"
        );

        Ok(CompositeResult {
            image: Arc::new(image),
            logical_width,
            logical_height,
            density,
            generation: 0,
        })
    }
}

fn rasterize(frames: &[Frame], layout: &LayoutSpec, fill: Fill, density: f64) -> RgbImage {
    let (width, height) = layout.output_size(density);

    let mut canvas = match fill {
        Fill::Solid(color) => RgbImage::from_pixel(width, height, color),
        Fill::Texture(texture) => imageops::resize(&texture, width, height, FilterType::Lanczos3),
    };

    for (index, frame) in frames.iter().enumerate() {
        let cell = layout.cell_rect(index).to_pixels(density);
        if cell.width == 0 || cell.height == 0 {
            continue;
        }

        let crop = compute_crop_rect(frame.width(), frame.height(), layout.cell_width, layout.cell_height);
        let (x, y, w, h) = crop.to_pixel_bounds(frame.width(), frame.height());
        if w == 0 || h == 0 {
            continue;
        }

        let region = imageops::crop_imm(frame.image(), x, y, w, h).to_image();
        let scaled = imageops::resize(&region, cell.width, cell.height, FilterType::Lanczos3);
        imageops::replace(&mut canvas, &scaled, i64::from(cell.x), i64::from(cell.y));

        tracing::trace!(slot = index, x = cell.x, y = cell.y, "Slot drawn");
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use photobooth_layout::compute_layout;
    use photobooth_model::background::FrameColor;
    use photobooth_model::template::{DeviceClass, Template};

    fn filled(frames: Vec<Frame>) -> PhotoSet {
        let mut set = PhotoSet::new(frames.len());
        for (i, f) in frames.into_iter().enumerate() {
            set.set(i, f);
        }
        set
    }

    #[tokio::test]
    async fn test_incomplete_set_is_rejected() {
        let layout = compute_layout(Template::Diagonal, DeviceClass::Compact);
        let mut set = PhotoSet::new(3);
        set.set(0, Frame::solid(4, 3, [1, 2, 3]));
        let err = Renderer::new()
            .render(&set, &layout, &Background::default(), 2.0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BoothError::IncompleteSet(IncompleteSetError { filled: 1, total: 3 })
        ));
    }

    #[tokio::test]
    async fn test_mismatched_layout_is_rejected() {
        let layout = compute_layout(Template::Grid, DeviceClass::Compact);
        let set = filled(vec![Frame::solid(4, 3, [0, 0, 0]); 3]);
        let err = Renderer::new()
            .render(&set, &layout, &Background::default(), 2.0)
            .await
            .unwrap_err();
        assert!(matches!(err, BoothError::Render { .. }));
    }

    #[tokio::test]
    async fn test_out_of_range_density_is_rejected() {
        let layout = compute_layout(Template::Diagonal, DeviceClass::Compact);
        let set = filled(vec![Frame::solid(4, 3, [0, 0, 0]); 3]);
        let renderer = Renderer::new();
        for density in [1e9, f64::INFINITY, f64::NAN, 0.0, -2.0] {
            let err = renderer
                .render(&set, &layout, &Background::default(), density)
                .await
                .unwrap_err();
            assert!(matches!(err, BoothError::Render { .. }), "density {density}");
        }
    }

    #[tokio::test]
    async fn test_background_shows_in_border_and_label() {
        let layout = compute_layout(Template::Diagonal, DeviceClass::Compact);
        let set = filled(vec![Frame::solid(40, 30, [9, 9, 9]); 3]);
        let color = FrameColor::new(0x4d, 0, 0);
        let result = Renderer::new()
            .render(&set, &layout, &Background::Solid(color), 1.0)
            .await
            .unwrap();

        let img = result.image();
        assert_eq!(img.get_pixel(0, 0).0, color.to_rgb());
        let (w, h) = result.pixel_size();
        assert_eq!(img.get_pixel(w / 2, h - 20).0, color.to_rgb());
        assert_eq!(img.get_pixel(15 + 5, 15 + 5).0, [9, 9, 9]);
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let layout = compute_layout(Template::Grid, DeviceClass::Compact);
        let gradient = RgbImage::from_fn(64, 36, |x, y| Rgb([(x * 4) as u8, (y * 7) as u8, 99]));
        let set = filled(vec![Frame::new(gradient); 4]);
        let renderer = Renderer::new();
        let background = Background::Solid(FrameColor::new(0x0e, 0x1b, 0x45));

        let a = renderer.render(&set, &layout, &background, 2.0).await.unwrap();
        let b = renderer.render(&set, &layout, &background, 2.0).await.unwrap();
        assert_eq!(a.image(), b.image());
        assert_eq!(a.generation(), 0);
    }
}
