use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use photobooth_layout::{compute_layout, pixel_density, LayoutSpec};
use photobooth_model::background::{Background, FrameColor, ImageSource};
use photobooth_model::frame::Frame;
use photobooth_model::photo_set::PhotoSet;
use photobooth_model::template::{DeviceClass, Template};
use photobooth_render_engine::Renderer;

const WHITE: [u8; 3] = [255, 255, 255];
const WASTE: [u8; 3] = [255, 0, 255];

fn complete(frames: Vec<Frame>) -> PhotoSet {
    let mut set = PhotoSet::new(frames.len());
    for (i, frame) in frames.into_iter().enumerate() {
        set.set(i, frame);
    }
    assert!(set.is_complete());
    set
}

/// Source whose outside bands (the part a correct crop discards) are magenta.
fn banded(width: u32, height: u32, keep: [u8; 3], horizontal_bands: bool, band: u32) -> Frame {
    Frame::new(RgbImage::from_fn(width, height, |x, y| {
        let along = if horizontal_bands { y } else { x };
        let extent = if horizontal_bands { height } else { width };
        if along < band || along >= extent - band {
            Rgb(WASTE)
        } else {
            Rgb(keep)
        }
    }))
}

fn assert_cell_filled(img: &RgbImage, layout: &LayoutSpec, index: usize, density: f64, rgb: [u8; 3]) {
    let cell = layout.cell_rect(index).to_pixels(density);
    for y in cell.y..cell.bottom() {
        for x in cell.x..cell.right() {
            assert_eq!(img.get_pixel(x, y).0, rgb, "cell {index} pixel ({x},{y})");
        }
    }
}

#[tokio::test]
async fn diagonal_strip_on_white() {
    let colors = [[200, 30, 30], [30, 200, 30], [30, 30, 200]];
    // 640x480 into a 320x200 cell keeps rows 40..440.
    let set = complete(colors.iter().map(|&c| banded(640, 480, c, true, 40)).collect());
    let layout = compute_layout(Template::Diagonal, DeviceClass::Standard);
    let density = pixel_density(DeviceClass::Standard, Some(1.0));

    let result = Renderer::new()
        .render(&set, &layout, &Background::default(), density)
        .await
        .unwrap();

    assert_eq!(result.logical_size(), (350, 730));
    assert_eq!(result.pixel_size(), (700, 1460));

    let img = result.image();
    for (i, &c) in colors.iter().enumerate() {
        assert_cell_filled(img, &layout, i, density, c);
    }
    assert!(img.pixels().all(|p| p.0 != WASTE));

    // Margin, gap, and caption strip keep the background.
    assert_eq!(img.get_pixel(10, 10).0, WHITE);
    assert_eq!(img.get_pixel(350, 440).0, WHITE);
    assert_eq!(img.get_pixel(350, 1400).0, WHITE);
}

#[tokio::test]
async fn grid_with_wide_and_portrait_sources() {
    let keep = [20, 180, 90];
    // 16:9 into 200x260 keeps columns 545..1376; portrait keeps rows 172..1108.
    let set = complete(vec![
        banded(1920, 1080, keep, false, 540),
        banded(720, 1280, keep, true, 170),
        banded(1920, 1080, keep, false, 540),
        banded(720, 1280, keep, true, 170),
    ]);
    let layout = compute_layout(Template::Grid, DeviceClass::Standard);
    let density = 2.0;

    let result = Renderer::new()
        .render(&set, &layout, &Background::Solid(FrameColor::BLACK), density)
        .await
        .unwrap();

    assert_eq!(result.pixel_size(), (880, 1280));
    let img = result.image();
    for i in 0..4 {
        assert_cell_filled(img, &layout, i, density, keep);
    }
    assert_eq!(img.get_pixel(440, 300).0, [0, 0, 0]);
}

#[tokio::test]
async fn texture_is_stretched_across_canvas() {
    // Left half red, right half blue: a stretched texture splits the
    // canvas once at the middle, a tiled one would repeat the split.
    let texture = RgbImage::from_fn(40, 20, |x, _| {
        if x < 20 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });
    let mut bytes = Cursor::new(Vec::new());
    texture.write_to(&mut bytes, ImageFormat::Png).unwrap();

    let mut background = Background::default();
    background.select_texture(ImageSource::memory("halves.png", bytes.into_inner()));
    assert!(background.color().is_none());

    let set = complete(vec![Frame::solid(40, 30, [0, 200, 0]); 3]);
    let layout = compute_layout(Template::Diagonal, DeviceClass::Compact);
    let renderer = Renderer::new();

    let first = renderer.render(&set, &layout, &background, 2.0).await.unwrap();
    let second = renderer.render(&set, &layout, &background, 2.0).await.unwrap();
    assert_eq!(first.image(), second.image());

    let img = first.image();
    let (w, h) = first.pixel_size();
    let is_red = |p: [u8; 3]| p[0] > 200 && p[2] < 55;
    let is_blue = |p: [u8; 3]| p[2] > 200 && p[0] < 55;

    for y in 0..h {
        assert!(is_red(img.get_pixel(1, y).0), "left border at y={y}");
        assert!(is_blue(img.get_pixel(w - 2, y).0), "right border at y={y}");
    }

    // The caption strip shows only background.
    let row = h - 4;
    let switch = (0..w)
        .find(|&x| img.get_pixel(x, row).0[2] > img.get_pixel(x, row).0[0])
        .unwrap();
    assert!(switch.abs_diff(w / 2) <= w / 40, "switch at {switch}, width {w}");
    assert!(is_red(img.get_pixel(switch - w / 10, row).0));
    assert!(is_blue(img.get_pixel(switch + w / 10, row).0));
}

#[tokio::test]
async fn broken_texture_fails_the_render() {
    let background = Background::Texture(ImageSource::memory("torn.png", vec![1u8, 2, 3]));
    let set = complete(vec![Frame::solid(4, 3, [0, 0, 0]); 3]);
    let layout = compute_layout(Template::Diagonal, DeviceClass::Compact);

    let err = Renderer::new()
        .render(&set, &layout, &background, 2.0)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("torn.png"));
}
