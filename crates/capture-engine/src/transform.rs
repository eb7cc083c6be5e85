//! Pixel transforms applied to snapshots: mirroring and filters.
//!
//! Filters follow the CSS filter-effects definitions, so a stored photo
//! looks like the filtered live preview.

use image::imageops::{self, FilterType};
use image::RgbImage;
use photobooth_model::filter::{CaptureTransform, FilterKind};
use photobooth_model::template::Resolution;

type ColorMatrix = [[f32; 3]; 3];

/// Apply mirror then filter.
pub fn apply_transform(image: RgbImage, transform: CaptureTransform) -> RgbImage {
    let image = if transform.mirrored {
        imageops::flip_horizontal(&image)
    } else {
        image
    };
    apply_filter(image, transform.filter)
}

/// Scale `image` to exactly `resolution`, ignoring aspect ratio (the
/// stream is drawn into a canvas of the session's resolution).
pub fn fit_to_resolution(image: RgbImage, resolution: Resolution) -> RgbImage {
    if image.dimensions() == (resolution.width, resolution.height) {
        return image;
    }
    imageops::resize(
        &image,
        resolution.width,
        resolution.height,
        FilterType::Triangle,
    )
}

/// Apply a single filter at its fixed intensity.
pub fn apply_filter(mut image: RgbImage, filter: FilterKind) -> RgbImage {
    let amount = filter.intensity();
    match filter {
        FilterKind::None => image,
        FilterKind::Blur => imageops::blur(&image, amount),
        FilterKind::Invert => {
            map_channels(&mut image, |v| v + amount * (1.0 - 2.0 * v));
            image
        }
        FilterKind::Brighten => {
            map_channels(&mut image, |v| v * amount);
            image
        }
        FilterKind::HighContrast => {
            map_channels(&mut image, |v| (v - 0.5) * amount + 0.5);
            image
        }
        FilterKind::Grayscale => {
            apply_matrix(&mut image, &grayscale_matrix(amount));
            image
        }
        FilterKind::Sepia => {
            apply_matrix(&mut image, &sepia_matrix(amount));
            image
        }
        FilterKind::Saturate => {
            apply_matrix(&mut image, &saturate_matrix(amount));
            image
        }
        FilterKind::HueRotate => {
            apply_matrix(&mut image, &hue_rotate_matrix(amount));
            image
        }
    }
}

fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn map_channels(image: &mut RgbImage, f: impl Fn(f32) -> f32) {
    let lut: Vec<u8> = (0..=255u8).map(|v| to_byte(f(to_unit(v)))).collect();
    for pixel in image.pixels_mut() {
        for c in pixel.0.iter_mut() {
            *c = lut[*c as usize];
        }
    }
}

fn apply_matrix(image: &mut RgbImage, m: &ColorMatrix) {
    for pixel in image.pixels_mut() {
        let [r, g, b] = pixel.0.map(to_unit);
        pixel.0 = [
            to_byte(m[0][0] * r + m[0][1] * g + m[0][2] * b),
            to_byte(m[1][0] * r + m[1][1] * g + m[1][2] * b),
            to_byte(m[2][0] * r + m[2][1] * g + m[2][2] * b),
        ];
    }
}

fn grayscale_matrix(amount: f32) -> ColorMatrix {
    let a = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * a, 0.7152 - 0.7152 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 + 0.2848 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 - 0.7152 * a, 0.0722 + 0.9278 * a],
    ]
}

fn sepia_matrix(amount: f32) -> ColorMatrix {
    let a = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
        [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
        [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
    ]
}

fn saturate_matrix(s: f32) -> ColorMatrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> ColorMatrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}
