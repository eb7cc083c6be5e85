//! Composite existing photos into a strip.

use std::path::PathBuf;

use anyhow::bail;
use photobooth_common::config::AppConfig;
use photobooth_layout::{compute_layout, pixel_density};
use photobooth_model::background::{FrameColor, ImageSource};
use photobooth_model::photo_set::PhotoSet;
use photobooth_model::template::{DeviceClass, Template};
use photobooth_render_engine::{decode_frame, write_png, ImageCrateDecoder, Renderer};

pub struct ComposeArgs {
    pub images: Vec<PathBuf>,
    pub template: Option<Template>,
    pub device: Option<DeviceClass>,
    pub color: Option<FrameColor>,
    pub texture: Option<PathBuf>,
    pub density: Option<f64>,
    pub output: Option<PathBuf>,
}

pub async fn run(config: &AppConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let template = match args.template {
        Some(template) => template,
        None => match Template::from_photo_count(args.images.len()) {
            Some(template) => template,
            None => bail!("expected 3 or 4 photos, got {}", args.images.len()),
        },
    };
    if template.photo_count() != args.images.len() {
        bail!(
            "template {template} takes {} photos, got {}",
            template.photo_count(),
            args.images.len()
        );
    }

    let device = super::resolve_device(args.device, config)?;
    let background = super::resolve_background(args.color, args.texture, config)?;
    let output = super::resolve_output(args.output, config);

    println!("Composing {} photos ({template}, {device})", args.images.len());

    let decoder = ImageCrateDecoder::new();
    let mut photos = PhotoSet::new(template.photo_count());
    for (slot, path) in args.images.into_iter().enumerate() {
        let frame = decode_frame(&decoder, &ImageSource::Path(path)).await?;
        println!("  Slot {}: {}x{}", slot + 1, frame.width(), frame.height());
        photos.set(slot, frame);
    }

    let layout = compute_layout(template, device);
    let density = pixel_density(device, args.density);
    let result = Renderer::new()
        .render(&photos, &layout, &background, density)
        .await?;

    let written = write_png(&result, &output)?;
    let (w, h) = result.pixel_size();
    println!("Wrote {} ({w}x{h} @ {density}x)", written.display());
    Ok(())
}
