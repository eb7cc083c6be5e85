//! Print the composite layout of a template.

use photobooth_common::config::AppConfig;
use photobooth_layout::{compute_layout, pixel_density, LayoutSpec};
use photobooth_model::geometry::CellRect;
use photobooth_model::template::{DeviceClass, Template};
use serde::Serialize;

#[derive(Serialize)]
struct LayoutReport {
    template: Template,
    device: DeviceClass,
    photos: usize,
    density: f64,
    layout: LayoutSpec,
    cells: Vec<CellRect>,
    label: CellRect,
    canvas: [u32; 2],
    output: [u32; 2],
}

pub fn run(
    config: &AppConfig,
    template: Template,
    device: Option<DeviceClass>,
    density: Option<f64>,
) -> anyhow::Result<()> {
    let device = super::resolve_device(device, config)?;
    let layout = compute_layout(template, device);
    let density = pixel_density(device, density);

    let (cw, ch) = layout.canvas_size();
    let (ow, oh) = layout.output_size(density);
    let report = LayoutReport {
        template,
        device,
        photos: template.photo_count(),
        density,
        layout,
        cells: layout.cells(),
        label: layout.label_rect(),
        canvas: [cw, ch],
        output: [ow, oh],
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
