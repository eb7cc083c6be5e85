//! Run a full capture session with the synthetic camera.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use image::RgbImage;
use photobooth_capture_engine::backend::SyntheticCamera;
use photobooth_capture_engine::{CaptureStage, ShotEvent, StageOptions, MAX_COUNTDOWN_SECS};
use photobooth_common::config::AppConfig;
use photobooth_common::error::BoothError;
use photobooth_layout::{compute_layout, pixel_density};
use photobooth_model::background::{FrameColor, ImageSource};
use photobooth_model::filter::{CaptureTransform, FilterKind};
use photobooth_model::template::{DeviceClass, Template};
use photobooth_render_engine::{
    write_png, ImageCrateDecoder, ImageDecoder, RenderOutcome, RenderScheduler, Renderer,
};
use tokio::sync::broadcast::error::RecvError;

/// Consecutive empty snapshots tolerated before giving up on a slot.
const MAX_SKIPS_PER_SLOT: u32 = 5;

pub struct ShootArgs {
    pub template: Template,
    pub device: Option<DeviceClass>,
    pub countdown: Option<u32>,
    pub filter: Option<FilterKind>,
    pub mirrored: bool,
    pub feed: Vec<PathBuf>,
    pub color: Option<FrameColor>,
    pub texture: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

pub async fn run(config: &AppConfig, args: ShootArgs) -> anyhow::Result<()> {
    let device = super::resolve_device(args.device, config)?;
    let background = super::resolve_background(args.color, args.texture, config)?;
    let output = super::resolve_output(args.output, config);

    let countdown_secs = args.countdown.unwrap_or(config.capture.countdown_secs);
    if countdown_secs > MAX_COUNTDOWN_SECS {
        bail!("countdown must be at most {MAX_COUNTDOWN_SECS}s, got {countdown_secs}s");
    }
    let filter = match args.filter {
        Some(filter) => filter,
        None => config
            .capture
            .filter
            .parse()
            .map_err(|e| BoothError::config(format!("capture.filter: {e}")))?,
    };
    let mirrored = args.mirrored && config.capture.mirrored;

    let camera = SyntheticCamera::new().with_feed(load_feed(args.feed).await?);
    let options = StageOptions {
        countdown_secs,
        flash_duration: Duration::from_millis(config.capture.flash_ms),
        transform: CaptureTransform::new(mirrored, filter),
    };
    let mut stage = CaptureStage::open_with(&camera, args.template, device, options)?;
    let mut events = stage.sequencer().subscribe_events();

    println!(
        "Shooting {} photos ({}, {device}, filter: {}, countdown: {countdown_secs}s)",
        stage.template().photo_count(),
        stage.template(),
        stage.transform().filter.label()
    );

    let mut skips = 0;
    while !stage.is_complete() {
        let slot = stage.capture_next()?;
        loop {
            match events.recv().await {
                Ok(ShotEvent::Tick { slot, remaining }) if remaining > 0 => {
                    println!("  Photo {}: {remaining}...", slot + 1);
                }
                Ok(ShotEvent::Tick { .. }) => {}
                Ok(ShotEvent::Captured {
                    slot,
                    width,
                    height,
                }) => {
                    println!("  Photo {}: captured {width}x{height}", slot + 1);
                    skips = 0;
                    break;
                }
                Ok(ShotEvent::Skipped { slot }) => {
                    skips += 1;
                    if skips >= MAX_SKIPS_PER_SLOT {
                        bail!("camera produced no frame for photo {}", slot + 1);
                    }
                    println!("  Photo {}: camera not ready, retrying", slot + 1);
                    break;
                }
                Ok(ShotEvent::Cancelled { slot }) => {
                    bail!("photo {} was cancelled", slot + 1);
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "Shot events lagged");
                }
                Err(RecvError::Closed) => bail!("sequencer stopped unexpectedly"),
            }
        }
        stage.wait_idle().await;
        tracing::debug!(slot, "Shot finished");
    }

    let photos = stage.finish()?;
    println!("Camera released after {} frames", camera.frames_served());

    let layout = compute_layout(args.template, device);
    let density = pixel_density(device, None);
    let scheduler = RenderScheduler::new(Renderer::new());
    match scheduler
        .request(photos, layout, background, density)
        .await??
    {
        RenderOutcome::Published { .. } => {}
        RenderOutcome::Superseded { generation, latest } => {
            bail!("render {generation} was superseded by {latest}")
        }
    }
    let result = scheduler.current().context("no composite was published")?;

    let written = write_png(&result, &output)?;
    let (w, h) = result.pixel_size();
    println!("Wrote {} ({w}x{h})", written.display());
    Ok(())
}

async fn load_feed(paths: Vec<PathBuf>) -> anyhow::Result<Vec<RgbImage>> {
    let decoder = ImageCrateDecoder::new();
    let mut feed = Vec::with_capacity(paths.len());
    for path in paths {
        feed.push(decoder.decode(&ImageSource::Path(path)).await?);
    }
    Ok(feed)
}
