//! Synthetic camera for demos and tests.
//!
//! Produces a deterministic test pattern, or cycles through a supplied
//! list of images, and can simulate the failure modes of a real device.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use image::{Rgb, RgbImage};
use photobooth_common::error::CameraError;
use photobooth_model::template::Resolution;

use super::{CameraBackend, LiveSource, StreamRequest};

/// How the synthetic device responds to `acquire`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Ready,
    PermissionDenied,
    Unavailable,
}

#[derive(Debug, Default)]
struct DeviceState {
    in_use: AtomicBool,
    frames_served: AtomicU64,
    acquisitions: AtomicU64,
}

/// An in-process camera backend. Clones share the same device.
#[derive(Debug, Clone, Default)]
pub struct SyntheticCamera {
    device: Arc<DeviceState>,
    availability: Availability,
    warmup_reads: u64,
    native_resolution: Option<Resolution>,
    feed: Arc<Vec<RgbImage>>,
}

impl SyntheticCamera {
    /// A ready camera streaming the test pattern at the requested resolution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these images in order (wrapping around) instead of the pattern.
    pub fn with_feed(mut self, feed: Vec<RgbImage>) -> Self {
        self.feed = Arc::new(feed);
        self
    }

    /// Return no frame for the first `reads` reads of each stream, like a
    /// device that is still warming up.
    pub fn with_warmup_reads(mut self, reads: u64) -> Self {
        self.warmup_reads = reads;
        self
    }

    /// Stream at a fixed resolution regardless of the request.
    pub fn with_native_resolution(mut self, resolution: Resolution) -> Self {
        self.native_resolution = Some(resolution);
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Whether a live source currently holds the device.
    pub fn is_in_use(&self) -> bool {
        self.device.in_use.load(Ordering::SeqCst)
    }

    /// Total frames handed out across all streams.
    pub fn frames_served(&self) -> u64 {
        self.device.frames_served.load(Ordering::SeqCst)
    }

    /// Number of successful acquisitions.
    pub fn acquisitions(&self) -> u64 {
        self.device.acquisitions.load(Ordering::SeqCst)
    }
}

impl CameraBackend for SyntheticCamera {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn acquire(&self, request: &StreamRequest) -> Result<Box<dyn LiveSource>, CameraError> {
        match self.availability {
            Availability::Ready => {}
            Availability::PermissionDenied => {
                return Err(CameraError::permission_denied(
                    "camera access was not granted",
                ))
            }
            Availability::Unavailable => {
                return Err(CameraError::unavailable("no camera connected"));
            }
        }

        if self
            .device
            .in_use
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CameraError::unavailable(
                "camera is already held by another session",
            ));
        }
        self.device.acquisitions.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(SyntheticSource {
            device: Arc::clone(&self.device),
            resolution: self.native_resolution.unwrap_or(request.resolution),
            warmup_reads: self.warmup_reads,
            feed: Arc::clone(&self.feed),
            reads: AtomicU64::new(0),
            stopped: false,
        }))
    }
}

struct SyntheticSource {
    device: Arc<DeviceState>,
    resolution: Resolution,
    warmup_reads: u64,
    feed: Arc<Vec<RgbImage>>,
    reads: AtomicU64,
    stopped: bool,
}

impl LiveSource for SyntheticSource {
    fn current_frame(&self) -> Option<RgbImage> {
        if self.stopped {
            return None;
        }
        let read = self.reads.fetch_add(1, Ordering::SeqCst);
        if read < self.warmup_reads {
            return None;
        }
        let sequence = read - self.warmup_reads;
        self.device.frames_served.fetch_add(1, Ordering::SeqCst);

        if self.feed.is_empty() {
            Some(test_pattern(self.resolution, sequence))
        } else {
            Some(self.feed[(sequence % self.feed.len() as u64) as usize].clone())
        }
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.device.in_use.store(false, Ordering::SeqCst);
        }
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Gradient background with a red marker block in the left quarter, so
/// orientation survives in test assertions. The blue channel encodes the
/// frame sequence number.
pub fn test_pattern(resolution: Resolution, sequence: u64) -> RgbImage {
    let Resolution { width, height } = resolution;
    let blue = ((sequence * 40) % 256) as u8;
    let marker_right = width / 4;
    let marker_top = height / 3;
    let marker_bottom = 2 * height / 3;

    RgbImage::from_fn(width, height, |x, y| {
        if x < marker_right && (marker_top..marker_bottom).contains(&y) {
            Rgb([255, 0, 0])
        } else {
            let r = (x as u64 * 200 / width.max(1) as u64) as u8;
            let g = (y as u64 * 200 / height.max(1) as u64) as u8;
            Rgb([r, g, blue])
        }
    })
}
