//! One capture phase: camera, photo slots and sequencer together.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use photobooth_common::error::{CameraError, IncompleteSetError};
use photobooth_model::filter::CaptureTransform;
use photobooth_model::frame::Frame;
use photobooth_model::photo_set::PhotoSet;
use photobooth_model::template::{DeviceClass, Template};

use crate::backend::CameraBackend;
use crate::sequencer::{
    SequencerError, SharedPhotoSet, ShotSequencer, DEFAULT_FLASH_DURATION, MAX_COUNTDOWN_SECS,
};
use crate::session::{lock, CaptureSession, SharedSession};

/// Tunables for a capture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOptions {
    pub countdown_secs: u32,
    pub flash_duration: Duration,
    pub transform: CaptureTransform,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            flash_duration: DEFAULT_FLASH_DURATION,
            transform: CaptureTransform::default(),
        }
    }
}

/// Owns the camera session, the photo set and the sequencer for the
/// duration of a capture phase.
///
/// Dropping the stage cancels any pending shot and releases the camera.
pub struct CaptureStage {
    template: Template,
    session: SharedSession,
    photos: SharedPhotoSet,
    sequencer: ShotSequencer,
    options: StageOptions,
}

impl CaptureStage {
    pub fn open(
        backend: &dyn CameraBackend,
        template: Template,
        device: DeviceClass,
    ) -> Result<Self, CameraError> {
        Self::open_with(backend, template, device, StageOptions::default())
    }

    pub fn open_with(
        backend: &dyn CameraBackend,
        template: Template,
        device: DeviceClass,
        options: StageOptions,
    ) -> Result<Self, CameraError> {
        let session = CaptureSession::open_for_device(backend, device)?.into_shared();
        let photos: SharedPhotoSet = Arc::new(Mutex::new(PhotoSet::new(template.photo_count())));
        let sequencer = ShotSequencer::with_flash_duration(
            Arc::clone(&session),
            Arc::clone(&photos),
            options.flash_duration,
        );

        tracing::info!(
            template = %template,
            device = %device,
            slots = template.photo_count(),
            countdown_secs = options.countdown_secs,
            "Capture stage ready"
        );

        Ok(Self {
            template,
            session,
            photos,
            sequencer,
            options,
        })
    }

    pub fn template(&self) -> Template {
        self.template
    }

    pub fn sequencer(&self) -> &ShotSequencer {
        &self.sequencer
    }

    pub fn transform(&self) -> CaptureTransform {
        self.options.transform
    }

    /// Applies to shots started after this call.
    pub fn set_transform(&mut self, transform: CaptureTransform) {
        self.options.transform = transform;
    }

    pub fn countdown_secs(&self) -> u32 {
        self.options.countdown_secs
    }

    pub fn set_countdown(&mut self, secs: u32) -> Result<(), SequencerError> {
        if secs > MAX_COUNTDOWN_SECS {
            return Err(SequencerError::CountdownTooLong(secs));
        }
        self.options.countdown_secs = secs;
        Ok(())
    }

    /// Start a shot for the first empty slot and return its index.
    pub fn capture_next(&mut self) -> Result<usize, SequencerError> {
        let slot = lock(&self.photos)
            .first_empty_index()
            .ok_or(SequencerError::SetComplete)?;
        self.shoot(slot)?;
        Ok(slot)
    }

    /// Start a shot that replaces the photo in `slot`.
    pub fn retake(&mut self, slot: usize) -> Result<(), SequencerError> {
        tracing::debug!(slot, "Retake requested");
        self.shoot(slot)
    }

    fn shoot(&mut self, slot: usize) -> Result<(), SequencerError> {
        self.sequencer
            .begin(slot, self.options.countdown_secs, self.options.transform)
    }

    /// Empty one slot, returning the photo it held.
    pub fn clear(&mut self, slot: usize) -> Option<Frame> {
        lock(&self.photos).clear(slot)
    }

    /// Cancel any pending shot and empty every slot.
    pub fn reset_all(&mut self) {
        self.sequencer.cancel();
        lock(&self.photos).reset_all();
        tracing::info!("Photo set reset");
    }

    /// Snapshot of the photo slots.
    pub fn photos(&self) -> PhotoSet {
        lock(&self.photos).clone()
    }

    pub fn is_complete(&self) -> bool {
        lock(&self.photos).is_complete()
    }

    pub fn is_camera_live(&self) -> bool {
        lock(&self.session).is_live()
    }

    pub async fn wait_idle(&self) {
        self.sequencer.wait_idle().await;
    }

    /// Cancel the pending shot, then release the camera. Idempotent.
    pub fn teardown(&mut self) {
        self.sequencer.cancel();
        lock(&self.session).close();
    }

    /// End the capture phase and hand over the finished set.
    pub fn finish(mut self) -> Result<PhotoSet, IncompleteSetError> {
        self.teardown();
        let photos = lock(&self.photos);
        if photos.is_complete() {
            Ok(photos.clone())
        } else {
            Err(IncompleteSetError {
                filled: photos.filled_count(),
                total: photos.len(),
            })
        }
    }
}

impl Drop for CaptureStage {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SyntheticCamera;
    use photobooth_model::filter::FilterKind;

    fn instant() -> StageOptions {
        StageOptions {
            countdown_secs: 0,
            ..StageOptions::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn capture_next_fills_slots_in_order() {
        let camera = SyntheticCamera::new();
        let mut stage =
            CaptureStage::open_with(&camera, Template::Diagonal, DeviceClass::Compact, instant())
                .unwrap();

        for expected in 0..3 {
            assert_eq!(stage.capture_next().unwrap(), expected);
            stage.wait_idle().await;
        }
        assert!(stage.is_complete());
        assert_eq!(stage.capture_next(), Err(SequencerError::SetComplete));

        let set = stage.finish().unwrap();
        assert_eq!(set.filled_count(), 3);
        assert_eq!(set.get(0).unwrap().dimensions(), (1280, 720));
        assert!(!camera.is_in_use());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_reopens_slot_for_capture_next() {
        let camera = SyntheticCamera::new();
        let mut stage =
            CaptureStage::open_with(&camera, Template::Grid, DeviceClass::Compact, instant())
                .unwrap();
        for _ in 0..4 {
            stage.capture_next().unwrap();
            stage.wait_idle().await;
        }
        assert!(stage.clear(2).is_some());
        assert_eq!(stage.capture_next().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn set_transform_applies_to_next_shot() {
        let camera = SyntheticCamera::new();
        let mut stage =
            CaptureStage::open_with(&camera, Template::Diagonal, DeviceClass::Compact, instant())
                .unwrap();
        assert_eq!(stage.template(), Template::Diagonal);
        assert!(stage.transform().mirrored);

        let gray = CaptureTransform::new(false, FilterKind::Grayscale);
        stage.set_transform(gray);
        assert_eq!(stage.transform(), gray);

        stage.capture_next().unwrap();
        stage.wait_idle().await;
        let photos = stage.photos();
        assert_eq!(photos.get(0).unwrap().image().get_pixel(10, 360).0, [54, 54, 54]);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_shot() {
        let camera = SyntheticCamera::new();
        let mut stage =
            CaptureStage::open(&camera, Template::Diagonal, DeviceClass::Compact).unwrap();
        stage.capture_next().unwrap();
        stage.reset_all();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(stage.photos().filled_count(), 0);
        assert_eq!(camera.frames_served(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn finish_rejects_incomplete_set() {
        let camera = SyntheticCamera::new();
        let mut stage =
            CaptureStage::open_with(&camera, Template::Grid, DeviceClass::Compact, instant())
                .unwrap();
        stage.capture_next().unwrap();
        stage.wait_idle().await;
        assert_eq!(
            stage.finish(),
            Err(IncompleteSetError {
                filled: 1,
                total: 4
            })
        );
        assert!(!camera.is_in_use());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_during_countdown_releases_camera() {
        let camera = SyntheticCamera::new();
        let mut stage =
            CaptureStage::open(&camera, Template::Diagonal, DeviceClass::Standard).unwrap();
        stage.capture_next().unwrap();
        stage.teardown();
        stage.teardown();
        assert!(!stage.is_camera_live());
        assert!(!camera.is_in_use());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(stage.photos().filled_count(), 0);
    }

    #[test]
    fn countdown_is_bounded() {
        let camera = SyntheticCamera::new();
        let mut stage =
            CaptureStage::open(&camera, Template::Diagonal, DeviceClass::Compact).unwrap();
        assert!(stage.set_countdown(10).is_ok());
        assert_eq!(
            stage.set_countdown(11),
            Err(SequencerError::CountdownTooLong(11))
        );
        assert_eq!(stage.countdown_secs(), 10);
    }
}
