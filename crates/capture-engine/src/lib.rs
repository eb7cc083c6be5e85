//! Photobooth Capture Engine
//!
//! Drives the capture phase: opening the camera, counting down, firing
//! the flash, and storing transformed snapshots into photo slots.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 CaptureStage                  │
//! │  ┌──────────────┐        ┌─────────────────┐ │
//! │  │ ShotSequencer│──tick─▶│  watch / events │ │
//! │  └──────┬───────┘        └─────────────────┘ │
//! │         │ trigger                            │
//! │         ▼                                    │
//! │  ┌──────────────┐  snapshot  ┌────────────┐  │
//! │  │CaptureSession│───────────▶│  PhotoSet  │  │
//! │  └──────┬───────┘ mirror +   └────────────┘  │
//! │         │         filter                     │
//! │         ▼                                    │
//! │    CameraBackend / LiveSource                │
//! └──────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod sequencer;
pub mod session;
pub mod stage;
pub mod transform;

pub use sequencer::*;
pub use session::*;
pub use stage::*;
