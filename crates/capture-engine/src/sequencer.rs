//! Countdown-and-shoot state machine.
//!
//! ```text
//! Idle ──begin──▶ Counting(n) ──1s──▶ … Counting(0) ──▶ Triggering ──▶ Idle
//! ```
//!
//! Each shot runs as one spawned task whose handle is kept for
//! cancellation. The snapshot itself runs on the blocking pool while the
//! flash pulse shows. A shot id guards the trigger and the store, so a
//! cancelled shot can never write into the photo set, even if its task
//! is already running.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use photobooth_model::filter::CaptureTransform;
use photobooth_model::frame::Frame;
use photobooth_model::photo_set::PhotoSet;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::session::{lock, SharedSession};

/// Countdown granularity.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Nominal length of the flash pulse.
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(300);

/// Longest countdown the sequencer accepts.
pub const MAX_COUNTDOWN_SECS: u32 = 10;

/// A photo set shared between the sequencer and the UI owner.
pub type SharedPhotoSet = Arc<Mutex<PhotoSet>>;

/// Observable sequencer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotState {
    Idle,
    Counting { slot: usize, remaining: u32 },
    Triggering { slot: usize },
}

/// Everything that happens during a shot, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotEvent {
    /// Countdown value published, including the initial value and 0.
    Tick { slot: usize, remaining: u32 },
    /// A frame was stored in `slot`.
    Captured { slot: usize, width: u32, height: u32 },
    /// The camera had no frame to give; the slot was left unchanged.
    Skipped { slot: usize },
    /// The shot was cancelled before its frame was stored.
    Cancelled { slot: usize },
}

/// Why `begin` was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SequencerError {
    #[error("A shot is already in progress: {0:?}")]
    Busy(ShotState),

    #[error("Slot {slot} out of range (set has {len} slots)")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("Countdown of {0}s exceeds the {max}s maximum", max = MAX_COUNTDOWN_SECS)]
    CountdownTooLong(u32),

    #[error("Every slot is already filled")]
    SetComplete,
}

struct ActiveShot {
    id: u64,
    slot: usize,
}

fn is_current(active: &Option<ActiveShot>, id: u64) -> bool {
    active.as_ref().is_some_and(|shot| shot.id == id)
}

struct Shared {
    session: SharedSession,
    photos: SharedPhotoSet,
    flash_duration: Duration,
    state: watch::Sender<ShotState>,
    events: broadcast::Sender<ShotEvent>,
    active: Mutex<Option<ActiveShot>>,
    flash_until: Mutex<Option<Instant>>,
}

impl Shared {
    fn publish(&self, state: ShotState, event: Option<ShotEvent>) {
        self.state.send_replace(state);
        if let Some(event) = event {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }

    fn tick(&self, id: u64, slot: usize, remaining: u32) -> bool {
        let active = lock(&self.active);
        if !is_current(&active, id) {
            return false;
        }
        tracing::debug!(slot, remaining, "Countdown tick");
        self.publish(
            ShotState::Counting { slot, remaining },
            Some(ShotEvent::Tick { slot, remaining }),
        );
        true
    }

    /// Claim the shot for capture and start the flash pulse.
    fn begin_trigger(&self, id: u64, slot: usize) -> bool {
        let active = lock(&self.active);
        if !is_current(&active, id) {
            tracing::debug!(slot, "Stale trigger ignored");
            return false;
        }
        self.publish(ShotState::Triggering { slot }, None);
        *lock(&self.flash_until) = Some(Instant::now() + self.flash_duration);
        true
    }

    /// Take the snapshot off the async runtime, then store it if the shot
    /// was not cancelled in the meantime.
    async fn trigger(&self, id: u64, slot: usize, transform: CaptureTransform) {
        if !self.begin_trigger(id, slot) {
            return;
        }

        let session = Arc::clone(&self.session);
        let frame = match tokio::task::spawn_blocking(move || lock(&session).snapshot(transform))
            .await
        {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(slot, error = %e, "Snapshot task failed");
                Frame::empty()
            }
        };

        let mut active = lock(&self.active);
        if !is_current(&active, id) {
            tracing::debug!(slot, "Snapshot discarded after cancel");
            return;
        }

        let event = if frame.is_empty() {
            tracing::warn!(slot, "Camera had no frame yet, shot skipped");
            ShotEvent::Skipped { slot }
        } else {
            let (width, height) = frame.dimensions();
            lock(&self.photos).set(slot, frame);
            tracing::info!(slot, width, height, "Photo captured");
            ShotEvent::Captured {
                slot,
                width,
                height,
            }
        };

        *active = None;
        self.publish(ShotState::Idle, Some(event));
    }
}

/// Drives countdowns and writes snapshots into photo slots.
///
/// At most one shot is in flight. `begin` must be called from within a
/// tokio runtime.
pub struct ShotSequencer {
    shared: Arc<Shared>,
    pending: Option<JoinHandle<()>>,
    next_id: u64,
}

impl ShotSequencer {
    pub fn new(session: SharedSession, photos: SharedPhotoSet) -> Self {
        Self::with_flash_duration(session, photos, DEFAULT_FLASH_DURATION)
    }

    pub fn with_flash_duration(
        session: SharedSession,
        photos: SharedPhotoSet,
        flash_duration: Duration,
    ) -> Self {
        let (state, _) = watch::channel(ShotState::Idle);
        let (events, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                session,
                photos,
                flash_duration,
                state,
                events,
                active: Mutex::new(None),
                flash_until: Mutex::new(None),
            }),
            pending: None,
            next_id: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> ShotState {
        *self.shared.state.borrow()
    }

    /// Watch state changes. Intermediate values may be coalesced; use
    /// [`ShotSequencer::subscribe_events`] to see every step.
    pub fn watch_state(&self) -> watch::Receiver<ShotState> {
        self.shared.state.subscribe()
    }

    /// Receive every tick and outcome from now on.
    pub fn subscribe_events(&self) -> broadcast::Receiver<ShotEvent> {
        self.shared.events.subscribe()
    }

    /// Current countdown value, if counting.
    pub fn remaining(&self) -> Option<u32> {
        match self.state() {
            ShotState::Counting { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    /// Whether the flash pulse of the last shot is still showing.
    pub fn flash_active(&self) -> bool {
        lock(&self.shared.flash_until).is_some_and(|until| Instant::now() < until)
    }

    /// Start a countdown of `duration_secs` for `slot`.
    ///
    /// Rejected unless idle. A filled slot is overwritten when the shot
    /// fires. `transform` is fixed for this shot.
    pub fn begin(
        &mut self,
        slot: usize,
        duration_secs: u32,
        transform: CaptureTransform,
    ) -> Result<(), SequencerError> {
        if duration_secs > MAX_COUNTDOWN_SECS {
            return Err(SequencerError::CountdownTooLong(duration_secs));
        }
        let len = lock(&self.shared.photos).len();
        if slot >= len {
            return Err(SequencerError::SlotOutOfRange { slot, len });
        }

        let id = {
            let mut active = lock(&self.shared.active);
            if active.is_some() {
                let state = self.state();
                tracing::debug!(?state, requested_slot = slot, "Shot rejected: busy");
                return Err(SequencerError::Busy(state));
            }
            self.next_id += 1;
            *active = Some(ActiveShot {
                id: self.next_id,
                slot,
            });
            self.next_id
        };

        tracing::info!(slot, duration_secs, "Countdown started");
        self.shared.publish(
            ShotState::Counting {
                slot,
                remaining: duration_secs,
            },
            Some(ShotEvent::Tick {
                slot,
                remaining: duration_secs,
            }),
        );

        let shared = Arc::clone(&self.shared);
        self.pending = Some(tokio::spawn(async move {
            let mut remaining = duration_secs;
            while remaining > 0 {
                tokio::time::sleep(TICK_INTERVAL).await;
                remaining -= 1;
                if !shared.tick(id, slot, remaining) {
                    return;
                }
            }
            shared.trigger(id, slot, transform).await;
        }));

        Ok(())
    }

    /// Abort the pending shot, if any. No trigger fires afterwards.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let cancelled = lock(&self.shared.active).take();
        if let Some(shot) = cancelled {
            tracing::info!(slot = shot.slot, "Countdown cancelled");
            self.shared
                .publish(ShotState::Idle, Some(ShotEvent::Cancelled { slot: shot.slot }));
        }
    }

    /// Wait until no shot is in flight.
    pub async fn wait_idle(&self) {
        let mut rx = self.watch_state();
        // The sender lives in `self.shared`, so the channel cannot close here.
        let _ = rx.wait_for(|state| *state == ShotState::Idle).await;
    }
}

impl Drop for ShotSequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}
