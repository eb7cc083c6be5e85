//! Latest-wins render scheduling.
//!
//! Every change to the photos, layout or background issues a new render
//! request. Renders may overlap; each request is numbered, and a finished
//! render is published only if no newer request was issued meanwhile.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use photobooth_common::error::BoothResult;
use photobooth_layout::LayoutSpec;
use photobooth_model::background::Background;
use photobooth_model::photo_set::PhotoSet;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::compositor::{CompositeResult, Renderer};

/// What happened to a finished render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The result became the current composite.
    Published { generation: u64 },
    /// A newer request was issued while this one ran; result dropped.
    Superseded { generation: u64, latest: u64 },
}

/// Runs renders in the background and publishes the newest result.
pub struct RenderScheduler {
    renderer: Renderer,
    latest_requested: Arc<AtomicU64>,
    current: Arc<watch::Sender<Option<CompositeResult>>>,
}

impl RenderScheduler {
    pub fn new(renderer: Renderer) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            renderer,
            latest_requested: Arc::new(AtomicU64::new(0)),
            current: Arc::new(current),
        }
    }

    /// Generation of the most recent request.
    pub fn latest_generation(&self) -> u64 {
        self.latest_requested.load(Ordering::SeqCst)
    }

    /// The currently published composite, if any.
    pub fn current(&self) -> Option<CompositeResult> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CompositeResult>> {
        self.current.subscribe()
    }

    /// Start a render. Must be called from within a tokio runtime.
    ///
    /// Inputs are taken by value so the render sees them as they were
    /// when requested.
    pub fn request(
        &self,
        photos: PhotoSet,
        layout: LayoutSpec,
        background: Background,
        density: f64,
    ) -> JoinHandle<BoothResult<RenderOutcome>> {
        let generation = self.latest_requested.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, "Render requested");

        let renderer = self.renderer.clone();
        let latest_requested = Arc::clone(&self.latest_requested);
        let current = Arc::clone(&self.current);

        tokio::spawn(async move {
            let result = renderer
                .render(&photos, &layout, &background, density)
                .await
                .map_err(|e| {
                    tracing::warn!(generation, error = %e, "Render failed");
                    e
                })?
                .with_generation(generation);

            let published = current.send_if_modified(|slot| {
                let newest = latest_requested.load(Ordering::SeqCst) == generation;
                let newer_than_shown = slot.as_ref().map_or(true, |r| r.generation() < generation);
                if newest && newer_than_shown {
                    *slot = Some(result);
                    true
                } else {
                    false
                }
            });

            if published {
                tracing::debug!(generation, "Composite published");
                Ok(RenderOutcome::Published { generation })
            } else {
                let latest = latest_requested.load(Ordering::SeqCst);
                tracing::debug!(generation, latest, "Stale composite dropped");
                Ok(RenderOutcome::Superseded { generation, latest })
            }
        })
    }
}
