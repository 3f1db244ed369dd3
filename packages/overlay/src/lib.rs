#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The crime-risk prediction overlay.
//!
//! Drives one fetch-transform-aggregate cycle per overlay lifetime across
//! the fixed category set, substitutes the bundled fallback dataset for any
//! category whose live fetch fails or comes back empty, and exposes the
//! resulting marker list plus a marker selection state machine to the map
//! renderer.
//!
//! No fetch failure ever surfaces to the rendering layer: a total outage
//! across all categories still yields fallback-sourced markers, never an
//! empty overlay and never an error.

pub mod popup;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use big_city_prediction::{PredictionSource, fallback};
use big_city_prediction_models::{EventCategory, GeoMarker};

/// Cooperative cancellation flag.
///
/// The host captures a clone when the overlay is mounted and cancels it on
/// teardown. The overlay checks the flag once, immediately before its single
/// state write; in-flight requests are not aborted, their results are just
/// discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the flag cancelled. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The overlay's working state, owned exclusively by [`Overlay`].
#[derive(Debug, Clone)]
pub struct OverlayState {
    markers: Vec<GeoMarker>,
    loading: bool,
    selected: Option<String>,
}

impl OverlayState {
    fn new() -> Self {
        Self {
            markers: Vec::new(),
            loading: true,
            selected: None,
        }
    }

    /// The current marker list, in fixed category order with per-category
    /// rank order preserved.
    #[must_use]
    pub fn markers(&self) -> &[GeoMarker] {
        &self.markers
    }

    /// `true` until the aggregation cycle has published its result.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The currently selected marker, if any.
    #[must_use]
    pub fn selected_marker(&self) -> Option<&GeoMarker> {
        let id = self.selected.as_deref()?;
        self.markers.iter().find(|marker| marker.id == id)
    }
}

/// The prediction overlay: one fetch cycle, one marker list, one selection.
///
/// Generic over its [`PredictionSource`] so the live HTTP client and
/// in-memory test sources are interchangeable.
pub struct Overlay<S> {
    source: S,
    state: Mutex<OverlayState>,
    started: AtomicBool,
    cancel: CancelFlag,
}

impl<S> Overlay<S> {
    /// Creates an overlay in its initial state: no markers, loading, no
    /// selection.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_cancel_flag(source, CancelFlag::new())
    }

    /// Creates an overlay wired to an externally owned cancellation flag,
    /// the one the host captured at mount time.
    #[must_use]
    pub fn with_cancel_flag(source: S, cancel: CancelFlag) -> Self {
        Self {
            source,
            state: Mutex::new(OverlayState::new()),
            started: AtomicBool::new(false),
            cancel,
        }
    }

    /// Returns a handle the host can use to cancel the overlay on teardown.
    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    fn state(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against a snapshot of the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&OverlayState) -> R) -> R {
        f(&self.state())
    }

    /// Marks the marker with `id` selected, e.g. from a marker click.
    ///
    /// An id not present in the current marker list is ignored, so a stale
    /// click arriving after a reload cannot select a phantom marker. The
    /// host is expected to stop the click from also reaching the map
    /// background handler.
    pub fn select_marker(&self, id: &str) {
        let mut state = self.state();
        if state.markers.iter().any(|marker| marker.id == id) {
            state.selected = Some(id.to_string());
        }
    }

    /// Clears the selection, e.g. from a map-background click or an
    /// explicit popup close.
    pub fn clear_selection(&self) {
        self.state().selected = None;
    }
}

impl<S: PredictionSource> Overlay<S> {
    /// Runs the fetch-transform-aggregate cycle.
    ///
    /// At most one cycle runs per overlay lifetime: a one-shot latch makes
    /// every call after the first a no-op, so rapid remount churn cannot
    /// issue duplicate request batches. The final state write is skipped if
    /// the overlay was cancelled while the fetches were in flight.
    pub async fn load(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            log::debug!("overlay load already initiated, ignoring");
            return;
        }

        let markers = gather(&self.source).await;

        if self.cancel.is_cancelled() {
            log::debug!("overlay cancelled mid-load, discarding {} markers", markers.len());
            return;
        }

        let mut state = self.state();
        state.markers = markers;
        state.loading = false;
    }
}

/// Fetches every category concurrently and aggregates the results.
///
/// One future per category, joined before aggregation; each future owns its
/// own category's result, so there is no shared mutable state, and
/// `join_all` preserves input order, giving the fixed category ordering of
/// the output. A category whose fetch fails or returns nothing is
/// substituted with the fallback dataset filtered to that category.
async fn gather<S: PredictionSource>(source: &S) -> Vec<GeoMarker> {
    let per_category = EventCategory::all().iter().map(|&category| async move {
        let ranked = match source.top_locations(category).await {
            Ok(ranked) if !ranked.is_empty() => {
                log::info!("loaded {} live predictions for {category}", ranked.len());
                ranked
            }
            Ok(_) => {
                log::warn!("no live predictions for {category}, substituting fallback");
                fallback::for_category(category)
            }
            Err(e) => {
                log::warn!("prediction fetch failed for {category}: {e}, substituting fallback");
                fallback::for_category(category)
            }
        };

        ranked
            .iter()
            .enumerate()
            .map(|(ordinal, raw)| GeoMarker::from_raw(category, ordinal, raw))
            .collect::<Vec<_>>()
    });

    futures::future::join_all(per_category)
        .await
        .into_iter()
        .flatten()
        .collect()
}
