//! Live Search
//!
//! Each search surface (an input plus its result container) owns its own
//! generation counter and debounce slot. Keystrokes advance the generation and
//! reschedule the slot; when the slot fires the query is sent, and the response
//! is rendered only if its generation is still the surface's current one.
//! Superseded responses are dropped without a render or a failure log.
//!
//! Failures never clear what is already shown and never raise a banner.

use crate::api::{ApiRequest, ApiResponse, StorefrontApi};
use crate::config::SearchConfig;
use crate::debounce::{Debouncer, Generation, GenerationCounter};
use crate::error::SyncError;
use crate::render::{render_results, ProductHit};
use crate::types::SurfaceId;
use crate::views::{ResultsPanel, SharedResults};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A keystroke on one surface, carrying the full input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub surface: SurfaceId,
    pub value: String,
}

impl InputEvent {
    pub fn new(surface: impl Into<SurfaceId>, value: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            value: value.into(),
        }
    }
}

/// Where a pointer interaction landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    SearchInput(SurfaceId),
    SearchResults(SurfaceId),
    Elsewhere,
}

impl ClickTarget {
    fn is_inside(&self, surface: &SurfaceId) -> bool {
        match self {
            ClickTarget::SearchInput(id) | ClickTarget::SearchResults(id) => id == surface,
            ClickTarget::Elsewhere => false,
        }
    }
}

/// Per-surface state: generation counter and result container.
#[derive(Debug)]
pub struct SearchSurface {
    id: SurfaceId,
    generation: GenerationCounter,
    results: SharedResults,
}

impl SearchSurface {
    fn new(id: SurfaceId) -> Self {
        Self {
            id,
            generation: GenerationCounter::new(),
            results: ResultsPanel::shared(),
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn current_generation(&self) -> Generation {
        self.generation.current()
    }

    pub fn results(&self) -> SharedResults {
        Arc::clone(&self.results)
    }

    /// Render `hits` if `generation` is still current. The check and the render
    /// happen under the panel lock.
    fn render_if_current(&self, generation: Generation, hits: &[ProductHit]) -> bool {
        let mut panel = self.results.lock();
        if !self.generation.is_current(generation) {
            return false;
        }
        render_results(&mut panel, hits);
        true
    }
}

struct Inner {
    api: Arc<dyn StorefrontApi>,
    config: SearchConfig,
    debouncer: Debouncer<SurfaceId>,
    surfaces: RwLock<HashMap<SurfaceId, Arc<SearchSurface>>>,
}

/// Routes input and click events to the registered search surfaces.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct SearchCoordinator {
    inner: Arc<Inner>,
}

impl SearchCoordinator {
    pub fn new(api: Arc<dyn StorefrontApi>, config: SearchConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                config,
                debouncer: Debouncer::new(),
                surfaces: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Bind a surface. Each surface id can be bound once until it is disposed.
    pub fn register(&self, id: impl Into<SurfaceId>) -> Result<SurfaceBinding, SyncError> {
        let id = id.into();
        let mut surfaces = self.inner.surfaces.write();
        if surfaces.contains_key(&id) {
            return Err(SyncError::SurfaceAlreadyBound(id));
        }
        let surface = Arc::new(SearchSurface::new(id.clone()));
        let results = surface.results();
        surfaces.insert(id.clone(), surface);
        debug!(surface = %id, "Search surface bound");

        Ok(SurfaceBinding {
            id,
            results,
            inner: Arc::clone(&self.inner),
        })
    }

    pub fn surface(&self, id: &SurfaceId) -> Option<Arc<SearchSurface>> {
        self.inner.surfaces.read().get(id).cloned()
    }

    /// Handle a keystroke. Returns the generation assigned to it, or `None` if
    /// the surface is not bound.
    pub fn on_input(&self, event: InputEvent) -> Option<Generation> {
        let Some(surface) = self.surface(&event.surface) else {
            debug!(surface = %event.surface, "Input for unbound search surface ignored");
            return None;
        };

        let generation = surface.generation.advance();
        let api = Arc::clone(&self.inner.api);
        let timeout = self.inner.config.response_timeout();
        let query = event.value;

        self.inner.debouncer.schedule(
            event.surface,
            self.inner.config.debounce(),
            async move {
                issue_search(api, surface, query, generation, timeout).await;
            },
        );
        Some(generation)
    }

    /// Clear every surface whose input and results were both missed by the click.
    pub fn on_click(&self, target: &ClickTarget) {
        for surface in self.inner.surfaces.read().values() {
            if !target.is_inside(&surface.id) {
                surface.results.lock().clear();
            }
        }
    }

    /// Whether a keystroke on `id` is still waiting out the debounce delay.
    pub fn is_pending(&self, id: &SurfaceId) -> bool {
        self.inner.debouncer.is_pending(id)
    }
}

/// Registration handle for one search surface.
///
/// Disposal is explicit: dropping the binding leaves the surface registered.
pub struct SurfaceBinding {
    id: SurfaceId,
    results: SharedResults,
    inner: Arc<Inner>,
}

impl SurfaceBinding {
    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn results(&self) -> SharedResults {
        Arc::clone(&self.results)
    }

    /// Unbind the surface: cancel its pending keystroke and drop any response
    /// still in flight.
    pub fn dispose(self) {
        self.inner.debouncer.cancel(&self.id);
        if let Some(surface) = self.inner.surfaces.write().remove(&self.id) {
            surface.generation.advance();
        }
        debug!(surface = %self.id, "Search surface disposed");
    }
}

async fn issue_search(
    api: Arc<dyn StorefrontApi>,
    surface: Arc<SearchSurface>,
    query: String,
    generation: Generation,
    timeout: Duration,
) {
    debug!(
        surface = %surface.id,
        generation = generation.as_u64(),
        query = %query,
        "Dispatching search"
    );

    let sent = tokio::time::timeout(timeout, api.send(ApiRequest::SearchProducts { query })).await;

    if !surface.generation.is_current(generation) {
        debug!(
            surface = %surface.id,
            generation = generation.as_u64(),
            current = surface.current_generation().as_u64(),
            "Discarding superseded search response"
        );
        return;
    }

    let response = match sent {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            warn!(surface = %surface.id, error = %e, "Search request failed");
            return;
        }
        Err(_) => {
            warn!(
                surface = %surface.id,
                timeout_ms = timeout.as_millis() as u64,
                "Search request timed out"
            );
            return;
        }
    };

    let hits = match parse_hits(&surface.id, response) {
        Ok(hits) => hits,
        Err(e) => {
            warn!(surface = %surface.id, error = %e, "Search response not rendered");
            return;
        }
    };

    if surface.render_if_current(generation, &hits) {
        debug!(surface = %surface.id, hits = hits.len(), "Search results rendered");
    }
}

/// Decode the hit list. A hit that cannot be linked is skipped, not fatal.
fn parse_hits(surface: &SurfaceId, response: ApiResponse) -> Result<Vec<ProductHit>, SyncError> {
    if !response.is_success() {
        return Err(response.into_server_error());
    }
    let items: Vec<serde_json::Value> = match response.body {
        Some(body) => {
            serde_json::from_value(body).map_err(|e| SyncError::Decode(e.to_string()))?
        }
        None => return Err(SyncError::Decode("empty search response".to_string())),
    };

    let hits = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ProductHit>(item) {
            Ok(hit) => Some(hit),
            Err(e) => {
                warn!(surface = %surface, error = %e, "Skipping unusable search hit");
                None
            }
        })
        .collect();
    Ok(hits)
}
