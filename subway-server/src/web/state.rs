//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedStationRepository;
use crate::repository::MemoryStore;
use crate::service::LineTopologyService;

/// The service as wired by the server: cached station lookups over the
/// shared store.
pub type Topology = LineTopologyService<CachedStationRepository<MemoryStore>, MemoryStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Line and station operations
    pub topology: Arc<Topology>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(topology: Topology) -> Self {
        Self {
            topology: Arc::new(topology),
        }
    }
}
