//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::{CatalogConfig, StationCatalog};
use crate::rasp::RaspProvider;
use crate::schedule::{ScheduleConfig, ScheduleService};

/// Shared application state.
///
/// The catalog and schedule service share one provider; clones of the
/// provider share its connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Memoized station catalog
    pub catalog: Arc<StationCatalog<RaspProvider>>,

    /// Route search, carriers and threads
    pub schedule: Arc<ScheduleService<RaspProvider>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        provider: RaspProvider,
        catalog_config: CatalogConfig,
        schedule_config: ScheduleConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(StationCatalog::new(provider.clone(), catalog_config)),
            schedule: Arc::new(ScheduleService::new(provider, schedule_config)),
        }
    }
}
