//! The station catalog: a lazily loaded, memoized view of the Rasp
//! station tree.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{City, StationItem, country_title};
use crate::rasp::{CountryDto, RaspError};

use super::config::CatalogConfig;
use super::error::CatalogError;
use super::search::sort_cities;
use super::tree::{Country, flatten_cities, index_stations, normalize};

/// Where the full station tree comes from.
pub trait StationSource: Send + Sync {
    /// Fetch the whole country → region → settlement → station tree.
    fn fetch_all_stations(
        &self,
    ) -> impl Future<Output = Result<Vec<CountryDto>, RaspError>> + Send;
}

/// Everything derived from one successful fetch.
#[derive(Debug)]
struct Snapshot {
    countries: Vec<Country>,
    /// Deduplicated, in tree order.
    cities: Vec<City>,
    stations: HashMap<String, Vec<StationItem>>,
}

impl Snapshot {
    fn build(raw: Vec<CountryDto>) -> Self {
        let countries = normalize(raw);
        let cities = flatten_cities(&countries);
        let stations = index_stations(&countries);
        Self {
            countries,
            cities,
            stations,
        }
    }
}

#[derive(Debug)]
enum LoadState {
    NotLoaded,
    /// A fetch is in flight, or one was abandoned mid-flight.
    Loading,
    Loaded(Arc<Snapshot>),
    Failed(CatalogError),
}

/// Snapshot of where the catalog is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CatalogStatus {
    NotLoaded,
    Loading,
    Loaded { countries: usize, cities: usize },
    Failed { message: String },
}

/// Station catalog over a [`StationSource`].
///
/// The tree is fetched at most once. Concurrent first callers wait on a
/// single fetch; afterwards every query reads the same immutable snapshot.
/// A failed load is remembered: later calls do not fetch again unless the
/// catalog was configured with `retry_failed_loads` or [`reset`] is called.
///
/// [`reset`]: StationCatalog::reset
#[derive(Debug)]
pub struct StationCatalog<S> {
    source: S,
    config: CatalogConfig,
    state: RwLock<LoadState>,
    /// Serializes fetches. Held across the fetch, never by readers.
    load_lock: Mutex<()>,
}

impl<S: StationSource> StationCatalog<S> {
    pub fn new(source: S, config: CatalogConfig) -> Self {
        Self {
            source,
            config,
            state: RwLock::new(LoadState::NotLoaded),
            load_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        match &*self.state.read().await {
            LoadState::Loaded(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    /// Load the station tree if it isn't loaded yet.
    ///
    /// Returns the recorded failure when the catalog is in the failed state
    /// and retrying is disabled.
    pub async fn load(&self) -> Result<(), CatalogError> {
        if self.snapshot().await.is_some() {
            return Ok(());
        }

        let _guard = self.load_lock.lock().await;

        {
            let mut state = self.state.write().await;
            match &*state {
                LoadState::Loaded(_) => return Ok(()),
                LoadState::Failed(err) if !self.config.retry_failed_loads => {
                    return Err(err.clone());
                }
                LoadState::Loading => {
                    debug!("previous station load was abandoned, fetching again");
                }
                LoadState::NotLoaded | LoadState::Failed(_) => {}
            }
            *state = LoadState::Loading;
        }

        info!("Loading station catalog");
        let result = self.source.fetch_all_stations().await;

        let mut state = self.state.write().await;
        match result {
            Ok(raw) => {
                let snapshot = Snapshot::build(raw);
                info!(
                    countries = snapshot.countries.len(),
                    cities = snapshot.cities.len(),
                    "Station catalog loaded"
                );
                *state = LoadState::Loaded(Arc::new(snapshot));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load station catalog");
                let err = CatalogError::LoadFailed {
                    message: e.to_string(),
                };
                *state = LoadState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// All cities, loading the catalog first if needed.
    ///
    /// Cities in the country named by `location_hint` (an ISO code such as
    /// "BY" or a country title) come first; with no hint the configured
    /// default country is used. Empty when the load failed.
    pub async fn cities(&self, location_hint: Option<&str>) -> Vec<City> {
        if let Err(e) = self.load().await {
            debug!(error = %e, "No cities, catalog not loaded");
            return Vec::new();
        }
        let Some(snapshot) = self.snapshot().await else {
            return Vec::new();
        };

        let hint = location_hint
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(self.config.default_country.as_str());

        let mut cities = snapshot.cities.clone();
        sort_cities(&mut cities, country_title(hint));
        cities
    }

    /// Stations of the city with the given code, sorted by title.
    ///
    /// Does not trigger a load: empty until the catalog is loaded.
    pub async fn stations(&self, city_code: &str) -> Vec<StationItem> {
        self.snapshot()
            .await
            .and_then(|s| s.stations.get(city_code.trim()).cloned())
            .unwrap_or_default()
    }

    /// The full sorted tree. Empty unless loaded.
    pub async fn countries(&self) -> Vec<Country> {
        self.snapshot()
            .await
            .map(|s| s.countries.clone())
            .unwrap_or_default()
    }

    pub async fn status(&self) -> CatalogStatus {
        match &*self.state.read().await {
            LoadState::NotLoaded => CatalogStatus::NotLoaded,
            LoadState::Loading => CatalogStatus::Loading,
            LoadState::Loaded(s) => CatalogStatus::Loaded {
                countries: s.countries.len(),
                cities: s.cities.len(),
            },
            LoadState::Failed(err) => CatalogStatus::Failed {
                message: err.to_string(),
            },
        }
    }

    /// Forget a failed load so the next `load()` fetches again.
    ///
    /// Returns whether the catalog was in the failed state.
    pub async fn reset(&self) -> bool {
        let mut state = self.state.write().await;
        if matches!(*state, LoadState::Failed(_)) {
            info!("Resetting failed station catalog");
            *state = LoadState::NotLoaded;
            true
        } else {
            false
        }
    }
}
