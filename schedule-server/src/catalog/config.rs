//! Station catalog configuration.

/// Country used to order cities when the caller gives no location hint.
pub const DEFAULT_COUNTRY_CODE: &str = "RU";

/// Configuration for [`StationCatalog`](super::StationCatalog).
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Location hint used when a query supplies none.
    /// An ISO country code or a country title.
    pub default_country: String,

    /// Whether `load()` fetches again after a failed load.
    /// When false a failure sticks until `reset()` is called.
    pub retry_failed_loads: bool,
}

impl CatalogConfig {
    /// Create a config with the given default country and no automatic retry.
    pub fn new(default_country: impl Into<String>) -> Self {
        Self {
            default_country: default_country.into(),
            retry_failed_loads: false,
        }
    }

    /// Enable or disable re-fetching after a failed load.
    pub fn with_retry_failed_loads(mut self, retry: bool) -> Self {
        self.retry_failed_loads = retry;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_CODE)
    }
}
