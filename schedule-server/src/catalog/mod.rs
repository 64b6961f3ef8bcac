//! Station catalog.
//!
//! Fetches the full Rasp station tree once, normalizes it and answers city
//! and station queries from the resulting snapshot.

mod config;
mod error;
mod index;
mod search;
mod tree;

pub use config::{CatalogConfig, DEFAULT_COUNTRY_CODE};
pub use error::CatalogError;
pub use index::{CatalogStatus, StationCatalog, StationSource};
pub use search::{filter_cities, sort_cities};
pub use tree::{Country, Region, Settlement, flatten_cities, index_stations, normalize};
