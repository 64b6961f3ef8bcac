//! Normalized station tree.
//!
//! One pass over the raw payload turns option-heavy records into the tree
//! the catalog serves: settlements and stations without a code are dropped,
//! stations without a title are dropped, and every level is sorted by title.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::{City, StationItem, collation_key};
use crate::rasp::{CountryDto, RegionDto, SettlementDto, StationDto};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    /// Empty when the payload had no title.
    pub title: String,
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub title: String,
    pub settlements: Vec<Settlement>,
}

/// A settlement with a code. The title may be empty; such settlements
/// still own stations but never appear in city search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub code: String,
    pub title: String,
    pub stations: Vec<StationItem>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Sort ascending by collated title, then lowercase title; remaining ties
/// keep their input order.
fn sort_by_title<T>(items: &mut [T], title: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| {
        let title = title(item);
        (collation_key(title), title.to_lowercase())
    });
}

fn normalize_station(dto: StationDto) -> Option<StationItem> {
    let id = trimmed(dto.codes.and_then(|c| c.yandex_code))?;
    let title = trimmed(dto.title)?;
    Some(StationItem {
        id,
        title,
        transport_type: trimmed(dto.transport_type),
        station_type: trimmed(dto.station_type),
    })
}

fn normalize_settlement(dto: SettlementDto) -> Option<Settlement> {
    let code = trimmed(dto.codes.and_then(|c| c.yandex_code))?;
    let mut stations: Vec<StationItem> = dto
        .stations
        .unwrap_or_default()
        .into_iter()
        .filter_map(normalize_station)
        .collect();
    sort_by_title(&mut stations, |s| &s.title);

    Some(Settlement {
        code,
        title: trimmed(dto.title).unwrap_or_default(),
        stations,
    })
}

fn normalize_region(dto: RegionDto) -> Region {
    let mut settlements: Vec<Settlement> = dto
        .settlements
        .unwrap_or_default()
        .into_iter()
        .filter_map(normalize_settlement)
        .collect();
    sort_by_title(&mut settlements, |s| &s.title);

    Region {
        title: trimmed(dto.title).unwrap_or_default(),
        settlements,
    }
}

fn normalize_country(dto: CountryDto) -> Country {
    let mut regions: Vec<Region> = dto
        .regions
        .unwrap_or_default()
        .into_iter()
        .map(normalize_region)
        .collect();
    sort_by_title(&mut regions, |r| &r.title);

    Country {
        title: trimmed(dto.title).unwrap_or_default(),
        regions,
    }
}

/// Normalize and sort the raw station tree.
pub fn normalize(raw: Vec<CountryDto>) -> Vec<Country> {
    let mut countries: Vec<Country> = raw.into_iter().map(normalize_country).collect();
    sort_by_title(&mut countries, |c| &c.title);
    countries
}

fn settlements(countries: &[Country]) -> impl Iterator<Item = (&Country, &Settlement)> {
    countries.iter().flat_map(|country| {
        country
            .regions
            .iter()
            .flat_map(|region| region.settlements.iter())
            .map(move |settlement| (country, settlement))
    })
}

/// Flatten settlements into cities, in tree order.
///
/// Settlements without a title are skipped. When a code appears more than
/// once, the first occurrence wins.
pub fn flatten_cities(countries: &[Country]) -> Vec<City> {
    let mut seen = HashSet::new();
    settlements(countries)
        .filter(|&(_, s)| !s.title.is_empty())
        .filter(|&(_, s)| seen.insert(s.code.as_str()))
        .map(|(country, s)| City::new(&s.code, &s.title, &country.title))
        .collect()
}

/// Group stations by settlement code, merging settlements that share a
/// code, each group sorted by title.
pub fn index_stations(countries: &[Country]) -> HashMap<String, Vec<StationItem>> {
    let mut index: HashMap<String, Vec<StationItem>> = HashMap::new();
    for (_, settlement) in settlements(countries) {
        index
            .entry(settlement.code.clone())
            .or_default()
            .extend(settlement.stations.iter().cloned());
    }
    for stations in index.values_mut() {
        sort_by_title(stations, |s| &s.title);
    }
    index
}
