//! Mock Rasp client for running without API access.
//!
//! Loads canned API responses from JSON files and serves them as if they
//! were live. Expected layout:
//!
//! ```text
//! <dir>/stations_list.json         required, a /stations_list/ response
//! <dir>/search/<from>_<to>.json    /search/ responses
//! <dir>/carriers/<code>.json       /carrier/ responses
//! <dir>/schedules/<station>.json   /schedule/ responses
//! <dir>/threads/<uid>.json         /thread/ responses
//! <dir>/copyright.json             optional, a /copyright/ response
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::catalog::StationSource;
use crate::domain::{Carrier, CodeSystem, Copyright, RouteSegment, Thread};
use crate::schedule::{ScheduleSource, SegmentQuery};

use super::convert::{
    convert_carrier_response, convert_copyright, convert_segments, convert_thread,
    schedule_thread_uids,
};
use super::error::RaspError;
use super::types::{
    AllStationsResponse, CarrierResponse, CopyrightResponse, CountryDto, ScheduleResponse,
    SegmentsResponse, ThreadResponse,
};

#[derive(Debug, Default)]
struct MockData {
    stations: Vec<CountryDto>,
    searches: HashMap<String, SegmentsResponse>,
    carriers: HashMap<String, CarrierResponse>,
    schedules: HashMap<String, ScheduleResponse>,
    threads: HashMap<String, ThreadResponse>,
    copyright: Option<CopyrightResponse>,
}

/// Mock Rasp client that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockRaspClient {
    data: Arc<MockData>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, RaspError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| RaspError::MockData(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&json)
        .map_err(|e| RaspError::MockData(format!("failed to parse {}: {}", path.display(), e)))
}

/// Load every `*.json` file in `dir`, keyed by file stem. A missing
/// directory yields an empty map.
fn read_json_dir<T: DeserializeOwned>(dir: &Path) -> Result<HashMap<String, T>, RaspError> {
    let mut out = HashMap::new();
    if !dir.is_dir() {
        return Ok(out);
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| RaspError::MockData(format!("failed to read {}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry
            .map_err(|e| RaspError::MockData(format!("failed to read directory entry: {}", e)))?
            .path();

        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| RaspError::MockData(format!("invalid filename: {:?}", path)))?
            .to_string();

        out.insert(key, read_json(&path)?);
    }

    Ok(out)
}

impl MockRaspClient {
    /// Create a mock client by loading JSON files from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, RaspError> {
        let dir = data_dir.as_ref();

        let stations: AllStationsResponse = read_json(&dir.join("stations_list.json"))?;

        let copyright_path = dir.join("copyright.json");
        let copyright = if copyright_path.is_file() {
            Some(read_json(&copyright_path)?)
        } else {
            None
        };

        let data = MockData {
            stations: stations.countries.unwrap_or_default(),
            searches: read_json_dir(&dir.join("search"))?,
            carriers: read_json_dir(&dir.join("carriers"))?,
            schedules: read_json_dir(&dir.join("schedules"))?,
            threads: read_json_dir(&dir.join("threads"))?,
            copyright,
        };

        Ok(Self {
            data: Arc::new(data),
        })
    }

    /// Create a mock client that serves the given station tree and nothing else.
    pub fn with_stations(stations: Vec<CountryDto>) -> Self {
        Self {
            data: Arc::new(MockData {
                stations,
                ..Default::default()
            }),
        }
    }

    /// Number of countries in the mock station tree.
    pub fn country_count(&self) -> usize {
        self.data.stations.len()
    }
}

impl StationSource for MockRaspClient {
    async fn fetch_all_stations(&self) -> Result<Vec<CountryDto>, RaspError> {
        Ok(self.data.stations.clone())
    }
}

impl ScheduleSource for MockRaspClient {
    /// Time and transport parameters are ignored; mock data is static.
    async fn search_segments(&self, query: &SegmentQuery) -> Result<Vec<RouteSegment>, RaspError> {
        let key = format!("{}_{}", query.from, query.to);
        let segments = self
            .data
            .searches
            .get(&key)
            .map(convert_segments)
            .unwrap_or_default();
        Ok(segments.into_iter().take(query.limit as usize).collect())
    }

    async fn carrier(&self, code: &str, _system: CodeSystem) -> Result<Option<Carrier>, RaspError> {
        Ok(self.data.carriers.get(code).and_then(convert_carrier_response))
    }

    async fn station_thread_uids(
        &self,
        station: &str,
        _date: Option<NaiveDate>,
    ) -> Result<Vec<String>, RaspError> {
        let schedule = self
            .data
            .schedules
            .get(station)
            .ok_or_else(|| RaspError::NotFound(format!("schedule for station {station}")))?;
        Ok(schedule_thread_uids(schedule))
    }

    async fn thread(&self, uid: &str) -> Result<Thread, RaspError> {
        let response = self
            .data
            .threads
            .get(uid)
            .ok_or_else(|| RaspError::NotFound(format!("thread {uid}")))?;
        Ok(convert_thread(response, uid))
    }

    async fn copyright(&self) -> Result<Copyright, RaspError> {
        self.data
            .copyright
            .as_ref()
            .and_then(convert_copyright)
            .ok_or_else(|| RaspError::NotFound("copyright".to_string()))
    }
}
