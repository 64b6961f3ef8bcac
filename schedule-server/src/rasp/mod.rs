//! Yandex Rasp (schedule API) client.
//!
//! This module provides an HTTP client for the Rasp v3.0 API and a mock
//! client that serves canned JSON responses from disk.
//!
//! Characteristics of the API worth knowing:
//! - `stations_list` returns the entire station catalog in one response,
//!   served as `text/html` even though the body is JSON
//! - Nearly every field may be missing or `null`
//! - Settlement codes look like `c213`, station codes like `s9600213`

mod client;
mod convert;
mod error;
mod mock;
mod types;

use chrono::NaiveDate;

use crate::catalog::StationSource;
use crate::domain::{Carrier, CodeSystem, Copyright, RouteSegment, Thread};
use crate::schedule::{ScheduleSource, SegmentQuery};

pub use client::{RaspClient, RaspConfig};
pub use convert::{parse_local_time, parse_timestamp};
pub use error::RaspError;
pub use mock::MockRaspClient;
pub use types::{
    AllStationsResponse, CarrierDto, CarrierResponse, Codes, CopyrightDto, CopyrightResponse,
    CountryDto, RegionDto, ScheduleResponse, SegmentDto, SegmentsResponse, SettlementDto,
    StationDto, ThreadResponse,
};

/// Either the live client or the mock, chosen at startup.
#[derive(Debug, Clone)]
pub enum RaspProvider {
    Live(RaspClient),
    Mock(MockRaspClient),
}

impl StationSource for RaspProvider {
    async fn fetch_all_stations(&self) -> Result<Vec<CountryDto>, RaspError> {
        match self {
            RaspProvider::Live(client) => client.fetch_all_stations().await,
            RaspProvider::Mock(client) => client.fetch_all_stations().await,
        }
    }
}

impl ScheduleSource for RaspProvider {
    async fn search_segments(&self, query: &SegmentQuery) -> Result<Vec<RouteSegment>, RaspError> {
        match self {
            RaspProvider::Live(client) => client.search_segments(query).await,
            RaspProvider::Mock(client) => client.search_segments(query).await,
        }
    }

    async fn carrier(&self, code: &str, system: CodeSystem) -> Result<Option<Carrier>, RaspError> {
        match self {
            RaspProvider::Live(client) => client.carrier(code, system).await,
            RaspProvider::Mock(client) => client.carrier(code, system).await,
        }
    }

    async fn station_thread_uids(
        &self,
        station: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<String>, RaspError> {
        match self {
            RaspProvider::Live(client) => client.station_thread_uids(station, date).await,
            RaspProvider::Mock(client) => client.station_thread_uids(station, date).await,
        }
    }

    async fn thread(&self, uid: &str) -> Result<Thread, RaspError> {
        match self {
            RaspProvider::Live(client) => client.thread(uid).await,
            RaspProvider::Mock(client) => client.thread(uid).await,
        }
    }

    async fn copyright(&self) -> Result<Copyright, RaspError> {
        match self {
            RaspProvider::Live(client) => client.copyright().await,
            RaspProvider::Mock(client) => client.copyright().await,
        }
    }
}
