//! Data transfer objects for web requests and responses.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStatus, Country};
use crate::domain::{
    Carrier, CarrierCodes, City, CodeSystem, RouteSegment, StationItem, Thread, ThreadStop,
};
use crate::schedule::SegmentFilter;

/// Request to list cities.
#[derive(Debug, Default, Deserialize)]
pub struct CitySearchRequest {
    /// Free-text filter on the city title
    pub q: Option<String>,

    /// Location hint: ISO country code ("BY") or country title
    pub country: Option<String>,
}

/// Request to search route segments.
#[derive(Debug, Deserialize)]
pub struct SegmentSearchRequest {
    /// Origin settlement or station code
    pub from: String,

    /// Destination settlement or station code
    pub to: String,

    /// Departure date as YYYY-MM-DD
    pub date: Option<String>,

    #[serde(default)]
    pub morning: bool,
    #[serde(default)]
    pub day: bool,
    #[serde(default)]
    pub evening: bool,
    #[serde(default)]
    pub night: bool,

    /// Keep only segments with (true) or without (false) transfers
    pub transfers: Option<bool>,
}

impl SegmentSearchRequest {
    pub fn filter(&self) -> SegmentFilter {
        SegmentFilter {
            morning: self.morning,
            day: self.day,
            evening: self.evening,
            night: self.night,
            transfers: self.transfers,
        }
    }
}

/// Request to look up a carrier.
#[derive(Debug, Default, Deserialize)]
pub struct CarrierRequest {
    /// Code system: iata (default), icao or sirena
    pub system: Option<String>,
}

/// Request for the carrier of one segment in a search.
#[derive(Debug, Deserialize)]
pub struct SegmentCarrierRequest {
    /// Origin and destination of the search the segment came from
    pub from: String,
    pub to: String,

    /// Departure date as YYYY-MM-DD
    pub date: Option<String>,
}

/// Request for the first thread departing a station.
#[derive(Debug, Default, Deserialize)]
pub struct StationThreadRequest {
    /// Schedule date as YYYY-MM-DD (defaults to any day)
    pub date: Option<String>,
}

/// Parse an optional YYYY-MM-DD date. Blank counts as absent.
pub fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(None),
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid date (expected YYYY-MM-DD): {d}")),
    }
}

/// Response listing cities.
#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<City>,
}

/// Response listing the stations of a city.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    /// The city code the stations belong to
    pub city: String,
    pub stations: Vec<StationItem>,
}

/// Response with the full catalog tree.
#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<Country>,
}

/// Response to a catalog reset.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    /// Whether a failed catalog was reset
    pub reset: bool,
    pub status: CatalogStatus,
}

/// Carrier as shown next to a segment.
#[derive(Debug, Serialize)]
pub struct CarrierSummary {
    pub title: String,
    pub display_title: String,
    pub logo: Option<String>,

    /// Preferred code and its system, for a follow-up carrier lookup
    pub code: Option<String>,
    pub system: Option<CodeSystem>,
}

impl CarrierSummary {
    pub fn from_carrier(carrier: &Carrier) -> Self {
        let preferred = carrier.codes.preferred();
        Self {
            title: carrier.title.clone(),
            display_title: carrier.display_title(),
            logo: carrier.logo.clone(),
            code: preferred.map(|(_, code)| code.to_string()),
            system: preferred.map(|(system, _)| system),
        }
    }
}

/// A segment in search results.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub thread_uid: Option<String>,
    pub title: Option<String>,
    pub number: Option<String>,
    pub transport_type: Option<String>,
    pub carrier: CarrierSummary,

    /// RFC 3339 timestamps with the station's offset
    pub departure: String,
    pub arrival: String,

    /// Local clock times, HH:MM
    pub departure_time: String,
    pub arrival_time: String,

    pub duration_minutes: i64,
    pub has_transfers: bool,
}

fn clock(time: &DateTime<FixedOffset>) -> String {
    time.format("%H:%M").to_string()
}

impl SegmentResult {
    pub fn from_segment(segment: &RouteSegment) -> Self {
        Self {
            thread_uid: segment.thread_uid.clone(),
            title: segment.thread_title.clone(),
            number: segment.thread_number.clone(),
            transport_type: segment.transport_type.clone(),
            carrier: CarrierSummary::from_carrier(&segment.carrier),
            departure: segment.departure.to_rfc3339(),
            arrival: segment.arrival.to_rfc3339(),
            departure_time: clock(&segment.departure),
            arrival_time: clock(&segment.arrival),
            duration_minutes: segment.duration.num_minutes(),
            has_transfers: segment.has_transfers.unwrap_or(false),
        }
    }
}

/// Response to a segment search.
#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub segments: Vec<SegmentResult>,

    /// Whether any filter constrained the results
    pub filtered: bool,
}

/// Full carrier details.
#[derive(Debug, Serialize)]
pub struct CarrierResult {
    pub title: String,
    pub display_title: String,
    pub codes: CarrierCodes,
    pub logo: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    /// Phone reduced to digits and '+', for a tel: link
    pub phone_link: Option<String>,
    pub address: Option<String>,
}

impl CarrierResult {
    pub fn from_carrier(carrier: &Carrier) -> Self {
        Self {
            title: carrier.title.clone(),
            display_title: carrier.display_title(),
            codes: carrier.codes.clone(),
            logo: carrier.logo.clone(),
            url: carrier.url.clone(),
            email: carrier.contact_email(),
            phone: carrier.contact_phone(),
            phone_link: carrier.phone_link(),
            address: carrier.address.clone(),
        }
    }
}

/// A stop on a thread.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub station_code: String,
    pub station_title: String,

    /// Local times, YYYY-MM-DD HH:MM
    pub arrival: Option<String>,
    pub departure: Option<String>,

    pub stop_minutes: Option<i64>,
    pub platform: Option<String>,
}

fn local_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

impl StopResult {
    pub fn from_stop(stop: &ThreadStop) -> Self {
        Self {
            station_code: stop.station_code.clone(),
            station_title: stop.station_title.clone(),
            arrival: stop.arrival.as_ref().map(local_time),
            departure: stop.departure.as_ref().map(local_time),
            stop_minutes: stop.stop_time.map(|d| d.num_minutes()),
            platform: stop.platform.clone(),
        }
    }
}

/// A thread with all its stops.
#[derive(Debug, Serialize)]
pub struct ThreadResult {
    pub uid: String,
    pub title: Option<String>,
    pub number: Option<String>,
    pub transport_type: Option<String>,
    pub carrier: Option<CarrierResult>,
    pub stops: Vec<StopResult>,
}

impl ThreadResult {
    pub fn from_thread(thread: &Thread) -> Self {
        Self {
            uid: thread.uid.clone(),
            title: thread.title.clone(),
            number: thread.number.clone(),
            transport_type: thread.transport_type.clone(),
            carrier: thread.carrier.as_ref().map(CarrierResult::from_carrier),
            stops: thread.stops.iter().map(StopResult::from_stop).collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
