//! Rasp API v3.0 JSON types.
//!
//! These mirror the API responses as closely as practical. Every field is
//! optional because the API omits or nulls fields freely; validation happens
//! when converting to domain types.

use std::fmt;

use serde::Deserialize;

/// Codes attached to catalog entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Codes {
    pub yandex_code: Option<String>,
    pub esr_code: Option<String>,
}

/// Response of `/stations_list/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllStationsResponse {
    pub countries: Option<Vec<CountryDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryDto {
    pub title: Option<String>,
    pub codes: Option<Codes>,
    pub regions: Option<Vec<RegionDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionDto {
    pub title: Option<String>,
    pub codes: Option<Codes>,
    pub settlements: Option<Vec<SettlementDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettlementDto {
    pub title: Option<String>,
    pub codes: Option<Codes>,
    pub stations: Option<Vec<StationDto>>,
}

impl SettlementDto {
    /// The settlement's Rasp code, e.g. "c213".
    pub fn code(&self) -> Option<&str> {
        self.codes.as_ref()?.yandex_code.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationDto {
    pub title: Option<String>,
    pub codes: Option<Codes>,
    pub transport_type: Option<String>,
    pub station_type: Option<String>,
}

impl StationDto {
    /// The station's Rasp code, e.g. "s9600213".
    pub fn code(&self) -> Option<&str> {
        self.codes.as_ref()?.yandex_code.as_deref()
    }
}

/// Station reference embedded in segments, schedules and threads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationRefDto {
    pub code: Option<String>,
    pub title: Option<String>,
    pub station_type: Option<String>,
    pub transport_type: Option<String>,
}

/// Carrier codes may be numbers or strings depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeValue::Number(n) => write!(f, "{n}"),
            CodeValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierCodesDto {
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub sirena: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierDto {
    pub code: Option<CodeValue>,
    pub title: Option<String>,
    pub codes: Option<CarrierCodesDto>,
    pub logo: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contacts: Option<String>,
}

/// Response of `/carrier/`: a single carrier, or several when a code is shared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierResponse {
    pub carrier: Option<CarrierDto>,
    pub carriers: Option<Vec<CarrierDto>>,
}

/// Thread summary embedded in segments and schedules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadRefDto {
    pub uid: Option<String>,
    pub title: Option<String>,
    pub number: Option<String>,
    pub transport_type: Option<String>,
    pub carrier: Option<CarrierDto>,
}

/// Response of `/search/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentsResponse {
    pub segments: Option<Vec<SegmentDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentDto {
    pub thread: Option<ThreadRefDto>,
    pub from: Option<StationRefDto>,
    pub to: Option<StationRefDto>,
    pub departure: Option<String>,
    pub arrival: Option<String>,

    /// Seconds.
    pub duration: Option<f64>,
    pub has_transfers: Option<bool>,
}

/// Response of `/schedule/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleResponse {
    pub station: Option<StationRefDto>,
    pub schedule: Option<Vec<ScheduleEntryDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleEntryDto {
    pub thread: Option<ThreadRefDto>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
}

/// Response of `/thread/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadResponse {
    pub uid: Option<String>,
    pub title: Option<String>,
    pub number: Option<String>,
    pub transport_type: Option<String>,
    pub carrier: Option<CarrierDto>,
    pub stops: Option<Vec<StopDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopDto {
    pub station: Option<StationRefDto>,
    pub arrival: Option<String>,
    pub departure: Option<String>,

    /// Seconds.
    pub stop_time: Option<f64>,
    pub platform: Option<String>,
}

/// Response of `/copyright/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopyrightResponse {
    pub copyright: Option<CopyrightDto>,
}

/// Attribution Rasp asks clients to show next to its data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopyrightDto {
    pub text: Option<String>,
    pub url: Option<String>,

    /// Yandex logo, horizontal, for light backgrounds
    pub logo_hm: Option<String>,
}
