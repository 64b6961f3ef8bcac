//! Station entries for per-city lookup.

use serde::Serialize;

/// A station belonging to a city.
///
/// `id` is the station's Rasp code (e.g. "s9600213"). Stations without a
/// code or title never become a `StationItem`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StationItem {
    pub id: String,
    pub title: String,

    /// Transport served, e.g. "train", "plane", "bus".
    pub transport_type: Option<String>,

    /// Kind of stop, e.g. "train_station", "airport".
    pub station_type: Option<String>,
}

impl StationItem {
    /// Create a station with no transport or station type.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            transport_type: None,
            station_type: None,
        }
    }
}
