//! A thread (one scheduled run of a route) and its stops.

use chrono::{Duration, NaiveDateTime};

use super::carrier::Carrier;

/// A scheduled run with all of its intermediate stops, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub uid: String,
    pub title: Option<String>,
    pub number: Option<String>,
    pub transport_type: Option<String>,
    pub carrier: Option<Carrier>,
    pub stops: Vec<ThreadStop>,
}

/// A stop on a thread.
///
/// Times are local to the stop; the first stop has no arrival and the last
/// stop has no departure.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadStop {
    pub station_code: String,
    pub station_title: String,
    pub arrival: Option<NaiveDateTime>,
    pub departure: Option<NaiveDateTime>,

    /// Dwell time at the stop.
    pub stop_time: Option<Duration>,
    pub platform: Option<String>,
}

impl Thread {
    /// The first stop, if any.
    pub fn origin(&self) -> Option<&ThreadStop> {
        self.stops.first()
    }

    /// The last stop, if any.
    pub fn terminus(&self) -> Option<&ThreadStop> {
        self.stops.last()
    }
}
