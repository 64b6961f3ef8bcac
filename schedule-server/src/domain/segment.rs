//! Route segments returned by a search between two points.

use std::ops::Range;

use chrono::{DateTime, Duration, FixedOffset, Timelike};

use super::carrier::Carrier;

/// Part of the day a departure falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    /// 00:00–06:00
    Night,
    /// 06:00–12:00
    Morning,
    /// 12:00–18:00
    Day,
    /// 18:00–24:00
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Night,
        TimeOfDay::Morning,
        TimeOfDay::Day,
        TimeOfDay::Evening,
    ];

    /// Classify an hour (0-23). Anything later counts as evening.
    pub fn from_hour(hour: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.hours().contains(&hour))
            .unwrap_or(TimeOfDay::Evening)
    }

    /// The hours covered, as a half-open range.
    pub fn hours(&self) -> Range<u32> {
        match self {
            TimeOfDay::Night => 0..6,
            TimeOfDay::Morning => 6..12,
            TimeOfDay::Day => 12..18,
            TimeOfDay::Evening => 18..24,
        }
    }
}

/// A single travel leg from a route search.
///
/// Times keep the offset the API reported them in, so `departure.hour()` is
/// the local hour at the departure station.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub thread_uid: Option<String>,
    pub thread_title: Option<String>,
    pub thread_number: Option<String>,
    pub transport_type: Option<String>,
    pub carrier: Carrier,
    pub departure: DateTime<FixedOffset>,
    pub arrival: DateTime<FixedOffset>,
    pub duration: Duration,

    /// `None` when the API did not say.
    pub has_transfers: Option<bool>,
}

impl RouteSegment {
    /// The part of the day the segment departs in.
    pub fn departure_time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.departure.hour())
    }
}
