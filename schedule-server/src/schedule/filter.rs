//! Filtering route segments by departure time and transfers.

use crate::domain::{RouteSegment, TimeOfDay};

/// User-selected constraints on search results.
///
/// Time ranges combine with OR: a segment passes if it departs in any
/// selected part of the day. With no range selected every departure time
/// passes. The transfer choice, when set, must equal the segment's flag;
/// segments that don't report transfers count as direct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentFilter {
    pub morning: bool,
    pub day: bool,
    pub evening: bool,
    pub night: bool,
    pub transfers: Option<bool>,
}

impl SegmentFilter {
    /// Also accept departures in `time`.
    pub fn with_time(mut self, time: TimeOfDay) -> Self {
        match time {
            TimeOfDay::Morning => self.morning = true,
            TimeOfDay::Day => self.day = true,
            TimeOfDay::Evening => self.evening = true,
            TimeOfDay::Night => self.night = true,
        }
        self
    }

    pub fn with_transfers(mut self, transfers: bool) -> Self {
        self.transfers = Some(transfers);
        self
    }

    fn allows(&self, time: TimeOfDay) -> bool {
        match time {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Day => self.day,
            TimeOfDay::Evening => self.evening,
            TimeOfDay::Night => self.night,
        }
    }

    /// Whether any part of the day is selected.
    pub fn has_time_range(&self) -> bool {
        self.morning || self.day || self.evening || self.night
    }

    /// Whether the filter constrains anything.
    pub fn is_active(&self) -> bool {
        self.has_time_range() || self.transfers.is_some()
    }

    /// Whether the selection is complete enough to submit: at least one
    /// part of the day and a transfer choice.
    pub fn can_apply(&self) -> bool {
        self.has_time_range() && self.transfers.is_some()
    }

    pub fn matches(&self, segment: &RouteSegment) -> bool {
        if self.has_time_range() && !self.allows(segment.departure_time_of_day()) {
            return false;
        }
        match self.transfers {
            Some(wanted) => segment.has_transfers.unwrap_or(false) == wanted,
            None => true,
        }
    }

    /// Keep matching segments, ordered by departure.
    pub fn apply(&self, segments: Vec<RouteSegment>) -> Vec<RouteSegment> {
        let mut kept: Vec<RouteSegment> = segments
            .into_iter()
            .filter(|s| self.matches(s))
            .collect();
        kept.sort_by_key(|s| s.departure);
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Carrier;
    use chrono::{DateTime, Duration};

    fn segment(departure: &str, has_transfers: Option<bool>) -> RouteSegment {
        let departure = DateTime::parse_from_rfc3339(departure).unwrap();
        RouteSegment {
            thread_uid: Some(format!("uid-{departure}")),
            thread_title: None,
            thread_number: None,
            transport_type: Some("train".into()),
            carrier: Carrier::railway_placeholder(),
            departure,
            arrival: departure + Duration::hours(4),
            duration: Duration::hours(4),
            has_transfers,
        }
    }

    fn hours(segments: &[RouteSegment]) -> Vec<String> {
        segments
            .iter()
            .map(|s| s.departure.format("%H:%M").to_string())
            .collect()
    }

    fn day_of_segments() -> Vec<RouteSegment> {
        vec![
            segment("2026-03-01T19:30:00+03:00", Some(false)),
            segment("2026-03-01T05:59:00+03:00", Some(false)),
            segment("2026-03-01T12:00:00+03:00", Some(true)),
            segment("2026-03-01T06:00:00+03:00", None),
            segment("2026-03-01T17:59:00+03:00", Some(false)),
        ]
    }

    #[test]
    fn default_filter_is_inactive() {
        let filter = SegmentFilter::default();
        assert!(!filter.is_active());
        assert!(!filter.can_apply());
    }

    #[test]
    fn can_apply_needs_time_and_transfers() {
        let time_only = SegmentFilter::default().with_time(TimeOfDay::Morning);
        assert!(time_only.is_active());
        assert!(!time_only.can_apply());

        let transfers_only = SegmentFilter::default().with_transfers(false);
        assert!(transfers_only.is_active());
        assert!(!transfers_only.can_apply());

        assert!(time_only.with_transfers(true).can_apply());
    }

    #[test]
    fn inactive_filter_only_sorts() {
        let result = SegmentFilter::default().apply(day_of_segments());
        assert_eq!(hours(&result), vec!["05:59", "06:00", "12:00", "17:59", "19:30"]);
    }

    #[test]
    fn morning_boundaries() {
        let filter = SegmentFilter::default().with_time(TimeOfDay::Morning);
        let result = filter.apply(day_of_segments());
        assert_eq!(hours(&result), vec!["06:00"]);
    }

    #[test]
    fn ranges_combine() {
        let filter = SegmentFilter::default()
            .with_time(TimeOfDay::Day)
            .with_time(TimeOfDay::Night);
        let result = filter.apply(day_of_segments());
        assert_eq!(hours(&result), vec!["05:59", "12:00", "17:59"]);
    }

    #[test]
    fn evening_range() {
        let filter = SegmentFilter::default().with_time(TimeOfDay::Evening);
        assert_eq!(hours(&filter.apply(day_of_segments())), vec!["19:30"]);
    }

    #[test]
    fn transfers_must_match() {
        let with = SegmentFilter::default().with_transfers(true);
        assert_eq!(hours(&with.apply(day_of_segments())), vec!["12:00"]);

        let without = SegmentFilter::default().with_transfers(false);
        assert_eq!(
            hours(&without.apply(day_of_segments())),
            vec!["05:59", "06:00", "17:59", "19:30"]
        );
    }

    #[test]
    fn unknown_transfers_count_as_direct() {
        let filter = SegmentFilter::default().with_transfers(false);
        assert!(filter.matches(&segment("2026-03-01T06:00:00+03:00", None)));
    }

    #[test]
    fn hour_is_local_to_departure_offset() {
        // 07:00 in Yekaterinburg is 05:00 in Moscow
        let seg = segment("2026-03-01T07:00:00+05:00", None);
        let filter = SegmentFilter::default().with_time(TimeOfDay::Morning);
        assert!(filter.matches(&seg));
    }

    #[test]
    fn sort_uses_full_timestamp() {
        let segments = vec![
            segment("2026-03-02T01:00:00+03:00", None),
            segment("2026-03-01T23:00:00+03:00", None),
        ];
        let result = SegmentFilter::default().apply(segments);
        assert_eq!(hours(&result), vec!["23:00", "01:00"]);
    }
}
