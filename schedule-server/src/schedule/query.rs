//! Route search parameters.

use chrono::NaiveDate;

use super::config::DEFAULT_RESULT_LIMIT;

/// A search for segments between two settlements or stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentQuery {
    /// Origin code, e.g. "c213" or "s9600213"
    pub from: String,
    /// Destination code
    pub to: String,
    /// Departure date; `None` searches every day
    pub date: Option<NaiveDate>,
    pub transport_types: Option<String>,
    pub limit: u32,
}

impl SegmentQuery {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            date: None,
            transport_types: None,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_transport_types(mut self, types: impl Into<String>) -> Self {
        self.transport_types = Some(types.into());
        self
    }
}
