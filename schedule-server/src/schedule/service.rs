//! Route search, carrier and thread lookups.

use std::future::Future;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{Carrier, CodeSystem, Copyright, RouteSegment, Thread};
use crate::rasp::RaspError;

use super::config::ScheduleConfig;
use super::error::ScheduleError;
use super::filter::SegmentFilter;
use super::query::SegmentQuery;

/// Source of schedule data: segments, carriers and threads.
pub trait ScheduleSource: Send + Sync {
    /// Search segments between two points.
    fn search_segments(
        &self,
        query: &SegmentQuery,
    ) -> impl Future<Output = Result<Vec<RouteSegment>, RaspError>> + Send;

    /// Look up a carrier. `Ok(None)` when the code is unknown.
    fn carrier(
        &self,
        code: &str,
        system: CodeSystem,
    ) -> impl Future<Output = Result<Option<Carrier>, RaspError>> + Send;

    /// Uids of the threads in a station's schedule, in schedule order.
    fn station_thread_uids(
        &self,
        station: &str,
        date: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<String>, RaspError>> + Send;

    /// Fetch a thread with its stops.
    fn thread(&self, uid: &str) -> impl Future<Output = Result<Thread, RaspError>> + Send;

    /// The provider's data attribution.
    fn copyright(&self) -> impl Future<Output = Result<Copyright, RaspError>> + Send;
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, ScheduleError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ScheduleError::InvalidRequest(format!("{what} is required")));
    }
    Ok(value)
}

/// Schedule operations over a [`ScheduleSource`].
#[derive(Debug)]
pub struct ScheduleService<S> {
    source: S,
    config: ScheduleConfig,
}

impl<S: ScheduleSource> ScheduleService<S> {
    pub fn new(source: S, config: ScheduleConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Build a query using the configured limit and transport types.
    pub fn query(&self, from: &str, to: &str, date: Option<NaiveDate>) -> SegmentQuery {
        let mut query = SegmentQuery::new(from.trim(), to.trim()).with_limit(self.config.result_limit);
        query.date = date;
        query.transport_types = self.config.transport_types.clone();
        query
    }

    /// Search segments and apply `filter`. Results are ordered by departure.
    pub async fn search(
        &self,
        query: &SegmentQuery,
        filter: &SegmentFilter,
    ) -> Result<Vec<RouteSegment>, ScheduleError> {
        required(&query.from, "origin")?;
        required(&query.to, "destination")?;

        let segments = self.source.search_segments(query).await?;
        let found = segments.len();
        let segments = filter.apply(segments);

        debug!(
            from = %query.from,
            to = %query.to,
            found,
            kept = segments.len(),
            "Segment search"
        );
        Ok(segments)
    }

    /// Look up a carrier by code in the given system.
    ///
    /// Rasp's internal codes can't be looked up; asking for one is an
    /// invalid request.
    pub async fn carrier(
        &self,
        code: &str,
        system: CodeSystem,
    ) -> Result<Option<Carrier>, ScheduleError> {
        let code = required(code, "carrier code")?;
        if !system.supports_lookup() {
            return Err(ScheduleError::InvalidRequest(format!(
                "carriers cannot be looked up by {system} code"
            )));
        }
        Ok(self.source.carrier(code, system).await?)
    }

    /// Full details for a carrier embedded in a segment.
    ///
    /// Looks the carrier up by its preferred code when that code's system
    /// supports lookup. Falls back to the embedded record when there is no
    /// usable code, the lookup finds nothing or the provider fails.
    pub async fn resolve_carrier(&self, embedded: &Carrier) -> Carrier {
        let Some((system, code)) = embedded.codes.preferred() else {
            return embedded.clone();
        };
        if !system.supports_lookup() {
            return embedded.clone();
        }

        match self.source.carrier(code, system).await {
            Ok(Some(carrier)) => carrier,
            Ok(None) => {
                debug!(code, %system, "Carrier not found, using embedded record");
                embedded.clone()
            }
            Err(e) => {
                warn!(code, %system, error = %e, "Carrier lookup failed, using embedded record");
                embedded.clone()
            }
        }
    }

    /// Full carrier details for one segment of a search.
    ///
    /// Repeats the search for `query`, finds the segment run by `thread_uid`
    /// and resolves its carrier as [`resolve_carrier`](Self::resolve_carrier)
    /// does.
    pub async fn segment_carrier(
        &self,
        query: &SegmentQuery,
        thread_uid: &str,
    ) -> Result<Carrier, ScheduleError> {
        let thread_uid = required(thread_uid, "thread uid")?;
        let segments = self.search(query, &SegmentFilter::default()).await?;

        let Some(segment) = segments
            .iter()
            .find(|s| s.thread_uid.as_deref() == Some(thread_uid))
        else {
            return Err(ScheduleError::SegmentNotFound {
                uid: thread_uid.to_string(),
            });
        };

        Ok(self.resolve_carrier(&segment.carrier).await)
    }

    /// The provider's data attribution.
    pub async fn copyright(&self) -> Result<Copyright, ScheduleError> {
        Ok(self.source.copyright().await?)
    }

    /// Fetch a thread by uid.
    pub async fn thread(&self, uid: &str) -> Result<Thread, ScheduleError> {
        let uid = required(uid, "thread uid")?;
        Ok(self.source.thread(uid).await?)
    }

    /// The first thread in a station's schedule.
    pub async fn station_thread(
        &self,
        station: &str,
        date: Option<NaiveDate>,
    ) -> Result<Thread, ScheduleError> {
        let station = required(station, "station code")?;
        let uids = self.source.station_thread_uids(station, date).await?;

        let Some(uid) = uids.first() else {
            info!(station, "Station schedule has no threads");
            return Err(ScheduleError::NoThread {
                station: station.to_string(),
            });
        };

        Ok(self.source.thread(uid).await?)
    }
}
