//! Route search error types.

use crate::rasp::RaspError;

/// Errors from schedule operations.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The schedule provider failed
    #[error(transparent)]
    Provider(#[from] RaspError),

    /// The station's schedule lists no threads
    #[error("no threads depart from station {station}")]
    NoThread { station: String },

    /// No segment in the search results is run by this thread
    #[error("no segment with thread {uid}")]
    SegmentNotFound { uid: String },

    /// The request was malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ScheduleError {
    /// Whether the provider could not be reached at all.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ScheduleError::Provider(e) if e.is_connection_error())
    }
}
