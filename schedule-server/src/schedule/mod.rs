//! Route search between two points, with carrier and thread lookups.

mod config;
mod error;
mod filter;
mod query;
mod service;

pub use config::{DEFAULT_RESULT_LIMIT, ScheduleConfig};
pub use error::ScheduleError;
pub use filter::SegmentFilter;
pub use query::SegmentQuery;
pub use service::{ScheduleService, ScheduleSource};
