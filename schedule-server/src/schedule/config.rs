//! Route search configuration.

/// Number of segments requested per search unless configured otherwise.
pub const DEFAULT_RESULT_LIMIT: u32 = 20;

/// Configuration for [`ScheduleService`](super::ScheduleService).
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Maximum number of segments requested from the API per search.
    pub result_limit: u32,

    /// Restrict searches to these transport types (e.g. "train",
    /// "suburban,bus"). `None` searches every type.
    pub transport_types: Option<String>,
}

impl ScheduleConfig {
    pub fn new(result_limit: u32, transport_types: Option<String>) -> Self {
        Self {
            result_limit,
            transport_types,
        }
    }

    /// Set the per-search result limit.
    pub fn with_result_limit(mut self, limit: u32) -> Self {
        self.result_limit = limit;
        self
    }

    /// Restrict searches to the given transport types.
    pub fn with_transport_types(mut self, types: impl Into<String>) -> Self {
        self.transport_types = Some(types.into());
        self
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_LIMIT, None)
    }
}
