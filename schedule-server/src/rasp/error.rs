//! Rasp client error types.

/// Errors from the Rasp HTTP client and the mock client.
#[derive(Debug, thiserror::Error)]
pub enum RaspError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key or unauthorized
    #[error("unauthorized: check RASP_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by Rasp API")]
    RateLimited,

    /// Requested object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Mock data directory could not be read
    #[error("mock data error: {0}")]
    MockData(String),
}

impl RaspError {
    /// Whether the request never reached the server (no network, DNS, timeout).
    ///
    /// Callers use this to tell "check your connection" apart from
    /// "the server misbehaved".
    pub fn is_connection_error(&self) -> bool {
        match self {
            RaspError::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
