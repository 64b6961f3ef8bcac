//! Station catalog error types.

/// Why the catalog holds no data.
///
/// Network, decode and payload failures all collapse into `LoadFailed`;
/// the message keeps the underlying cause for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The station list could not be fetched or decoded
    #[error("failed to load stations: {message}")]
    LoadFailed { message: String },
}
