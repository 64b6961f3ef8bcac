//! City search entries.

use serde::Serialize;

/// A settlement as it appears in city search.
///
/// Built from the station catalog: `id` is the settlement's Rasp code
/// (e.g. "c213" for Moscow) and `country` is the title of the country the
/// settlement was found under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct City {
    pub id: String,
    pub title: String,
    pub country: String,
}

impl City {
    /// Create a new city entry.
    pub fn new(id: impl Into<String>, title: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            country: country.into(),
        }
    }
}
