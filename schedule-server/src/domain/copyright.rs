//! Data attribution.

use serde::Serialize;

/// Shown when the provider sends an attribution with no text.
pub const MISSING_COPYRIGHT_TEXT: &str = "Нет текста";

/// Attribution the schedule provider requires next to its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Copyright {
    pub text: String,
    pub url: Option<String>,
    pub logo: Option<String>,
}

impl Copyright {
    /// Build from possibly blank fields. Blank text becomes
    /// [`MISSING_COPYRIGHT_TEXT`]; a blank url or logo is dropped.
    pub fn new(text: Option<&str>, url: Option<&str>, logo: Option<&str>) -> Self {
        fn present(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }
        Self {
            text: present(text).unwrap_or(MISSING_COPYRIGHT_TEXT).to_string(),
            url: present(url).map(str::to_string),
            logo: present(logo).map(str::to_string),
        }
    }
}
