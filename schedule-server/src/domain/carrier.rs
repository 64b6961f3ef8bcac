//! Carrier identity and contact details.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Error returned when parsing an unknown code system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown carrier code system: {0}")]
pub struct InvalidCodeSystem(String);

/// A coding system used to identify carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeSystem {
    /// IATA airline designator (e.g. "SU")
    Iata,
    /// ICAO airline designator (e.g. "AFL")
    Icao,
    /// Sirena reservation system code
    Sirena,
    /// Rasp's own numeric carrier code
    Internal,
}

impl CodeSystem {
    /// Systems in order of preference when a carrier has several codes.
    pub const PREFERENCE: [CodeSystem; 4] = [
        CodeSystem::Iata,
        CodeSystem::Icao,
        CodeSystem::Sirena,
        CodeSystem::Internal,
    ];

    /// Parse a system name, ignoring case.
    pub fn parse(s: &str) -> Result<Self, InvalidCodeSystem> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iata" => Ok(CodeSystem::Iata),
            "icao" => Ok(CodeSystem::Icao),
            "sirena" => Ok(CodeSystem::Sirena),
            "internal" | "yandex" => Ok(CodeSystem::Internal),
            _ => Err(InvalidCodeSystem(s.to_string())),
        }
    }

    /// The name used in the Rasp `system` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeSystem::Iata => "iata",
            CodeSystem::Icao => "icao",
            CodeSystem::Sirena => "sirena",
            CodeSystem::Internal => "internal",
        }
    }

    /// Whether the carrier endpoint can be queried with codes of this system.
    pub fn supports_lookup(&self) -> bool {
        !matches!(self, CodeSystem::Internal)
    }
}

impl fmt::Display for CodeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All codes known for a carrier. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CarrierCodes {
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub sirena: Option<String>,
    pub internal: Option<String>,
}

impl CarrierCodes {
    /// The code in the given system, if present.
    pub fn get(&self, system: CodeSystem) -> Option<&str> {
        let code = match system {
            CodeSystem::Iata => &self.iata,
            CodeSystem::Icao => &self.icao,
            CodeSystem::Sirena => &self.sirena,
            CodeSystem::Internal => &self.internal,
        };
        code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// The first present code in [`CodeSystem::PREFERENCE`] order.
    pub fn preferred(&self) -> Option<(CodeSystem, &str)> {
        CodeSystem::PREFERENCE
            .iter()
            .find_map(|system| self.get(*system).map(|code| (*system, code)))
    }
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?[0-9][0-9\-\s()]{5,}").expect("valid phone pattern"));

/// Title used when a segment carries no carrier at all.
pub const RAILWAY_PLACEHOLDER: &str = "Железная дорога";

/// Title used when a carrier record has no title.
pub const UNTITLED_CARRIER: &str = "Без названия";

/// The operator of a route segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Carrier {
    pub title: String,
    pub codes: CarrierCodes,
    pub logo: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,

    /// Free-form contact text; may contain an email or phone number.
    pub contacts: Option<String>,
}

impl Carrier {
    /// Create a carrier with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            codes: CarrierCodes::default(),
            logo: None,
            url: None,
            email: None,
            phone: None,
            address: None,
            contacts: None,
        }
    }

    /// Stand-in for segments without carrier data.
    pub fn railway_placeholder() -> Self {
        Self::new(RAILWAY_PLACEHOLDER)
    }

    /// Title cleaned up for display.
    ///
    /// Drops the "/ФПК" branch suffix, and every Russian Railways subsidiary
    /// is shown under the parent company name.
    pub fn display_title(&self) -> String {
        let cleaned = self.title.replace("/ФПК", "");
        let cleaned = cleaned.trim();
        if cleaned.to_lowercase().contains("ржд") {
            return "ОАО «РЖД»".to_string();
        }
        cleaned.to_string()
    }

    /// Contact email: the explicit field, else the first address in `contacts`.
    pub fn contact_email(&self) -> Option<String> {
        non_empty(&self.email).or_else(|| self.find_in_contacts(&EMAIL))
    }

    /// Contact phone: the explicit field, else the first number in `contacts`.
    pub fn contact_phone(&self) -> Option<String> {
        non_empty(&self.phone).or_else(|| self.find_in_contacts(&PHONE))
    }

    /// The contact phone reduced to a dialable `tel:` target.
    pub fn phone_link(&self) -> Option<String> {
        self.contact_phone()
            .map(|phone| phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect())
    }

    fn find_in_contacts(&self, pattern: &Regex) -> Option<String> {
        let contacts = self.contacts.as_deref()?;
        pattern.find(contacts).map(|m| m.as_str().trim().to_string())
    }
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}
