//! Country code type and location-hint resolution.

use std::fmt;

/// Error returned when parsing an invalid country code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid country code: {reason}")]
pub struct InvalidCountryCode {
    reason: &'static str,
}

/// A 2-letter ISO 3166-1 alpha-2 country code (e.g. "RU", "BY").
///
/// Rasp identifies countries by their Russian title only, so the code is
/// mapped to that title before it can be compared with catalog data.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::CountryCode;
///
/// let ru = CountryCode::parse("RU").unwrap();
/// assert_eq!(ru.as_str(), "RU");
/// assert_eq!(ru.rasp_title(), Some("Россия"));
///
/// assert!(CountryCode::parse("ru").is_err());
/// assert!(CountryCode::parse_normalized(" ru ").is_ok());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a country code; the input must be exactly 2 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidCountryCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidCountryCode {
                reason: "must be exactly 2 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidCountryCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(CountryCode([bytes[0], bytes[1]]))
    }

    /// Parse after trimming and uppercasing the input.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCountryCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store valid ASCII uppercase letters
        std::str::from_utf8(&self.0).unwrap()
    }

    /// The country title as it appears in the Rasp station catalog.
    pub fn rasp_title(&self) -> Option<&'static str> {
        RASP_COUNTRY_TITLES
            .iter()
            .find(|(code, _)| *code == self.as_str())
            .map(|(_, title)| *title)
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a location hint to the country title used by the catalog.
///
/// Known codes map to their Rasp title. Anything else (an unknown code or a
/// country name) is returned trimmed and unchanged.
pub fn country_title(hint: &str) -> &str {
    let hint = hint.trim();
    CountryCode::parse_normalized(hint)
        .ok()
        .and_then(|code| code.rasp_title())
        .unwrap_or(hint)
}

/// Countries present in the Rasp catalog, by ISO code.
const RASP_COUNTRY_TITLES: &[(&str, &str)] = &[
    ("AM", "Армения"),
    ("AT", "Австрия"),
    ("AZ", "Азербайджан"),
    ("BE", "Бельгия"),
    ("BG", "Болгария"),
    ("BY", "Беларусь"),
    ("CH", "Швейцария"),
    ("CN", "Китай"),
    ("CZ", "Чехия"),
    ("DE", "Германия"),
    ("EE", "Эстония"),
    ("ES", "Испания"),
    ("FI", "Финляндия"),
    ("FR", "Франция"),
    ("GB", "Великобритания"),
    ("GE", "Грузия"),
    ("GR", "Греция"),
    ("HR", "Хорватия"),
    ("HU", "Венгрия"),
    ("IT", "Италия"),
    ("KG", "Киргизия"),
    ("KZ", "Казахстан"),
    ("LT", "Литва"),
    ("LV", "Латвия"),
    ("MD", "Молдова"),
    ("MN", "Монголия"),
    ("NL", "Нидерланды"),
    ("PL", "Польша"),
    ("RO", "Румыния"),
    ("RS", "Сербия"),
    ("RU", "Россия"),
    ("SK", "Словакия"),
    ("TJ", "Таджикистан"),
    ("TM", "Туркмения"),
    ("TR", "Турция"),
    ("UA", "Украина"),
    ("UZ", "Узбекистан"),
];
