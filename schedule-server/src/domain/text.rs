//! Title folding and ordering.
//!
//! Rasp titles are mostly Cyrillic, so ASCII-only case folding is not
//! enough: "Орёл" has to match a query of "орел".

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// Fold a string for case- and diacritic-insensitive matching.
///
/// The input is decomposed (NFD), combining marks are dropped and the
/// remainder is lowercased.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::fold;
///
/// assert_eq!(fold("Орёл"), "орел");
/// assert_eq!(fold("Zürich"), "zurich");
/// ```
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Fold a user query: trims surrounding whitespace, then folds.
pub fn fold_query(query: &str) -> String {
    fold(query.trim())
}

/// Sort key for ordering titles the way a Russian reader expects.
///
/// Case-insensitive. Accents are ignored, except that "й" stays a letter of
/// its own and sorts after "и". "ё" sorts with "е".
///
/// # Examples
///
/// ```
/// use schedule_server::domain::collation_key;
///
/// assert!(collation_key("Иркутск") < collation_key("Йошкар-Ола"));
/// assert_eq!(collation_key("Ёлки"), collation_key("елки"));
/// ```
pub fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, 'й' | 'Й') {
            key.push('й');
            continue;
        }
        decompose_canonical(c, |d| {
            if !is_combining_mark(d) {
                key.extend(d.to_lowercase());
            }
        });
    }
    key
}
