//! City search and ordering.

use crate::domain::{City, fold, fold_query};

/// Filter cities by a free-text query.
///
/// The query is trimmed and folded; a blank query returns every city.
/// Otherwise keeps the cities whose folded title contains the folded query,
/// in their original order.
pub fn filter_cities(query: &str, cities: &[City]) -> Vec<City> {
    let needle = fold_query(query);
    if needle.is_empty() {
        return cities.to_vec();
    }

    cities
        .iter()
        .filter(|city| fold(&city.title).contains(&needle))
        .cloned()
        .collect()
}

/// Order cities for display: those in `country` first, then the rest,
/// each group by folded title. Titles that fold alike are ordered by their
/// raw text.
pub fn sort_cities(cities: &mut [City], country: &str) {
    cities.sort_by_cached_key(|c| (c.country != country, fold(&c.title), c.title.clone()));
}
