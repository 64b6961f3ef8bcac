//! Domain types for the schedule service.
//!
//! Wire payloads from Rasp are option-heavy; these types are what is left
//! after validation. A `City`, `StationItem` or `ThreadStop` always has a
//! non-empty code and title.

mod carrier;
mod city;
mod copyright;
mod country;
mod segment;
mod station;
mod text;
mod thread;

pub use carrier::{
    Carrier, CarrierCodes, CodeSystem, InvalidCodeSystem, RAILWAY_PLACEHOLDER, UNTITLED_CARRIER,
};
pub use city::City;
pub use copyright::{Copyright, MISSING_COPYRIGHT_TEXT};
pub use country::{CountryCode, InvalidCountryCode, country_title};
pub use segment::{RouteSegment, TimeOfDay};
pub use station::StationItem;
pub use text::{collation_key, fold, fold_query};
pub use thread::{Thread, ThreadStop};
