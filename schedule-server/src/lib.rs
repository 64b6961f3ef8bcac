//! Travel schedule server.
//!
//! Serves the Yandex Rasp station catalog, route search between cities,
//! carrier details and thread stop lists over a JSON API.

pub mod catalog;
pub mod domain;
pub mod rasp;
pub mod schedule;
pub mod web;
