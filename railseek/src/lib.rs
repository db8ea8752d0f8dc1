//! Remote train-schedule query tool.
//!
//! Queries the upstream left-ticket service for schedules between
//! station pairs on a date, merges results across same-city station
//! groups, optionally expands to intermediate stops or two-leg
//! transfer itineraries, then filters, deduplicates and sorts the
//! result set for rendering.

pub mod api;
pub mod cache;
pub mod cli;
pub mod domain;
pub mod output;
pub mod query;
pub mod stations;
