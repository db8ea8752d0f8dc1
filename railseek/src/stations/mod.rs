//! Station name/code lookup tables.
//!
//! Provides name → telecode, telecode → name, and city → station-set
//! mapping, parsed from the upstream station table format. Loaded from
//! a file on disk or from a bundled default.

mod error;
mod index;

pub use error::StationError;
pub use index::{Station, StationIndex};
