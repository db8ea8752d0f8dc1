//! Search criteria.
//!
//! An explicit value describing one query run, passed into every
//! aggregation and filter call. Nothing here is global or mutable.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::api::RowFilter;
use crate::domain::{ClassFilter, InputError, SeatClass, TimeWindow};
use crate::stations::StationIndex;

/// How the query is expanded beyond a plain origin→destination search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Plain origin→destination search.
    #[default]
    Direct,
    /// Also search from the origin to intermediate stops of trains
    /// already found directly.
    Expanded,
    /// Two-leg itineraries through a transfer station.
    Transfer,
}

/// Station-code sets for one run, resolved from the criteria's station
/// names. `via_codes` is empty outside transfer mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub origin_codes: Vec<String>,
    pub dest_codes: Vec<String>,
    pub via_codes: Vec<String>,
}

/// All inputs of one query run.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    /// Canonical origin station (or city) name.
    pub origin: String,
    /// Canonical destination station (or city) name.
    pub destination: String,
    /// Transfer station name; required in transfer mode.
    pub via: Option<String>,
    pub mode: QueryMode,
    pub date: NaiveDate,
    /// Restrict results to these display codes.
    pub allowlist: Option<HashSet<String>>,
    /// Window on the first leg's departure.
    pub departure_window: Option<TimeWindow>,
    /// Window on the last leg's arrival.
    pub arrival_window: Option<TimeWindow>,
    /// Window on the connecting leg's departure (transfer mode).
    pub transfer_window: Option<TimeWindow>,
    /// Longest acceptable connection, in minutes.
    pub change_interval_mins: i32,
    pub class_filter: ClassFilter,
    /// Treat all stations in the origin/destination/transfer cities as
    /// interchangeable.
    pub same_city: bool,
    /// Keep only results with remaining seats on every leg.
    pub seats_only: bool,
    /// Seat columns to capture and display.
    pub seat_classes: Vec<SeatClass>,
}

impl SearchCriteria {
    /// Criteria with the defaults of a plain same-city direct query.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            via: None,
            mode: QueryMode::Direct,
            date,
            allowlist: None,
            departure_window: None,
            arrival_window: None,
            transfer_window: None,
            change_interval_mins: 4 * 60,
            class_filter: ClassFilter::Any,
            same_city: true,
            seats_only: false,
            seat_classes: SeatClass::ALL.to_vec(),
        }
    }

    /// The row filter the remote client applies while parsing.
    pub fn row_filter(&self) -> RowFilter {
        RowFilter {
            allowlist: self.allowlist.clone(),
            class: self.class_filter,
        }
    }

    /// Resolve the station names to telecode sets, failing fast on
    /// anything the index cannot resolve. No remote call happens
    /// before this check passes.
    pub fn resolve(&self, stations: &StationIndex) -> Result<ResolvedRoute, InputError> {
        let origin_codes = stations.resolve_codes(&self.origin, self.same_city)?;
        let dest_codes = stations.resolve_codes(&self.destination, self.same_city)?;

        let via_codes = if self.mode == QueryMode::Transfer {
            match &self.via {
                Some(via) => stations.resolve_codes(via, self.same_city)?,
                None => return Err(InputError::MissingTransferStation),
            }
        } else {
            Vec::new()
        };

        Ok(ResolvedRoute {
            origin_codes,
            dest_codes,
            via_codes,
        })
    }
}
