//! Schedule-row parsing.
//!
//! Each result row is a pipe-delimited string with fixed field
//! positions. The parser builds fully-populated [`Train`] records,
//! resolving display names from the station index at construction.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{ClassFilter, DayTime, SeatClass, SeatCount, Train};
use crate::stations::StationIndex;

/// Fixed field positions in a schedule row.
const FIELD_FULL_NO: usize = 2;
const FIELD_NO: usize = 3;
const FIELD_FROM_CODE: usize = 6;
const FIELD_TO_CODE: usize = 7;
const FIELD_DEPARTURE: usize = 8;
const FIELD_ARRIVAL: usize = 9;
const FIELD_DURATION: usize = 10;

/// Row-level filter applied while parsing a response.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    /// Keep only these display codes, when set.
    pub allowlist: Option<HashSet<String>>,
    /// Train-class inclusion rule.
    pub class: ClassFilter,
}

impl RowFilter {
    /// True iff a row with this display code survives the filter.
    pub fn admits(&self, no: &str) -> bool {
        if let Some(allow) = &self.allowlist {
            if !allow.contains(no) {
                return false;
            }
        }
        self.class.admits(no)
    }

    /// The same class rule with the allowlist replaced.
    ///
    /// Used by the expanded query mode, which restricts re-queries to
    /// train numbers already found directly.
    pub fn narrowed(&self, allow: HashSet<String>) -> RowFilter {
        RowFilter {
            allowlist: Some(allow),
            class: self.class,
        }
    }
}

/// Parse one pipe-delimited schedule row into a [`Train`].
///
/// Returns `None` for rows that are too short or carry unparseable
/// times; such rows are logged and dropped rather than failing the
/// whole response. Seat fields beyond the row's length read as
/// not-applicable.
pub fn parse_row(raw: &str, seat_classes: &[SeatClass], stations: &StationIndex) -> Option<Train> {
    let fields: Vec<&str> = raw.split('|').collect();
    if fields.len() <= FIELD_DURATION {
        debug!(fields = fields.len(), "skipping short schedule row");
        return None;
    }

    let departure = match DayTime::parse(fields[FIELD_DEPARTURE]) {
        Ok(t) => t,
        Err(err) => {
            debug!(%err, raw = fields[FIELD_DEPARTURE], "skipping row with bad departure");
            return None;
        }
    };
    let arrival = match DayTime::parse(fields[FIELD_ARRIVAL]) {
        Ok(t) => t,
        Err(err) => {
            debug!(%err, raw = fields[FIELD_ARRIVAL], "skipping row with bad arrival");
            return None;
        }
    };

    let from_code = fields[FIELD_FROM_CODE].to_string();
    let to_code = fields[FIELD_TO_CODE].to_string();
    let from_name = stations.name_of(&from_code).unwrap_or_default().to_string();
    let to_name = stations.name_of(&to_code).unwrap_or_default().to_string();

    let seats = seat_classes
        .iter()
        .map(|class| SeatCount::parse(fields.get(class.field_index()).copied().unwrap_or("")))
        .collect();

    Some(Train {
        full_no: fields[FIELD_FULL_NO].to_string(),
        no: fields[FIELD_NO].to_string(),
        from_code,
        to_code,
        from_name,
        to_name,
        departure,
        arrival,
        duration: fields[FIELD_DURATION].to_string(),
        seats,
    })
}
