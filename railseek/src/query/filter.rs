//! Filter & sort pipeline.
//!
//! Applied to the merged result set in a fixed order, each stage a
//! pure filter: seats-only, departure window, arrival window, transfer
//! window (transfer mode), exact-station filter when same-city
//! grouping is off, then a stable sort by departure time ascending.

use crate::domain::{Train, Transfer};

use super::QueryOutcome;
use super::criteria::SearchCriteria;

/// Reduce and order a query outcome according to the criteria.
pub fn cleanup(outcome: QueryOutcome, criteria: &SearchCriteria) -> QueryOutcome {
    match outcome {
        QueryOutcome::Trains(trains) => QueryOutcome::Trains(cleanup_trains(trains, criteria)),
        QueryOutcome::Transfers(transfers) => {
            QueryOutcome::Transfers(cleanup_transfers(transfers, criteria))
        }
    }
}

/// The pipeline for direct and expanded results.
pub fn cleanup_trains(mut trains: Vec<Train>, criteria: &SearchCriteria) -> Vec<Train> {
    if criteria.seats_only {
        trains.retain(Train::has_remaining);
    }
    if let Some(window) = &criteria.departure_window {
        trains.retain(|t| window.contains(t.departure));
    }
    if let Some(window) = &criteria.arrival_window {
        trains.retain(|t| window.contains(t.arrival));
    }
    if !criteria.same_city {
        trains.retain(|t| t.from_name == criteria.origin && t.to_name == criteria.destination);
    }

    trains.sort_by_key(|t| t.departure);
    trains
}

/// The pipeline for transfer itineraries.
///
/// Seats-only requires remaining seats on both legs; the departure
/// window applies to the first leg, the arrival window to the second,
/// and the transfer window to the connecting leg's departure.
pub fn cleanup_transfers(
    mut transfers: Vec<Transfer>,
    criteria: &SearchCriteria,
) -> Vec<Transfer> {
    if criteria.seats_only {
        transfers.retain(Transfer::has_remaining);
    }
    if let Some(window) = &criteria.departure_window {
        transfers.retain(|t| window.contains(t.first.departure));
    }
    if let Some(window) = &criteria.arrival_window {
        transfers.retain(|t| window.contains(t.second.arrival));
    }
    if let Some(window) = &criteria.transfer_window {
        transfers.retain(|t| window.contains(t.second.departure));
    }
    if !criteria.same_city {
        if let Some(via) = &criteria.via {
            transfers.retain(|t| {
                t.first.from_name == criteria.origin
                    && t.first.to_name == *via
                    && t.second.from_name == *via
                    && t.second.to_name == criteria.destination
            });
        }
    }

    transfers.sort_by_key(|t| t.departure());
    transfers
}
