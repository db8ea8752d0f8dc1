//! Query aggregation engine.
//!
//! Fans schedule lookups out across the cartesian product of resolved
//! station-code sets, concurrently; each leg owns its own result
//! buffer and the buffers are merged only at the join. A per-leg
//! timeout keeps a hung upstream from stalling the whole run.

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::api::RowFilter;
use crate::domain::{Train, Transfer};
use crate::stations::StationIndex;

use super::QueryOutcome;
use super::criteria::{QueryMode, SearchCriteria};
use super::source::ScheduleSource;

/// Configuration for the aggregation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on one leg's fetch, retries included. An elapsed
    /// leg degrades to empty; the rest of the fan-out is unaffected.
    pub leg_timeout: Duration,
}

impl EngineConfig {
    /// Set the per-leg timeout.
    pub fn with_leg_timeout(mut self, timeout: Duration) -> Self {
        self.leg_timeout = timeout;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            leg_timeout: Duration::from_secs(90),
        }
    }
}

/// Aggregation engine over a schedule source.
pub struct QueryEngine<'a, S: ScheduleSource> {
    source: &'a S,
    stations: &'a StationIndex,
    config: EngineConfig,
}

impl<'a, S: ScheduleSource> QueryEngine<'a, S> {
    /// Create a new engine.
    pub fn new(source: &'a S, stations: &'a StationIndex, config: EngineConfig) -> Self {
        Self {
            source,
            stations,
            config,
        }
    }

    /// Run one query described by `criteria`.
    ///
    /// Station names are resolved up front and fail fast; remote
    /// failures afterwards only shrink the result set. The returned
    /// outcome is merged and deduplicated but not yet filtered or
    /// sorted (see [`super::filter`]).
    pub async fn run(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<QueryOutcome, crate::domain::InputError> {
        let route = criteria.resolve(self.stations)?;
        let filter = criteria.row_filter();

        match criteria.mode {
            QueryMode::Direct => {
                let trains = self
                    .query_direct(&route.origin_codes, &route.dest_codes, criteria.date, &filter)
                    .await;
                Ok(QueryOutcome::Trains(dedup(trains)))
            }
            QueryMode::Expanded => {
                let mut futures = Vec::new();
                for from in &route.origin_codes {
                    for to in &route.dest_codes {
                        futures.push(self.query_expanded(from, to, criteria.date, &filter));
                    }
                }
                let trains = join_all(futures).await.into_iter().flatten().collect();
                Ok(QueryOutcome::Trains(dedup(trains)))
            }
            QueryMode::Transfer => {
                let transfers = self.query_transfer(&route, criteria, &filter).await;
                Ok(QueryOutcome::Transfers(transfers))
            }
        }
    }

    /// Cartesian origin×destination fan-out, results concatenated.
    ///
    /// This is how a same-city group of stations is merged into one
    /// logical query.
    pub async fn query_direct(
        &self,
        from_codes: &[String],
        to_codes: &[String],
        date: NaiveDate,
        filter: &RowFilter,
    ) -> Vec<Train> {
        let mut futures = Vec::with_capacity(from_codes.len() * to_codes.len());
        for from in from_codes {
            for to in to_codes {
                futures.push(self.fetch_leg(from, to, date, filter));
            }
        }

        debug!(legs = futures.len(), "direct fan-out");
        join_all(futures).await.into_iter().flatten().collect()
    }

    /// Direct query plus re-queries from the origin to every
    /// intermediate stop of the trains found directly.
    ///
    /// The re-queries restrict their allowlist to the train numbers
    /// already seen, so expansion only surfaces earlier alighting
    /// points of the same services, never unrelated ones.
    pub async fn query_expanded(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        filter: &RowFilter,
    ) -> Vec<Train> {
        let mut trains = self.fetch_leg(from_code, to_code, date, filter).await;
        if trains.is_empty() {
            return trains;
        }

        let seen_nos: HashSet<String> = trains.iter().map(|t| t.no.clone()).collect();

        let mut stop_futures = Vec::with_capacity(trains.len());
        for train in &trains {
            stop_futures.push(self.fetch_stops(train, date));
        }

        // Union of intermediate stations across all direct results,
        // first occurrence wins.
        let mut stop_names = Vec::new();
        let mut name_set = HashSet::new();
        for stops in join_all(stop_futures).await {
            for stop in stops {
                if name_set.insert(stop.clone()) {
                    stop_names.push(stop);
                }
            }
        }

        let narrowed = filter.narrowed(seen_nos);
        let mut leg_futures = Vec::new();
        for name in &stop_names {
            match self.stations.code_of(name) {
                Some(code) => leg_futures.push(self.fetch_leg(from_code, code, date, &narrowed)),
                None => debug!(station = %name, "intermediate station not in index"),
            }
        }

        debug!(
            from = from_code,
            to = to_code,
            direct = trains.len(),
            expansions = leg_futures.len(),
            "expanded fan-out"
        );
        for extra in join_all(leg_futures).await {
            trains.extend(extra);
        }
        trains
    }

    /// Two-leg itineraries through each transfer-station candidate.
    ///
    /// For every via code, the origin→via and via→destination sets are
    /// fetched independently and every feasible (first, second) pair
    /// is kept (see [`Transfer::connect`]).
    pub async fn query_transfer(
        &self,
        route: &super::criteria::ResolvedRoute,
        criteria: &SearchCriteria,
        filter: &RowFilter,
    ) -> Vec<Transfer> {
        let mut transfers = Vec::new();

        for via in &route.via_codes {
            let via_slice = std::slice::from_ref(via);
            let (first_legs, second_legs) = tokio::join!(
                self.query_direct(&route.origin_codes, via_slice, criteria.date, filter),
                self.query_direct(via_slice, &route.dest_codes, criteria.date, filter),
            );

            for first in &first_legs {
                for second in &second_legs {
                    if let Some(transfer) = Transfer::connect(
                        first.clone(),
                        second.clone(),
                        criteria.change_interval_mins,
                    ) {
                        transfers.push(transfer);
                    }
                }
            }
        }

        transfers
    }

    /// One leg's schedules, bounded by the engine's leg timeout.
    async fn fetch_leg(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        filter: &RowFilter,
    ) -> Vec<Train> {
        match tokio::time::timeout(
            self.config.leg_timeout,
            self.source.fetch_schedules(from_code, to_code, date, filter),
        )
        .await
        {
            Ok(trains) => trains,
            Err(_) => {
                warn!(from = from_code, to = to_code, "leg query timed out");
                Vec::new()
            }
        }
    }

    /// One train's intermediate stops, bounded by the leg timeout.
    async fn fetch_stops(&self, train: &Train, date: NaiveDate) -> Vec<String> {
        match tokio::time::timeout(
            self.config.leg_timeout,
            self.source.fetch_route_stops(train, date),
        )
        .await
        {
            Ok(stops) => stops,
            Err(_) => {
                warn!(train = %train.no, "route-stops query timed out");
                Vec::new()
            }
        }
    }
}

/// Deduplicate a merged sequence using record equality, keeping the
/// first occurrence of each (route id, origin name, destination name).
pub fn dedup(trains: Vec<Train>) -> Vec<Train> {
    let mut seen: HashSet<(String, String, String)> = HashSet::with_capacity(trains.len());
    trains
        .into_iter()
        .filter(|t| seen.insert((t.full_no.clone(), t.from_name.clone(), t.to_name.clone())))
        .collect()
}
