//! Schedule source abstraction.

use chrono::NaiveDate;

use crate::api::{QueryClient, RowFilter};
use crate::domain::Train;

/// Provider of schedule and route data.
///
/// This abstraction allows the aggregation engine to be tested with
/// mock data. The HTTP client and its caching wrapper both implement
/// it; both degrade failures to empty results rather than erroring.
#[allow(async_fn_in_trait)]
pub trait ScheduleSource {
    /// Schedules from `from_code` to `to_code` on `date`, with rows
    /// outside the filter skipped.
    async fn fetch_schedules(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        filter: &RowFilter,
    ) -> Vec<Train>;

    /// Names of the intermediate stops on a train's route, excluding
    /// the origin and destination themselves.
    async fn fetch_route_stops(&self, train: &Train, date: NaiveDate) -> Vec<String>;
}

impl ScheduleSource for QueryClient {
    async fn fetch_schedules(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        filter: &RowFilter,
    ) -> Vec<Train> {
        QueryClient::fetch_schedules(self, from_code, to_code, date, filter).await
    }

    async fn fetch_route_stops(&self, train: &Train, date: NaiveDate) -> Vec<String> {
        QueryClient::fetch_route_stops(self, train, date).await
    }
}
