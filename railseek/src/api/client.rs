//! Upstream HTTP client.
//!
//! Issues parameterized GET-JSON lookups against the schedule-search
//! and route-stops endpoints. Failures are retried with a linearly
//! increasing delay and degrade to an empty result on exhaustion, so a
//! single bad leg never aborts a whole aggregation. A semaphore bounds
//! concurrent requests across the fan-out.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{SeatClass, Train};
use crate::stations::StationIndex;

use super::error::ApiError;
use super::parse::{RowFilter, parse_row};
use super::types::{RouteReply, ScheduleReply};

/// Default base URL of the upstream service.
const DEFAULT_BASE_URL: &str = "https://kyfw.12306.cn";

/// Schedule-search endpoint path.
const SCHEDULE_PATH: &str = "/otn/leftTicket/query";

/// Route-stops endpoint path.
const ROUTE_PATH: &str = "/otn/czxx/queryByTrainNo";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// The upstream rejects clients without a browser user agent.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Configuration for the query client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the service (overridable for testing).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Total attempts per lookup, including the first.
    pub max_retries: u32,
    /// Base delay unit; the wait after failed attempt `k` is
    /// `k * retry_base`.
    pub retry_base: Duration,
    /// Maximum concurrent requests.
    pub max_concurrent: usize,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            max_retries: 3,
            retry_base: Duration::from_secs(1),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the total attempt count.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n.max(1);
        self
    }

    /// Set the backoff base delay.
    pub fn with_retry_base(mut self, base: Duration) -> Self {
        self.retry_base = base;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Upstream query client.
///
/// Cheap to clone; the HTTP connection pool, the station index and the
/// semaphore are shared. Nothing is mutated per request.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_base: Duration,
    semaphore: Arc<Semaphore>,
    stations: Arc<StationIndex>,
    seat_classes: Vec<SeatClass>,
}

impl QueryClient {
    /// Create a new client.
    ///
    /// `seat_classes` selects which seat columns are captured from each
    /// schedule row, in display order.
    pub fn new(
        config: ClientConfig,
        stations: Arc<StationIndex>,
        seat_classes: Vec<SeatClass>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static("https://www.12306.cn/"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            max_retries: config.max_retries.max(1),
            retry_base: config.retry_base,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            stations,
            seat_classes,
        })
    }

    /// Schedules from `from_code` to `to_code` on `date`.
    ///
    /// Rows outside the filter's allowlist or class rule are skipped.
    /// Transport and decode failures degrade to an empty result after
    /// the retry budget is spent.
    pub async fn fetch_schedules(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        filter: &RowFilter,
    ) -> Vec<Train> {
        let url = format!("{}{}", self.base_url, SCHEDULE_PATH);
        let params = [
            ("leftTicketDTO.train_date", date.format("%Y-%m-%d").to_string()),
            ("leftTicketDTO.from_station", from_code.to_string()),
            ("leftTicketDTO.to_station", to_code.to_string()),
            ("purpose_codes", "ADULT".to_string()),
        ];

        let Some(reply) = self.get_with_retry::<ScheduleReply>(&url, &params).await else {
            return Vec::new();
        };

        let rows = reply.data.map(|d| d.result).unwrap_or_default();
        let trains: Vec<Train> = rows
            .iter()
            .filter_map(|raw| parse_row(raw, &self.seat_classes, &self.stations))
            .filter(|t| filter.admits(&t.no))
            .collect();

        debug!(
            from = from_code,
            to = to_code,
            rows = rows.len(),
            kept = trains.len(),
            "fetched schedules"
        );
        trains
    }

    /// Names of the genuinely intermediate stops on a train's route.
    ///
    /// Disabled stops are dropped, as are the first and last stop (the
    /// queried origin and destination themselves).
    pub async fn fetch_route_stops(&self, train: &Train, date: NaiveDate) -> Vec<String> {
        let url = format!("{}{}", self.base_url, ROUTE_PATH);
        let params = [
            ("train_no", train.full_no.clone()),
            ("from_station_telecode", train.from_code.clone()),
            ("to_station_telecode", train.to_code.clone()),
            ("depart_date", date.format("%Y-%m-%d").to_string()),
        ];

        let Some(reply) = self.get_with_retry::<RouteReply>(&url, &params).await else {
            return Vec::new();
        };

        let mut names: Vec<String> = reply
            .data
            .map(|d| d.data)
            .unwrap_or_default()
            .into_iter()
            .filter(|stop| stop.is_enabled)
            .map(|stop| stop.station_name)
            .collect();

        if names.len() <= 2 {
            return Vec::new();
        }
        names.pop();
        names.remove(0);
        names
    }

    /// One GET-JSON attempt.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::Closed)?;

        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
            snippet: body.chars().take(200).collect(),
        })
    }

    /// GET-JSON with bounded retry.
    ///
    /// Makes up to `max_retries` total attempts, sleeping
    /// `attempt * retry_base` after failed attempt number `attempt`.
    /// Returns `None` once the budget is exhausted.
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Option<T> {
        for attempt in 1..=self.max_retries {
            match self.get_json(url, params).await {
                Ok(value) => return Some(value),
                Err(err) => {
                    warn!(attempt, max = self.max_retries, %err, url, "query attempt failed");
                    if attempt < self.max_retries {
                        tokio::time::sleep(self.retry_base * attempt).await;
                    }
                }
            }
        }
        None
    }
}
