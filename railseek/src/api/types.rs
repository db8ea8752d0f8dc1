//! Raw upstream response shapes.
//!
//! Only the fields the parser reads are modelled; everything else in
//! the responses is ignored.

use serde::Deserialize;

/// Envelope of the schedule-search endpoint.
#[derive(Debug, Deserialize)]
pub struct ScheduleReply {
    #[serde(default)]
    pub data: Option<ScheduleData>,
}

/// Payload of the schedule-search endpoint: one pipe-delimited string
/// per scheduled train.
#[derive(Debug, Deserialize)]
pub struct ScheduleData {
    #[serde(default)]
    pub result: Vec<String>,
}

/// Envelope of the route-stops endpoint.
#[derive(Debug, Deserialize)]
pub struct RouteReply {
    #[serde(default)]
    pub data: Option<RouteData>,
}

/// Payload of the route-stops endpoint.
#[derive(Debug, Deserialize)]
pub struct RouteData {
    #[serde(default)]
    pub data: Vec<RouteStop>,
}

/// One stop on a train's route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteStop {
    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,
    pub station_name: String,
}
