//! Caller-input errors.

use super::time::TimeError;

/// Invalid search input, reported before any remote call is made.
///
/// These are caller mistakes, not transient failures; they are never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Date string did not parse or names an impossible date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A time-window string did not parse.
    #[error("invalid time window {window:?}: {source}")]
    InvalidWindow {
        window: String,
        source: TimeError,
    },

    /// A station name has no entry in the station index.
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// An unrecognized seat-class name.
    #[error("unknown seat class: {0}")]
    UnknownSeatClass(String),

    /// The high-speed-only and conventional-only filters were both
    /// requested.
    #[error("high-speed-only and conventional-only filters are mutually exclusive")]
    ConflictingClassFilters,

    /// Transfer mode requires a transfer station.
    #[error("transfer mode requires a via station")]
    MissingTransferStation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = InputError::UnknownStation("幽灵站".into());
        assert_eq!(err.to_string(), "unknown station: 幽灵站");

        let err = InputError::InvalidDate("2024-13-99".into());
        assert!(err.to_string().contains("invalid date"));
    }
}
