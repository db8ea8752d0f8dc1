//! Station table error types.

use std::path::PathBuf;

/// Errors loading the station table.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// The file could not be read.
    #[error("failed to read station file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file parsed to zero stations.
    #[error("no station records found in {path}")]
    Empty { path: PathBuf },
}
