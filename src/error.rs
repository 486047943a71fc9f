use crate::api::error::ApiError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid forecast endpoint '{0}'")]
    InvalidEndpoint(String, #[source] url::ParseError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to decode forecast response")]
    JsonDecode(#[from] serde_json::Error),

    #[error("Forecast response contained no locations")]
    NoLocations,

    #[error("Forecast response has no hourly data")]
    MissingHourlyBlock,

    #[error("Hourly variable '{0}' missing from forecast response")]
    MissingVariable(String),

    #[error("Hourly time axis is not evenly spaced at index {index}")]
    IrregularTimeAxis { index: usize },

    #[error("Hourly interval must be positive, got {0} s")]
    InvalidInterval(i64),

    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("Variable '{variable}' has {found} values but the time axis has {expected}")]
    LengthMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },

    #[error("Failed building forecast DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
