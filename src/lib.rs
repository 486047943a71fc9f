//! Hourly weather forecasts from Open-Meteo as Polars DataFrames.
//!
//! The entry point is [`HourlyForecast`]. It requests a fixed window around "now" for a
//! coordinate, caches the response on disk and retries transient failures.

mod api;
mod error;
mod forecast;
mod table;
mod types;
mod utils;

pub use error::ForecastError;
pub use forecast::HourlyForecast;

pub use api::error::ApiError;
pub use api::response_cache::{ResponseCache, DEFAULT_CACHE_TTL};
pub use api::retry::{RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES};
pub use api::session::DEFAULT_TIMEOUT;

pub use table::{column_names, hourly_frame, DATE_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN};

pub use types::forecast_request::*;
pub use types::forecast_response::{decode_locations, LocationForecast};
pub use types::hourly_block::{HourlyBlock, VariableSeries, DEFAULT_INTERVAL_SECONDS};
pub use types::hourly_variable::HourlyVariable;
