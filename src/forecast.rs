//! This module provides the main entry point of the crate: a client that fetches the hourly
//! Open-Meteo forecast around "now" for a coordinate and returns it as a Polars
//! `DataFrame`.

use crate::api::response_cache::{ResponseCache, DEFAULT_CACHE_TTL};
use crate::api::retry::{RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES};
use crate::api::session::{ForecastSession, DEFAULT_TIMEOUT};
use crate::error::ForecastError;
use crate::table::hourly_frame;
use crate::types::forecast_request::{ForecastRequest, FORECAST_URL};
use crate::types::forecast_response::decode_locations;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::info;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Client for hourly weather forecasts.
///
/// Each [`fetch`](HourlyForecast::fetch) requests the past 6 and next 24 hours for one
/// coordinate, in Fahrenheit, mph and inches, using the provider's best matching model.
/// Responses are cached on disk (one hour by default), and transient failures are
/// retried with exponential backoff (5 retries, backoff factor 0.2 by default).
///
/// All calls are blocking.
///
/// # Examples
///
/// ```no_run
/// # use hourly_forecast::{HourlyForecast, ForecastError};
/// # fn run() -> Result<(), ForecastError> {
/// let client = HourlyForecast::new()?;
/// let frame = client.fetch(41.85, -87.65)?;
/// println!("{}", frame);
/// # Ok(())
/// # }
/// ```
pub struct HourlyForecast {
    session: ForecastSession,
    endpoint: String,
}

#[bon]
impl HourlyForecast {
    /// Creates a client using the default cache directory.
    ///
    /// The directory is determined with the `dirs` crate, typically
    /// `~/.cache/hourly_forecast_cache` on Linux, and created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::CacheDirResolution`] if there is no user cache directory,
    /// and [`ForecastError::CacheDirCreation`] if it cannot be created.
    pub fn new() -> Result<Self, ForecastError> {
        let cache_folder = get_cache_dir().map_err(ForecastError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder)
    }

    /// Creates a client that caches responses in `cache_folder`.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::CacheDirCreation`] if the folder cannot be created.
    pub fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, ForecastError> {
        Self::configure().cache_folder(cache_folder).build()
    }

    /// Creates a client with custom settings. Every setting is optional.
    ///
    /// * `.cache_folder(PathBuf)`: where responses are cached. Defaults to the user cache
    ///   directory, as in [`HourlyForecast::new`].
    /// * `.endpoint(String)`: forecast endpoint. Defaults to [`FORECAST_URL`].
    /// * `.cache_ttl(Duration)`: how long a cached response is served. Defaults to one hour.
    ///   `Duration::ZERO` disables cache hits.
    /// * `.max_retries(u32)`: retries after the first attempt. Defaults to 5.
    /// * `.backoff_factor(f64)`: backoff base in seconds. Defaults to 0.2.
    /// * `.timeout(Duration)`: per-request timeout. Defaults to 30 seconds.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use hourly_forecast::{HourlyForecast, ForecastError};
    /// # use std::time::Duration;
    /// # fn run() -> Result<(), ForecastError> {
    /// let client = HourlyForecast::configure()
    ///     .cache_folder(".cache".into())
    ///     .cache_ttl(Duration::from_secs(600))
    ///     .max_retries(2)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidEndpoint`] for an unparsable endpoint, the cache
    /// directory errors of [`HourlyForecast::new`], or [`ForecastError::Api`] if the HTTP
    /// client cannot be built.
    #[builder(finish_fn = build)]
    pub fn configure(
        cache_folder: Option<PathBuf>,
        endpoint: Option<String>,
        cache_ttl: Option<Duration>,
        max_retries: Option<u32>,
        backoff_factor: Option<f64>,
        timeout: Option<Duration>,
    ) -> Result<Self, ForecastError> {
        let endpoint = endpoint.unwrap_or_else(|| FORECAST_URL.to_string());
        Url::parse(&endpoint).map_err(|e| ForecastError::InvalidEndpoint(endpoint.clone(), e))?;

        let cache_folder = match cache_folder {
            Some(folder) => folder,
            None => get_cache_dir().map_err(ForecastError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_folder)
            .map_err(|e| ForecastError::CacheDirCreation(cache_folder.clone(), e))?;

        let cache = ResponseCache::new(&cache_folder, cache_ttl.unwrap_or(DEFAULT_CACHE_TTL));
        let retry = RetryPolicy::new(
            max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            backoff_factor.unwrap_or(DEFAULT_BACKOFF_FACTOR),
        );
        let session = ForecastSession::new(cache, retry, timeout.unwrap_or(DEFAULT_TIMEOUT))?;

        Ok(Self { session, endpoint })
    }

    /// Fetches the hourly forecast for a coordinate.
    ///
    /// The coordinate is not validated. Out-of-range values are sent as is and the
    /// provider's rejection comes back as [`ApiError::HttpStatus`](crate::ApiError::HttpStatus).
    /// Location diagnostics (coordinates, elevation, timezone, UTC offset) are printed to
    /// stdout.
    ///
    /// # Returns
    ///
    /// A `DataFrame` with one row per hour and the columns `date, latitude, longitude,
    /// temperature_2m, precipitation_probability, precipitation, rain, showers, snowfall,
    /// snow_depth, weather_code, visibility, wind_speed_10m, wind_direction_10m`. `date`
    /// is a UTC datetime. `latitude` and `longitude` are the arguments, repeated on
    /// every row.
    ///
    /// # Errors
    ///
    /// * [`ForecastError::Api`] for network or HTTP failures. Transient ones surface as
    ///   [`ApiError::RetriesExhausted`](crate::ApiError::RetriesExhausted) once the retry
    ///   budget is spent.
    /// * [`ForecastError::NoLocations`] if the response holds no location.
    /// * [`ForecastError::LengthMismatch`] if a variable array does not match the time axis.
    /// * [`ForecastError::JsonDecode`], [`ForecastError::MissingHourlyBlock`] or
    ///   [`ForecastError::MissingVariable`] for malformed responses.
    pub fn fetch(&self, latitude: f64, longitude: f64) -> Result<DataFrame, ForecastError> {
        let request = ForecastRequest::new(latitude, longitude);
        let url = request.url(&self.endpoint)?;
        let body = self.session.get(&url)?;

        let location = decode_locations(&body)?
            .into_iter()
            .next()
            .ok_or(ForecastError::NoLocations)?;
        for line in location.summary_lines() {
            println!("{}", line);
        }

        let block = location.hourly_block(request.variables())?;
        let frame = hourly_frame(request.latitude, request.longitude, &block)?;
        info!(
            "Fetched {} hourly rows for ({}, {})",
            frame.height(),
            latitude,
            longitude
        );
        Ok(frame)
    }

    /// Deletes all cached responses, returning how many were removed.
    pub fn clear_cache(&self) -> Result<usize, ForecastError> {
        Ok(self.session.cache().clear()?)
    }

    pub fn cache_folder(&self) -> &Path {
        self.session.cache().cache_dir()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
