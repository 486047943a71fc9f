//! Retry with exponential backoff for transient request failures.

use crate::api::error::ApiError;
use log::{info, warn};
use std::thread;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.2;
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(120);

/// How often, and how patiently, a failing request is repeated.
///
/// The delay before retry `n` (counting from 1) is zero for the first retry and
/// `backoff_factor * 2^(n - 1)` seconds afterwards, capped at `max_backoff`. With the
/// defaults that is 0, 0.4, 0.8, 1.6 and 3.2 seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            backoff_factor,
            ..Self::default()
        }
    }

    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let seconds = self.backoff_factor * 2f64.powi(retry as i32 - 1);
        if seconds.is_nan() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(seconds)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Runs `operation` until it succeeds, fails with a non-transient error, or the retry
    /// budget is spent. Blocks the calling thread while backing off.
    pub fn run<T, F>(&self, url: &str, mut operation: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Result<T, ApiError>,
    {
        let mut retry = 0;
        loop {
            match operation() {
                Ok(value) => {
                    if retry > 0 {
                        info!("Request for {} succeeded after {} retries", url, retry);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_transient() => {
                    if retry >= self.max_retries {
                        warn!("All {} attempts for {} failed", retry + 1, url);
                        return Err(ApiError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: retry + 1,
                            source: Box::new(e),
                        });
                    }
                    retry += 1;
                    let delay = self.delay_for_retry(retry);
                    warn!(
                        "Transient failure for {}: {}. Retry {} of {} in {:?}",
                        url, e, retry, self.max_retries, delay
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
