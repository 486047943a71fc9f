//! The hourly section of a forecast response: a regular time axis plus one value array per
//! requested variable.

use crate::error::ForecastError;
use crate::types::hourly_variable::HourlyVariable;
use chrono::{DateTime, Utc};

/// Interval assumed when the provider returns a single timestamp.
pub const DEFAULT_INTERVAL_SECONDS: i64 = 3600;

/// Values for one variable, aligned by index with the block's time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSeries {
    pub variable: HourlyVariable,
    /// `None` where the provider reported no value.
    pub values: Vec<Option<f64>>,
}

impl VariableSeries {
    pub fn new(variable: HourlyVariable, values: Vec<Option<f64>>) -> Self {
        Self { variable, values }
    }
}

/// A half-open time range `[start, end)` stepped by `interval`, with the variable arrays
/// that belong to it.
///
/// `start` and `end` are Unix timestamps in seconds, `interval` is in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBlock {
    pub start: i64,
    pub end: i64,
    pub interval: i64,
    pub variables: Vec<VariableSeries>,
}

impl HourlyBlock {
    /// Builds a block from the provider's explicit list of timestamps.
    ///
    /// The list must be evenly spaced with a positive step. `end` is one step past the
    /// last timestamp.
    pub fn from_time_axis(
        time: &[i64],
        variables: Vec<VariableSeries>,
    ) -> Result<Self, ForecastError> {
        let (start, interval) = match time {
            [] => {
                return Ok(Self {
                    start: 0,
                    end: 0,
                    interval: DEFAULT_INTERVAL_SECONDS,
                    variables,
                })
            }
            [only] => (*only, DEFAULT_INTERVAL_SECONDS),
            [first, second, ..] => match second.checked_sub(*first) {
                Some(step) => (*first, step),
                None => return Err(ForecastError::IrregularTimeAxis { index: 1 }),
            },
        };
        if interval <= 0 {
            return Err(ForecastError::IrregularTimeAxis { index: 1 });
        }
        if let Some(index) = time
            .windows(2)
            .position(|pair| pair[1].checked_sub(pair[0]) != Some(interval))
        {
            return Err(ForecastError::IrregularTimeAxis { index: index + 1 });
        }

        let last = time[time.len() - 1];
        let end = last
            .checked_add(interval)
            .ok_or(ForecastError::InvalidTimestamp(last))?;
        Ok(Self {
            start,
            end,
            interval,
            variables,
        })
    }

    /// Number of timestamps in `[start, end)`.
    pub fn row_count(&self) -> Result<usize, ForecastError> {
        if self.interval <= 0 {
            return Err(ForecastError::InvalidInterval(self.interval));
        }
        if self.end <= self.start {
            return Ok(0);
        }
        let span = self
            .end
            .checked_sub(self.start)
            .ok_or(ForecastError::InvalidTimestamp(self.end))?;
        let rows = (span as u64).div_ceil(self.interval as u64);
        usize::try_from(rows).map_err(|_| ForecastError::InvalidTimestamp(self.end))
    }

    /// The time axis: `start + i * interval` for every row.
    pub fn timestamps(&self) -> Result<Vec<DateTime<Utc>>, ForecastError> {
        let rows = self.row_count()?;
        (0..rows as i64)
            .map(|i| {
                let seconds = i
                    .checked_mul(self.interval)
                    .and_then(|offset| self.start.checked_add(offset))
                    .ok_or(ForecastError::InvalidTimestamp(self.end))?;
                DateTime::from_timestamp(seconds, 0)
                    .ok_or(ForecastError::InvalidTimestamp(seconds))
            })
            .collect()
    }
}
