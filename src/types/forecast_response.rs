//! Decoding of the Open-Meteo forecast JSON response.

use crate::error::ForecastError;
use crate::types::hourly_block::{HourlyBlock, VariableSeries};
use crate::types::hourly_variable::HourlyVariable;
use serde::Deserialize;
use std::collections::HashMap;

/// Forecast for one location, as returned by the provider.
///
/// The coordinates are the grid cell the provider snapped to, so they can differ
/// slightly from the requested ones.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationForecast {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level.
    #[serde(default)]
    pub elevation: f64,
    pub generationtime_ms: Option<f64>,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub timezone_abbreviation: String,
    hourly: Option<RawHourly>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawHourly {
    time: Vec<i64>,
    #[serde(flatten)]
    values: HashMap<String, Vec<Option<f64>>>,
}

// A multi-coordinate request comes back as an array, a single one as a bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ForecastPayload {
    Many(Vec<LocationForecast>),
    One(Box<LocationForecast>),
}

/// Decodes a response body into its locations, in response order.
pub fn decode_locations(body: &str) -> Result<Vec<LocationForecast>, ForecastError> {
    let payload: ForecastPayload = serde_json::from_str(body)?;
    Ok(match payload {
        ForecastPayload::Many(locations) => locations,
        ForecastPayload::One(location) => vec![*location],
    })
}

impl LocationForecast {
    /// Human readable location diagnostics, one line each.
    pub fn summary_lines(&self) -> [String; 4] {
        [
            format!("Coordinates {}°N {}°E", self.latitude, self.longitude),
            format!("Elevation {:?} m asl", self.elevation),
            format!("Timezone {} {}", self.timezone, self.timezone_abbreviation),
            format!("Timezone difference to GMT+0 {} s", self.utc_offset_seconds),
        ]
    }

    /// Extracts the hourly block, keeping only `variables`, in that order.
    pub fn hourly_block(&self, variables: &[HourlyVariable]) -> Result<HourlyBlock, ForecastError> {
        let hourly = self
            .hourly
            .as_ref()
            .ok_or(ForecastError::MissingHourlyBlock)?;

        let series = variables
            .iter()
            .map(|variable| {
                hourly
                    .values
                    .get(variable.name())
                    .map(|values| VariableSeries::new(*variable, values.clone()))
                    .ok_or_else(|| ForecastError::MissingVariable(variable.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        HourlyBlock::from_time_axis(&hourly.time, series)
    }
}
