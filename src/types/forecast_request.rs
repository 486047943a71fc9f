//! Defines the fixed hourly forecast request sent to Open-Meteo.

use crate::error::ForecastError;
use crate::types::hourly_variable::HourlyVariable;
use url::Url;

/// Default Open-Meteo forecast endpoint.
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

pub const TEMPERATURE_UNIT: &str = "fahrenheit";
pub const WIND_SPEED_UNIT: &str = "mph";
pub const PRECIPITATION_UNIT: &str = "inch";
pub const TIMEZONE: &str = "America/Chicago";
pub const PAST_HOURS: u32 = 6;
pub const FORECAST_HOURS: u32 = 24;
pub const MODELS: &str = "best_match";

/// An hourly forecast request for a single coordinate.
///
/// Only the coordinate varies. Units, timezone, the past/forecast window, model selection
/// and the variable list are fixed. No range validation is done on the coordinate: values
/// are passed to the provider as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl ForecastRequest {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Variables requested, in the order the response columns are read.
    pub fn variables(&self) -> &'static [HourlyVariable] {
        &HourlyVariable::ALL
    }

    /// Query parameters in a stable order. The order matters, since the full URL is the
    /// cache key.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("hourly", HourlyVariable::query_value(self.variables())),
            ("temperature_unit", TEMPERATURE_UNIT.to_string()),
            ("wind_speed_unit", WIND_SPEED_UNIT.to_string()),
            ("precipitation_unit", PRECIPITATION_UNIT.to_string()),
            ("timezone", TIMEZONE.to_string()),
            ("past_hours", PAST_HOURS.to_string()),
            ("forecast_hours", FORECAST_HOURS.to_string()),
            ("models", MODELS.to_string()),
            ("timeformat", "unixtime".to_string()),
        ]
    }

    /// Full request URL against `endpoint`.
    pub fn url(&self, endpoint: &str) -> Result<Url, ForecastError> {
        Url::parse_with_params(endpoint, self.query_pairs())
            .map_err(|e| ForecastError::InvalidEndpoint(endpoint.to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_carry_fixed_parameters() {
        let pairs = ForecastRequest::new(41.85, -87.65).query_pairs();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("latitude"), Some("41.85"));
        assert_eq!(get("longitude"), Some("-87.65"));
        assert_eq!(get("temperature_unit"), Some("fahrenheit"));
        assert_eq!(get("wind_speed_unit"), Some("mph"));
        assert_eq!(get("precipitation_unit"), Some("inch"));
        assert_eq!(get("timezone"), Some("America/Chicago"));
        assert_eq!(get("past_hours"), Some("6"));
        assert_eq!(get("forecast_hours"), Some("24"));
        assert_eq!(get("models"), Some("best_match"));
        assert_eq!(get("hourly").map(|v| v.split(',').count()), Some(11));
    }

    #[test]
    fn test_url_is_stable_for_same_coordinates() -> Result<(), ForecastError> {
        let a = ForecastRequest::new(52.52, 13.41).url(FORECAST_URL)?;
        let b = ForecastRequest::new(52.52, 13.41).url(FORECAST_URL)?;
        let c = ForecastRequest::new(52.52, 13.42).url(FORECAST_URL)?;

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.path(), "/v1/forecast");
        assert!(a.as_str().contains("timezone=America%2FChicago"));
        Ok(())
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = ForecastRequest::new(0.0, 0.0).url("not a url");
        assert!(matches!(result, Err(ForecastError::InvalidEndpoint(_, _))));
    }
}
