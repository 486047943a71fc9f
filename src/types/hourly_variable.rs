//! Defines the hourly weather variables requested from Open-Meteo and the order in which
//! they appear in the forecast table.

use std::fmt;

/// One hourly weather metric requested from the forecast endpoint.
///
/// The variant order is the request order, and also the column order of the returned
/// table (after `date`, `latitude` and `longitude`). Units follow the fixed request
/// parameters: Fahrenheit, miles per hour and inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyVariable {
    /// Air temperature 2 m above ground (°F).
    Temperature2m,
    /// Probability of precipitation in the preceding hour (%).
    PrecipitationProbability,
    /// Total precipitation: rain, showers and snowfall (inch).
    Precipitation,
    /// Rain from large scale weather systems (inch).
    Rain,
    /// Showers from convective precipitation (inch).
    Showers,
    /// Snowfall amount (inch).
    Snowfall,
    /// Snow depth on the ground.
    SnowDepth,
    /// WMO weather interpretation code.
    WeatherCode,
    /// Viewing distance.
    Visibility,
    /// Wind speed 10 m above ground (mph).
    WindSpeed10m,
    /// Wind direction 10 m above ground (°).
    WindDirection10m,
}

impl HourlyVariable {
    /// All variables, in request order.
    pub const ALL: [HourlyVariable; 11] = [
        HourlyVariable::Temperature2m,
        HourlyVariable::PrecipitationProbability,
        HourlyVariable::Precipitation,
        HourlyVariable::Rain,
        HourlyVariable::Showers,
        HourlyVariable::Snowfall,
        HourlyVariable::SnowDepth,
        HourlyVariable::WeatherCode,
        HourlyVariable::Visibility,
        HourlyVariable::WindSpeed10m,
        HourlyVariable::WindDirection10m,
    ];

    /// The provider's name for this variable. Also used as the column name.
    pub fn name(&self) -> &'static str {
        match self {
            HourlyVariable::Temperature2m => "temperature_2m",
            HourlyVariable::PrecipitationProbability => "precipitation_probability",
            HourlyVariable::Precipitation => "precipitation",
            HourlyVariable::Rain => "rain",
            HourlyVariable::Showers => "showers",
            HourlyVariable::Snowfall => "snowfall",
            HourlyVariable::SnowDepth => "snow_depth",
            HourlyVariable::WeatherCode => "weather_code",
            HourlyVariable::Visibility => "visibility",
            HourlyVariable::WindSpeed10m => "wind_speed_10m",
            HourlyVariable::WindDirection10m => "wind_direction_10m",
        }
    }

    /// Comma separated variable list, as sent in the `hourly` query parameter.
    pub(crate) fn query_value(variables: &[HourlyVariable]) -> String {
        variables
            .iter()
            .map(HourlyVariable::name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Formats the variable using its provider name.
///
/// # Examples
///
/// ```
/// use hourly_forecast::HourlyVariable;
///
/// assert_eq!(HourlyVariable::WindSpeed10m.to_string(), "wind_speed_10m");
/// ```
impl fmt::Display for HourlyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::HourlyVariable;

    #[test]
    fn test_names_in_request_order() {
        let names: Vec<_> = HourlyVariable::ALL.iter().map(|v| v.name()).collect();
        assert_eq!(
            names,
            [
                "temperature_2m",
                "precipitation_probability",
                "precipitation",
                "rain",
                "showers",
                "snowfall",
                "snow_depth",
                "weather_code",
                "visibility",
                "wind_speed_10m",
                "wind_direction_10m",
            ]
        );
    }

    #[test]
    fn test_query_value_is_comma_joined() {
        let value = HourlyVariable::query_value(&[
            HourlyVariable::Rain,
            HourlyVariable::Showers,
            HourlyVariable::Snowfall,
        ]);
        assert_eq!(value, "rain,showers,snowfall");
    }
}
