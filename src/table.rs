//! Flattens an [`HourlyBlock`] into the forecast `DataFrame`.

use crate::error::ForecastError;
use crate::types::hourly_block::HourlyBlock;
use crate::types::hourly_variable::HourlyVariable;
use polars::prelude::*;

pub const DATE_COLUMN: &str = "date";
pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const TIME_ZONE: &str = "UTC";

/// Column names of the forecast table, in order.
pub fn column_names() -> Vec<&'static str> {
    let mut names = vec![DATE_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN];
    names.extend(HourlyVariable::ALL.iter().map(|v| v.name()));
    names
}

/// Builds one row per timestamp of `block`.
///
/// `date` is a UTC `Datetime` column in milliseconds, `latitude` and `longitude` repeat
/// the given coordinate on every row, and each variable series becomes a nullable
/// `Float64` column in block order.
///
/// # Errors
///
/// Returns [`ForecastError::LengthMismatch`] if any series is not exactly as long as the
/// time axis, and [`ForecastError::InvalidInterval`] for a non-positive interval.
pub fn hourly_frame(
    latitude: f64,
    longitude: f64,
    block: &HourlyBlock,
) -> Result<DataFrame, ForecastError> {
    let timestamps_ms: Vec<i64> = block
        .timestamps()?
        .iter()
        .map(|ts| ts.timestamp_millis())
        .collect();
    let rows = timestamps_ms.len();

    let mut columns: Vec<Column> = Vec::with_capacity(3 + block.variables.len());
    let date = Int64Chunked::from_vec(DATE_COLUMN.into(), timestamps_ms)
        .into_datetime(TimeUnit::Milliseconds, Some(TIME_ZONE.into()))
        .into_series();
    columns.push(date.into());
    columns.push(Column::new(LATITUDE_COLUMN.into(), vec![latitude; rows]));
    columns.push(Column::new(LONGITUDE_COLUMN.into(), vec![longitude; rows]));

    for series in &block.variables {
        if series.values.len() != rows {
            return Err(ForecastError::LengthMismatch {
                variable: series.variable.name().to_string(),
                expected: rows,
                found: series.values.len(),
            });
        }
        columns.push(Column::new(
            series.variable.name().into(),
            series.values.clone(),
        ));
    }

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::hourly_block::VariableSeries;

    fn block(rows: usize) -> HourlyBlock {
        HourlyBlock {
            start: 1_750_000_000,
            end: 1_750_000_000 + rows as i64 * 3600,
            interval: 3600,
            variables: HourlyVariable::ALL
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    VariableSeries::new(*v, (0..rows).map(|r| Some((i * 100 + r) as f64)).collect())
                })
                .collect(),
        }
    }

    #[test]
    fn test_schema() -> Result<(), ForecastError> {
        let frame = hourly_frame(41.85, -87.65, &block(30))?;

        assert_eq!(frame.shape(), (30, 14));
        let names: Vec<&str> = frame.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, column_names());
        assert_eq!(
            frame.column(DATE_COLUMN)?.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, Some(TIME_ZONE.into()))
        );
        assert_eq!(frame.column("wind_speed_10m")?.dtype(), &DataType::Float64);
        Ok(())
    }

    #[test]
    fn test_values_align_with_timestamps() -> Result<(), ForecastError> {
        let frame = hourly_frame(41.85, -87.65, &block(5))?;

        let dates = frame.column(DATE_COLUMN)?.cast(&DataType::Int64)?;
        let dates = dates.i64()?;
        let latitude = frame.column(LATITUDE_COLUMN)?.f64()?;
        let longitude = frame.column(LONGITUDE_COLUMN)?.f64()?;
        let rain = frame.column("rain")?.f64()?;
        for i in 0..5 {
            assert_eq!(dates.get(i), Some((1_750_000_000 + i as i64 * 3600) * 1000));
            assert_eq!(latitude.get(i), Some(41.85));
            assert_eq!(longitude.get(i), Some(-87.65));
            assert_eq!(rain.get(i), Some((300 + i) as f64));
        }
        Ok(())
    }

    #[test]
    fn test_missing_values_become_nulls() -> Result<(), ForecastError> {
        let mut block = block(3);
        block.variables[0].values[1] = None;

        let frame = hourly_frame(0.0, 0.0, &block)?;
        let temperature = frame.column("temperature_2m")?;
        assert_eq!(temperature.null_count(), 1);
        assert_eq!(temperature.f64()?.get(1), None);
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        let mut block = block(4);
        block.variables[8].values.pop();

        match hourly_frame(0.0, 0.0, &block) {
            Err(ForecastError::LengthMismatch {
                variable,
                expected,
                found,
            }) => {
                assert_eq!(variable, "visibility");
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("expected length mismatch, got {:?}", other.map(|f| f.shape())),
        }
    }

    #[test]
    fn test_empty_block() -> Result<(), ForecastError> {
        let frame = hourly_frame(0.0, 0.0, &block(0))?;
        assert_eq!(frame.shape(), (0, 14));
        Ok(())
    }
}
