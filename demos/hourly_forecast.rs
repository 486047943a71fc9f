use hourly_forecast::{ForecastError, HourlyForecast};
use std::env;

// Usage: cargo run --example hourly_forecast -- [latitude] [longitude]
fn main() -> Result<(), ForecastError> {
    env_logger::init();

    let mut args = env::args().skip(1).map(|a| a.parse::<f64>());
    let latitude = args.next().and_then(Result::ok).unwrap_or(41.85);
    let longitude = args.next().and_then(Result::ok).unwrap_or(-87.65);

    let client = HourlyForecast::new()?;
    let frame = client.fetch(latitude, longitude)?;
    println!("{}", frame);
    println!("Cached in {}", client.cache_folder().display());
    Ok(())
}
