use surfcast::{ForecastConfig, ForecastService, LatLon, Spot, StaticSpotLocator, SurfcastError};
use std::env;

#[tokio::main]
async fn main() -> Result<(), SurfcastError> {
    // Picks up STORMGLASS_KEY from a local .env if there is one.
    dotenvy::dotenv().ok();

    let spots = vec![
        Spot::new("1", "La Gravière", LatLon(43.664, -1.448)),
        Spot::new("16", "Côte des Basques", LatLon(43.476, -1.568)),
        Spot::new("29", "Lacanau Océan", LatLon(45.002, -1.197)),
        Spot::new("36", "La Torche", LatLon(47.842, -4.348)),
    ];
    let locator: StaticSpotLocator = spots.iter().cloned().collect();

    let service = ForecastService::builder()
        .locator(locator)
        .config(ForecastConfig::from_env()?)
        .build();

    let spot_id = env::args().nth(1).unwrap_or_else(|| "1".to_string());
    let response = service.forecast_for_spot(&spot_id).await?;
    let first_hours = &response.forecast.data[..response.forecast.data.len().min(6)];

    println!(
        "{} ({} hours, mock: {}, limit reached: {})",
        response.spot_name,
        response.forecast.data.len(),
        response.forecast.mock,
        response.forecast.limit_reached
    );
    for sample in first_hours {
        println!(
            "{}  waves {:?} m @ {:?} s  wind {:?} m/s",
            sample.time, sample.wave_height, sample.wave_period, sample.wind_speed
        );
    }

    let summary = service.refresh_spots().spots(&spots).call().await;
    println!("{:#?}", summary);
    println!("{:#?}", service.stats().await);

    Ok(())
}
