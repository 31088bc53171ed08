//! Fire-and-forget address geocoding.
//!
//! Writing a customer address schedules a lookup against a Nominatim-style
//! endpoint. The spawned task runs after the request completes; failures are
//! logged and swallowed, and the customer simply keeps NULL coordinates.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use crate::{
    config::GeocodingConfig,
    db::handlers::Customers,
    types::{abbrev_uuid, CustomerId},
};

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    lat: String,
    lon: String,
}

/// Parse the first result of a geocoder response into coordinates.
fn parse_coordinates(results: &[GeocodeResult]) -> Option<(f64, f64)> {
    let first = results.first()?;
    let latitude = first.lat.parse::<f64>().ok()?;
    let longitude = first.lon.parse::<f64>().ok()?;
    Some((latitude, longitude))
}

/// Schedule a background geocode for one customer address.
///
/// Returns immediately; the write happens in a detached task.
pub fn spawn_geocode(pool: PgPool, config: GeocodingConfig, customer_id: CustomerId, address: String) {
    if !config.enabled {
        return;
    }

    tokio::spawn(async move {
        if let Err(e) = geocode_customer(&pool, &config, customer_id, &address).await {
            warn!(customer_id = %abbrev_uuid(&customer_id), "geocoding failed: {e}");
        }
    });
}

#[instrument(skip(pool, config, address), fields(customer_id = %abbrev_uuid(&customer_id)))]
async fn geocode_customer(pool: &PgPool, config: &GeocodingConfig, customer_id: CustomerId, address: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/search", config.base_url))
        .query(&[("q", address), ("format", "json"), ("limit", "1")])
        .header("User-Agent", "fieldctl")
        .send()
        .await?
        .error_for_status()?;

    let results: Vec<GeocodeResult> = response.json().await?;
    let Some((latitude, longitude)) = parse_coordinates(&results) else {
        debug!("no geocoder match for address");
        return Ok(());
    };

    let mut conn = pool.acquire().await?;
    Customers::new(&mut conn).set_coordinates(customer_id, latitude, longitude).await?;
    debug!("stamped coordinates ({latitude}, {longitude})");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinates() {
        let results = vec![GeocodeResult {
            lat: "51.5074".to_string(),
            lon: "-0.1278".to_string(),
        }];

        let (lat, lon) = parse_coordinates(&results).unwrap();
        assert!((lat - 51.5074).abs() < f64::EPSILON);
        assert!((lon - -0.1278).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_coordinates_empty_response() {
        assert!(parse_coordinates(&[]).is_none());
    }

    #[test]
    fn test_parse_coordinates_garbage_values() {
        let results = vec![GeocodeResult {
            lat: "not-a-number".to_string(),
            lon: "-0.1278".to_string(),
        }];

        assert!(parse_coordinates(&results).is_none());
    }
}
