//! Spot lookup against a Supabase (PostgREST) `spots` table.

use crate::spots::error::SpotLookupError;
use crate::spots::locator::{Spot, SpotLocator};
use crate::types::lat_lon::LatLon;
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SupabaseSpotLocator {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SpotRow {
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl From<SpotRow> for Spot {
    fn from(row: SpotRow) -> Self {
        let id = match row.id {
            Value::String(id) => id,
            other => other.to_string(),
        };
        let coordinate = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => Some(LatLon(lat, lon)),
            _ => None,
        };
        Spot {
            id,
            name: row.name.unwrap_or_default(),
            coordinate,
        }
    }
}

impl SupabaseSpotLocator {
    /// `base_url` is the project URL, e.g. `https://xyz.supabase.co`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

impl SpotLocator for SupabaseSpotLocator {
    async fn locate(&self, spot_id: &str) -> Result<Option<Spot>, SpotLookupError> {
        let url = format!("{}/rest/v1/spots", self.base_url);
        debug!("Looking up spot {} at {}", spot_id, url);

        let response = self
            .http
            .get(&url)
            .header("apikey", self.api_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .query(&[
                ("id", format!("eq.{spot_id}")),
                ("select", "id,name,latitude,longitude".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SpotLookupError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => SpotLookupError::HttpStatus {
                        url,
                        status,
                        source: e,
                    },
                    None => SpotLookupError::NetworkRequest(url, e),
                });
            }
        };

        let rows: Vec<SpotRow> = response
            .json()
            .await
            .map_err(|e| SpotLookupError::Decode(url, e))?;
        Ok(rows.into_iter().next().map(Spot::from))
    }
}
