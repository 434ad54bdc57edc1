use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Place name recorded when a lookup does not produce one.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Width of the `location_name` column.
pub const MAX_PLACE_LEN: usize = 200;

/// Upper bound on a single lookup, on top of the HTTP client's own timeout.
const LOOKUP_DEADLINE: Duration = Duration::from_secs(10);

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> anyhow::Result<String>;
}

/// Outcome of a best-effort reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceLookup {
    Resolved(String),
    Failed,
}

impl PlaceLookup {
    pub fn or_unknown(self) -> String {
        match self {
            PlaceLookup::Resolved(name) => name,
            PlaceLookup::Failed => UNKNOWN_LOCATION.to_string(),
        }
    }
}

/// Trimmed and cut to [`MAX_PLACE_LEN`] characters.
fn clip_place(name: &str) -> String {
    name.trim().chars().take(MAX_PLACE_LEN).collect()
}

/// Runs a reverse lookup and folds every failure mode (error, empty name,
/// deadline) into `PlaceLookup::Failed`. Long names are clipped to fit.
pub async fn lookup_place(geocoder: &dyn Geocoder, latitude: f64, longitude: f64) -> PlaceLookup {
    match tokio::time::timeout(LOOKUP_DEADLINE, geocoder.reverse_geocode(latitude, longitude)).await
    {
        Ok(Ok(name)) if !name.trim().is_empty() => {
            debug!(latitude, longitude, place = %name, "reverse geocode resolved");
            PlaceLookup::Resolved(clip_place(&name))
        }
        Ok(Ok(_)) => {
            warn!(latitude, longitude, "reverse geocode returned an empty name");
            PlaceLookup::Failed
        }
        Ok(Err(e)) => {
            warn!(error = %e, latitude, longitude, "reverse geocode failed");
            PlaceLookup::Failed
        }
        Err(_) => {
            warn!(latitude, longitude, "reverse geocode timed out");
            PlaceLookup::Failed
        }
    }
}

/// OpenStreetMap Nominatim `/reverse` client.
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("build geocoder http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> anyhow::Result<String> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await
            .context("nominatim reverse request")?
            .error_for_status()
            .context("nominatim reverse status")?;

        let body: ReverseResponse = response
            .json()
            .await
            .context("nominatim reverse body")?;

        if let Some(err) = body.error {
            anyhow::bail!("nominatim: {}", err);
        }
        body.display_name
            .ok_or_else(|| anyhow::anyhow!("nominatim: no display_name"))
    }
}

/// Used when no geocoder URL is configured.
#[derive(Clone, Copy)]
pub struct DisabledGeocoder;

#[async_trait]
impl Geocoder for DisabledGeocoder {
    async fn reverse_geocode(&self, _latitude: f64, _longitude: f64) -> anyhow::Result<String> {
        anyhow::bail!("geocoding disabled")
    }
}
