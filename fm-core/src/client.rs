//! HTTP implementation of [`TelemetryApi`] over reqwest.

use crate::api::{TelemetryApi, MEASUREMENTS_PATH, READINGS_PATH, STATIONS_PATH};
use crate::config::ApiConfig;
use crate::error::{FetchError, Result};
use crate::measurement::MeasurementChannel;
use crate::reading::ReadingsPayload;
use crate::station::Station;
use log::{debug, info, warn};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TelemetryClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl TelemetryClient {
    /// Build a client for `config.base_url`, with `config.timeout` applied to
    /// every request.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    /// The base address with `segments` appended, each one percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Request(e.to_string())
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl TelemetryApi for TelemetryClient {
    async fn get_stations(&self) -> Result<Vec<Station>> {
        let body = self.get_json(self.endpoint(&[STATIONS_PATH])?).await?;
        let stations = Station::parse_station_list(body)?;
        info!("Fetched {} stations", stations.len());
        Ok(stations)
    }

    async fn get_measurements(&self, station_id: &str) -> Result<Vec<MeasurementChannel>> {
        let body = self
            .get_json(self.endpoint(&[MEASUREMENTS_PATH, station_id])?)
            .await?;
        let channels = MeasurementChannel::parse_measurement_list(body)?;
        info!("Fetched {} measurements for {}", channels.len(), station_id);
        Ok(channels)
    }

    async fn get_readings(&self, notation: &str) -> Result<ReadingsPayload> {
        let body = self
            .get_json(self.endpoint(&[READINGS_PATH, notation])?)
            .await?;
        let payload = ReadingsPayload::parse_readings(body)?;
        info!("Fetched {} readings for {}", payload.readings.len(), notation);
        Ok(payload)
    }
}
