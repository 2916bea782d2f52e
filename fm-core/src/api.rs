//! The telemetry API as the dashboard sees it.

use crate::error::Result;
use crate::measurement::MeasurementChannel;
use crate::reading::ReadingsPayload;
use crate::station::Station;
use std::future::Future;

/// Endpoint path for the station directory.
pub const STATIONS_PATH: &str = "get-stations";
/// Endpoint path prefix for a station's measurement channels.
pub const MEASUREMENTS_PATH: &str = "get-measurement";
/// Endpoint path prefix for a channel's readings.
pub const READINGS_PATH: &str = "get-particular-M";

/// Source of the three data tiers.
///
/// Implemented over HTTP by `client::TelemetryClient`; tests substitute an
/// in-memory source.
pub trait TelemetryApi {
    /// `GET /get-stations`
    fn get_stations(&self) -> impl Future<Output = Result<Vec<Station>>> + Send;

    /// `GET /get-measurement/{stationId}`
    fn get_measurements(
        &self,
        station_id: &str,
    ) -> impl Future<Output = Result<Vec<MeasurementChannel>>> + Send;

    /// `GET /get-particular-M/{notation}`
    fn get_readings(&self, notation: &str) -> impl Future<Output = Result<ReadingsPayload>> + Send;
}
