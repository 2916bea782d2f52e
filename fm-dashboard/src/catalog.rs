//! Measurement catalog tier: the channels of the selected station.

use crate::tier::{Ticket, Tier};
use fm_core::error::Result;
use fm_core::measurement::MeasurementChannel;
use log::{info, warn};

pub const LOADING_MESSAGE: &str = "Loading measurements...";
pub const FAILED_MESSAGE: &str = "Failed to load measurements. Please try again later.";
pub const EMPTY_MESSAGE: &str = "No measurements found.";

#[derive(Debug, Default)]
pub struct MeasurementCatalog {
    /// Station the current (or pending) channel list belongs to
    station_id: Option<String>,
    tier: Tier<Vec<MeasurementChannel>>,
}

impl MeasurementCatalog {
    pub fn status(&self) -> &Tier<Vec<MeasurementChannel>> {
        &self.tier
    }

    pub fn station_id(&self) -> Option<&str> {
        self.station_id.as_deref()
    }

    pub fn channels(&self) -> &[MeasurementChannel] {
        self.tier.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn channel(&self, notation: &str) -> Option<&MeasurementChannel> {
        self.channels().iter().find(|c| c.notation == notation)
    }

    /// The channel to open without being asked: the first one the server
    /// listed. Selecting it is deliberate policy, so a station always opens
    /// on a chart when it has any channel at all.
    pub fn default_channel(&self) -> Option<&MeasurementChannel> {
        self.channels().first()
    }

    /// Whether a channel toggle is worth showing.
    pub fn has_choices(&self) -> bool {
        self.channels().len() > 1
    }

    pub fn header(&self) -> Option<String> {
        self.station_id
            .as_ref()
            .map(|id| format!("Measurements for Station {}", id))
    }

    pub fn status_message(&self) -> Option<&'static str> {
        match &self.tier {
            Tier::Idle => None,
            Tier::Loading(_) => Some(LOADING_MESSAGE),
            Tier::Failed(_) => Some(FAILED_MESSAGE),
            Tier::Ready(channels) if channels.is_empty() => Some(EMPTY_MESSAGE),
            Tier::Ready(_) => None,
        }
    }

    /// Whether a completion for `ticket` and `station_id` is the one expected.
    pub(crate) fn is_awaiting(&self, ticket: Ticket, station_id: &str) -> bool {
        self.tier.is_awaiting(ticket) && self.station_id.as_deref() == Some(station_id)
    }

    /// Replace the catalog wholesale with a pending fetch for `station_id`.
    pub(crate) fn begin(&mut self, station_id: &str, ticket: Ticket) {
        self.station_id = Some(station_id.to_string());
        self.tier = Tier::Loading(ticket);
    }

    pub(crate) fn clear(&mut self) {
        self.station_id = None;
        self.tier = Tier::Idle;
    }

    /// Apply a completed fetch. Returns `false` if it is stale.
    pub(crate) fn finish(
        &mut self,
        ticket: Ticket,
        station_id: &str,
        result: Result<Vec<MeasurementChannel>>,
    ) -> bool {
        if !self.is_awaiting(ticket, station_id) {
            return false;
        }
        self.tier = match result {
            Ok(channels) => {
                info!("Loaded {} measurements for {}", channels.len(), station_id);
                Tier::Ready(channels)
            }
            Err(e) => {
                warn!("Measurements for {} failed to load: {}", station_id, e);
                Tier::Failed(e.to_string())
            }
        };
        true
    }
}
