use crate::error::Result;
use crate::wire::{decode_records, scalar_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label shown for a station that reports no catchment name.
pub const UNKNOWN_CATCHMENT: &str = "Unknown";

/// A monitoring site from `GET /get-stations`.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Stable, non-empty identifier, unique within one directory fetch
    pub station_id: String,
    /// River catchment the station sits in, if the server knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catchment_name: Option<String>,
}

/// Wire shape of one station record. Accepts both the camelCase names and
/// the snake_case names the telemetry server actually emits.
#[derive(Debug, Default, Deserialize)]
struct RawStation {
    #[serde(default, rename = "stationId", alias = "station_id")]
    station_id: Option<Value>,
    #[serde(default, rename = "catchmentName", alias = "catchment_name")]
    catchment_name: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct StationsEnvelope {
    #[serde(default)]
    stations: Option<Vec<Value>>,
}

impl TryFrom<RawStation> for Station {
    type Error = ();

    fn try_from(raw: RawStation) -> std::result::Result<Self, Self::Error> {
        let station_id = raw.station_id.as_ref().and_then(scalar_text).ok_or(())?;
        let catchment_name = raw.catchment_name.as_ref().and_then(scalar_text);
        Ok(Station {
            station_id,
            catchment_name,
        })
    }
}

impl Station {
    pub fn new(station_id: &str, catchment_name: Option<&str>) -> Self {
        Self {
            station_id: station_id.to_string(),
            catchment_name: catchment_name.map(str::to_string),
        }
    }

    pub fn id(&self) -> &str {
        &self.station_id
    }

    /// Catchment name, or "Unknown".
    pub fn display_name(&self) -> &str {
        self.catchment_name.as_deref().unwrap_or(UNKNOWN_CATCHMENT)
    }

    /// Directory entry text, e.g. "River Thames (1029TH)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name(), self.station_id)
    }

    /// Case-insensitive substring match on catchment name or station ID.
    ///
    /// `needle` must already be lowercase. A station without a catchment
    /// name can only match on its ID.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if self.station_id.to_lowercase().contains(needle) {
            return true;
        }
        self.catchment_name
            .as_ref()
            .is_some_and(|name| name.to_lowercase().contains(needle))
    }

    /// Decode a `GET /get-stations` body.
    ///
    /// A missing `stations` array is an empty directory. Malformed and
    /// duplicate records are dropped.
    pub fn parse_station_list(body: Value) -> Result<Vec<Station>> {
        let envelope: StationsEnvelope = serde_json::from_value(body)?;
        let items = envelope.stations.unwrap_or_default();
        Ok(decode_records::<RawStation, Station>(items, "station", Station::id))
    }
}
