use crate::error::Result;
use crate::wire::{decode_records, scalar_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One sensor stream at a station, from `GET /get-measurement/{stationId}`.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementChannel {
    /// e.g. "Water Level"
    pub parameter_name: String,
    /// e.g. "Stage", "Downstream Stage"
    pub qualifier: String,
    /// Unique key of the channel within its station
    pub notation: String,
    pub has_data: bool,
}

#[derive(Debug, Deserialize)]
struct RawMeasurement {
    #[serde(default, rename = "parameterName", alias = "parameter_name")]
    parameter_name: Option<Value>,
    #[serde(default)]
    qualifier: Option<Value>,
    #[serde(default)]
    notation: Option<Value>,
    #[serde(default, rename = "hasData", alias = "has_data")]
    has_data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MeasurementsEnvelope {
    #[serde(default)]
    measurements: Option<Vec<Value>>,
}

impl TryFrom<RawMeasurement> for MeasurementChannel {
    type Error = ();

    fn try_from(raw: RawMeasurement) -> std::result::Result<Self, Self::Error> {
        let notation = raw.notation.as_ref().and_then(scalar_text).ok_or(())?;
        Ok(MeasurementChannel {
            parameter_name: raw
                .parameter_name
                .as_ref()
                .and_then(scalar_text)
                .unwrap_or_default(),
            qualifier: raw.qualifier.as_ref().and_then(scalar_text).unwrap_or_default(),
            notation,
            has_data: raw.has_data.as_ref().and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

impl MeasurementChannel {
    pub fn new(parameter_name: &str, qualifier: &str, notation: &str, has_data: bool) -> Self {
        Self {
            parameter_name: parameter_name.to_string(),
            qualifier: qualifier.to_string(),
            notation: notation.to_string(),
            has_data,
        }
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// Toggle button text, e.g. "Water Level (Stage)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.parameter_name, self.qualifier)
    }

    /// Decode a `GET /get-measurement/{stationId}` body, keeping server order.
    pub fn parse_measurement_list(body: Value) -> Result<Vec<MeasurementChannel>> {
        let envelope: MeasurementsEnvelope = serde_json::from_value(body)?;
        let items = envelope.measurements.unwrap_or_default();
        Ok(decode_records::<RawMeasurement, MeasurementChannel>(
            items,
            "measurement",
            MeasurementChannel::notation,
        ))
    }
}
