use crate::error::Result;
use chrono::{DateTime, Utc};
use fm_utils::dates::parse_instant;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

/// One raw observation from `GET /get-particular-M/{notation}`.
///
/// Both fields are optional here: the feed is not trusted, and the time-series
/// pipeline is what decides a reading is unusable.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Reading {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: Option<f64>,
}

/// A decoded readings envelope.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ReadingsPayload {
    pub has_data: bool,
    pub readings: Vec<Reading>,
}

#[derive(Debug, Deserialize)]
struct RawReading {
    #[serde(default, rename = "dateTime", alias = "date_time")]
    date_time: Option<Value>,
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ReadingsEnvelope {
    #[serde(default, rename = "hasData", alias = "has_data")]
    has_data: Option<bool>,
    #[serde(default)]
    readings: Option<Vec<Value>>,
}

impl From<RawReading> for Reading {
    fn from(raw: RawReading) -> Self {
        let timestamp = match raw.date_time {
            Some(Value::String(s)) => parse_instant(&s).ok(),
            _ => None,
        };
        Reading {
            timestamp,
            value: raw.value.as_ref().and_then(parse_value),
        }
    }
}

/// A reading value: a JSON number, or a string holding one.
fn parse_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: Option<f64>) -> Self {
        Self {
            timestamp: Some(timestamp),
            value,
        }
    }
}

impl ReadingsPayload {
    /// The readings to chart. A payload flagged `hasData: false` has none,
    /// whatever its array holds.
    pub fn usable_readings(&self) -> &[Reading] {
        if self.has_data {
            &self.readings
        } else {
            &[]
        }
    }

    /// Decode a `GET /get-particular-M/{notation}` body.
    pub fn parse_readings(body: Value) -> Result<ReadingsPayload> {
        let envelope: ReadingsEnvelope = serde_json::from_value(body)?;
        let items = envelope.readings.unwrap_or_default();
        let mut readings = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<RawReading>(item) {
                Ok(raw) => readings.push(Reading::from(raw)),
                Err(_) => debug!("Dropping malformed reading at index {}", index),
            }
        }
        Ok(ReadingsPayload {
            has_data: envelope.has_data.unwrap_or(false),
            readings,
        })
    }
}
