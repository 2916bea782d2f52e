//! Raw readings to a chart series and a readings table.
//!
//! [`build_series`] runs the whole pipeline:
//! 1. drop readings with no timestamp or no value
//! 2. label each survivor with a fixed "HH:MM" time
//! 3. sort ascending by timestamp (input order is not trusted)
//! 4. append an anchor point at "now" with no value, which pins the chart's
//!    time axis to the present even when the feed lags
//!
//! If nothing survives step 1, the result is [`SeriesOutcome::NoData`] rather
//! than a series holding only the anchor.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use fm_core::reading::Reading;
use fm_utils::dates::{caption_date, time_label};
use fm_utils::paging::paginate;
use log::debug;
use serde::Serialize;

/// Rows per readings-table page.
pub const TABLE_PAGE_SIZE: usize = 10;

/// Display precision of table values.
pub const DISPLAY_DECIMALS: i32 = 3;

/// One point of the chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPoint {
    #[serde(rename = "dateTime")]
    pub timestamp: DateTime<Utc>,
    pub time_label: String,
    /// `None` only on the anchor point
    pub value: Option<f64>,
}

impl NormalizedPoint {
    pub fn is_anchor(&self) -> bool {
        self.value.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Offset that labels and captions are rendered in
    pub display_offset: FixedOffset,
    pub table_page_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            display_offset: Utc.fix(),
            table_page_size: TABLE_PAGE_SIZE,
        }
    }
}

/// A table row: a real reading rounded for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub timestamp: DateTime<Utc>,
    pub time_label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

/// A non-empty, sorted series whose last point is the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    points: Vec<NormalizedPoint>,
    caption: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    NoData,
    Series(TimeSeries),
}

impl SeriesOutcome {
    pub fn series(&self) -> Option<&TimeSeries> {
        match self {
            SeriesOutcome::Series(series) => Some(series),
            SeriesOutcome::NoData => None,
        }
    }
}

/// Round to [`DISPLAY_DECIMALS`] places. Never returns `-0.0`.
pub fn round_for_display(value: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Run the normalization pipeline over `readings` with `now` as the anchor.
pub fn build_series(readings: &[Reading], now: DateTime<Utc>, options: &PipelineOptions) -> SeriesOutcome {
    let offset = &options.display_offset;
    let mut points: Vec<NormalizedPoint> = readings
        .iter()
        .filter_map(|reading| match (reading.timestamp, reading.value) {
            (Some(timestamp), Some(value)) => Some(NormalizedPoint {
                timestamp,
                time_label: time_label(&timestamp, offset),
                value: Some(value),
            }),
            _ => None,
        })
        .collect();
    let dropped = readings.len() - points.len();
    if dropped > 0 {
        debug!("Dropped {} of {} readings with no timestamp or value", dropped, readings.len());
    }
    if points.is_empty() {
        return SeriesOutcome::NoData;
    }
    points.sort_by_key(|point| point.timestamp);

    let latest = points[points.len() - 1].timestamp;
    let caption = caption_date(&latest, offset);
    // A lagging local clock must not put the anchor before the data.
    let anchor_at = now.max(latest);
    points.push(NormalizedPoint {
        timestamp: anchor_at,
        time_label: time_label(&anchor_at, offset),
        value: None,
    });
    SeriesOutcome::Series(TimeSeries { points, caption })
}

impl TimeSeries {
    /// Every point the chart draws, anchor included.
    pub fn chart_points(&self) -> &[NormalizedPoint] {
        &self.points
    }

    /// The real readings, without the anchor.
    pub fn real_points(&self) -> &[NormalizedPoint] {
        &self.points[..self.points.len() - 1]
    }

    pub fn anchor(&self) -> &NormalizedPoint {
        &self.points[self.points.len() - 1]
    }

    /// Most recent real reading.
    pub fn latest(&self) -> &NormalizedPoint {
        &self.points[self.points.len() - 2]
    }

    /// Calendar date of the latest real reading, e.g. "Wed, 01 May 2024".
    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn title(&self) -> String {
        format!("Data for the past 24 hours ({})", self.caption)
    }

    /// The chart series as JSON for an external chart widget. The anchor
    /// serializes with `"value": null`.
    pub fn chart_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.points)
    }

    /// Page `page` (1-based, clamped) of the readings table.
    pub fn table_page(&self, page: usize, page_size: usize) -> TablePage {
        let window = paginate(self.real_points(), page, page_size);
        let rows = window
            .items
            .iter()
            .filter_map(|point| {
                point.value.map(|value| TableRow {
                    timestamp: point.timestamp,
                    time_label: point.time_label.clone(),
                    value: round_for_display(value),
                })
            })
            .collect();
        TablePage {
            rows,
            page: window.page,
            total_pages: window.total_pages,
            total_rows: window.total_items,
        }
    }
}
