//! Readings tier: chart series and readings table for the active channel.
//!
//! A failed fetch here looks exactly like an empty payload (`NoData`); the
//! failure travels separately in [`TimeSeriesPanel::fetch_error`] so the rest
//! of the page keeps rendering.

use crate::tier::{Ticket, Tier};
use chrono::{DateTime, Utc};
use fm_core::error::{FetchError, Result};
use fm_core::reading::ReadingsPayload;
use fm_data::timeseries::{build_series, PipelineOptions, SeriesOutcome, TablePage, TimeSeries};
use fm_utils::paging::clamp_page;
use log::{info, warn};

pub const LOADING_MESSAGE: &str = "Loading data...";
pub const NO_DATA_MESSAGE: &str = "No chart data available.";

#[derive(Debug)]
pub struct TimeSeriesPanel {
    notation: Option<String>,
    tier: Tier<SeriesOutcome>,
    fetch_error: Option<FetchError>,
    /// 1-based readings-table page
    page: usize,
    page_size: usize,
}

impl Default for TimeSeriesPanel {
    fn default() -> Self {
        Self::new(PipelineOptions::default().table_page_size)
    }
}

impl TimeSeriesPanel {
    pub fn new(page_size: usize) -> Self {
        Self {
            notation: None,
            tier: Tier::Idle,
            fetch_error: None,
            page: 1,
            page_size,
        }
    }

    pub fn status(&self) -> &Tier<SeriesOutcome> {
        &self.tier
    }

    pub fn notation(&self) -> Option<&str> {
        self.notation.as_deref()
    }

    pub fn series(&self) -> Option<&TimeSeries> {
        self.tier.ready().and_then(SeriesOutcome::series)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self.tier, Tier::Ready(SeriesOutcome::NoData))
    }

    /// Set when the fetch behind a `NoData` status failed
    pub fn fetch_error(&self) -> Option<&FetchError> {
        self.fetch_error.as_ref()
    }

    pub fn table_page_number(&self) -> usize {
        self.page
    }

    /// Current page of the readings table, when there is a series.
    pub fn table(&self) -> Option<TablePage> {
        self.series()
            .map(|series| series.table_page(self.page, self.page_size))
    }

    pub fn set_table_page(&mut self, page: usize) {
        let rows = self.series().map_or(0, |s| s.real_points().len());
        self.page = clamp_page(page, rows, self.page_size);
    }

    pub fn next_table_page(&mut self) {
        self.set_table_page(self.page + 1);
    }

    pub fn previous_table_page(&mut self) {
        self.set_table_page(self.page.saturating_sub(1));
    }

    pub fn status_message(&self) -> Option<&'static str> {
        match &self.tier {
            Tier::Idle => None,
            Tier::Loading(_) => Some(LOADING_MESSAGE),
            Tier::Ready(SeriesOutcome::NoData) | Tier::Failed(_) => Some(NO_DATA_MESSAGE),
            Tier::Ready(SeriesOutcome::Series(_)) => None,
        }
    }

    pub(crate) fn is_awaiting(&self, ticket: Ticket, notation: &str) -> bool {
        self.tier.is_awaiting(ticket) && self.notation.as_deref() == Some(notation)
    }

    pub(crate) fn begin(&mut self, notation: &str, ticket: Ticket) {
        self.notation = Some(notation.to_string());
        self.tier = Tier::Loading(ticket);
        self.fetch_error = None;
        self.page = 1;
    }

    pub(crate) fn clear(&mut self) {
        self.notation = None;
        self.tier = Tier::Idle;
        self.fetch_error = None;
        self.page = 1;
    }

    /// Apply a completed fetch, running the pipeline with `now` as the
    /// anchor. Returns `false` if it is stale.
    pub(crate) fn finish(
        &mut self,
        ticket: Ticket,
        notation: &str,
        result: Result<ReadingsPayload>,
        now: DateTime<Utc>,
        options: &PipelineOptions,
    ) -> bool {
        if !self.is_awaiting(ticket, notation) {
            return false;
        }
        let outcome = match result {
            Ok(payload) => {
                self.fetch_error = None;
                build_series(payload.usable_readings(), now, options)
            }
            Err(e) => {
                warn!("Readings for {} failed to load: {}", notation, e);
                self.fetch_error = Some(e);
                SeriesOutcome::NoData
            }
        };
        match &outcome {
            SeriesOutcome::Series(series) => {
                info!("Charting {} readings for {}", series.real_points().len(), notation)
            }
            SeriesOutcome::NoData => info!("No chart data for {}", notation),
        }
        self.tier = Tier::Ready(outcome);
        self.page = 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TicketIssuer;
    use chrono::TimeZone;
    use fm_core::reading::Reading;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
    }

    fn payload(count: u32) -> ReadingsPayload {
        ReadingsPayload {
            has_data: true,
            readings: (0..count)
                .map(|m| Reading::new(at(9, m), Some(m as f64 + 0.12345)))
                .collect(),
        }
    }

    #[test]
    fn test_series_and_table() {
        let mut tickets = TicketIssuer::default();
        let mut panel = TimeSeriesPanel::default();
        let ticket = tickets.issue();
        panel.begin("E2043-level", ticket);
        assert_eq!(panel.status_message(), Some(LOADING_MESSAGE));
        assert!(panel.table().is_none());

        assert!(panel.finish(ticket, "E2043-level", Ok(payload(25)), at(10, 0), &PipelineOptions::default()));
        assert_eq!(panel.status_message(), None);
        let series = panel.series().unwrap();
        assert_eq!(series.chart_points().len(), 26);
        assert!(series.chart_points().last().unwrap().is_anchor());

        let table = panel.table().unwrap();
        assert_eq!(table.total_rows, 25);
        assert_eq!(table.total_pages, 3);
        assert_eq!(table.rows[1].value, 1.123);
        assert_eq!(series.chart_points()[1].value, Some(1.0 + 0.12345));

        panel.set_table_page(3);
        assert_eq!(panel.table().unwrap().rows.len(), 5);
        panel.next_table_page();
        assert_eq!(panel.table_page_number(), 3);
        panel.set_table_page(0);
        assert_eq!(panel.table_page_number(), 1);
    }

    #[test]
    fn test_empty_payload_is_no_data() {
        let mut tickets = TicketIssuer::default();
        let mut panel = TimeSeriesPanel::default();
        let ticket = tickets.issue();
        panel.begin("n", ticket);
        assert!(panel.finish(ticket, "n", Ok(payload(0)), at(10, 0), &PipelineOptions::default()));
        assert!(panel.is_no_data());
        assert!(panel.series().is_none());
        assert!(panel.table().is_none());
        assert!(panel.fetch_error().is_none());
        assert_eq!(panel.status_message(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_has_data_false_is_no_data() {
        let mut tickets = TicketIssuer::default();
        let mut panel = TimeSeriesPanel::default();
        let ticket = tickets.issue();
        panel.begin("n", ticket);
        let mut flagged = payload(3);
        flagged.has_data = false;
        assert!(panel.finish(ticket, "n", Ok(flagged), at(10, 0), &PipelineOptions::default()));
        assert!(panel.is_no_data());
    }

    #[test]
    fn test_failure_is_no_data_with_error_flag() {
        let mut tickets = TicketIssuer::default();
        let mut panel = TimeSeriesPanel::default();
        let ticket = tickets.issue();
        panel.begin("n", ticket);
        assert!(panel.finish(ticket, "n", Err(FetchError::Status(500)), at(10, 0), &PipelineOptions::default()));
        assert!(panel.is_no_data());
        assert_eq!(panel.fetch_error(), Some(&FetchError::Status(500)));
        assert_eq!(panel.status_message(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_stale_readings_are_discarded() {
        let mut tickets = TicketIssuer::default();
        let mut panel = TimeSeriesPanel::default();
        let old = tickets.issue();
        panel.begin("level", old);
        let current = tickets.issue();
        panel.begin("flow", current);
        assert!(!panel.finish(old, "level", Ok(payload(4)), at(10, 0), &PipelineOptions::default()));
        assert!(panel.status().is_loading());
        assert_eq!(panel.notation(), Some("flow"));
    }
}
