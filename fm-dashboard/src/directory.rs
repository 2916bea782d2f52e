//! Station directory tier: one fetch, then local search and paging.

use crate::tier::{Ticket, Tier};
use fm_core::error::Result;
use fm_core::station::Station;
use fm_data::directory::{filter_stations, STATION_PAGE_SIZE};
use fm_utils::paging::{clamp_page, paginate};
use log::{info, warn};

pub const LOADING_MESSAGE: &str = "Loading stations...";
pub const FAILED_MESSAGE: &str = "Failed to load stations. Please try again later.";
pub const EMPTY_MESSAGE: &str = "No stations found.";

#[derive(Debug)]
pub struct StationDirectory {
    tier: Tier<Vec<Station>>,
    filter: String,
    /// 1-based, always within the filtered page range
    page: usize,
    page_size: usize,
}

/// One page of the filtered directory.
#[derive(Debug, PartialEq)]
pub struct DirectoryView<'a> {
    pub stations: Vec<&'a Station>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl DirectoryView<'_> {
    pub fn has_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

impl Default for StationDirectory {
    fn default() -> Self {
        Self::new(STATION_PAGE_SIZE)
    }
}

impl StationDirectory {
    pub fn new(page_size: usize) -> Self {
        Self {
            tier: Tier::Idle,
            filter: String::new(),
            page: 1,
            page_size,
        }
    }

    pub fn status(&self) -> &Tier<Vec<Station>> {
        &self.tier
    }

    /// All loaded stations, unfiltered.
    pub fn stations(&self) -> &[Station] {
        self.tier.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn station(&self, station_id: &str) -> Option<&Station> {
        self.stations().iter().find(|s| s.station_id == station_id)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Change the search term. A different term always returns to page 1.
    pub fn set_filter(&mut self, term: &str) {
        if term != self.filter {
            self.filter = term.to_string();
            self.page = 1;
        }
    }

    /// Jump to `page`, clamped to the filtered range.
    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.filtered().len(), self.page_size);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    fn filtered(&self) -> Vec<&Station> {
        filter_stations(self.stations(), &self.filter)
    }

    pub fn view(&self) -> DirectoryView<'_> {
        let filtered = self.filtered();
        let window = paginate(&filtered, self.page, self.page_size);
        DirectoryView {
            stations: window.items.to_vec(),
            page: window.page,
            total_pages: window.total_pages,
            total_matches: window.total_items,
        }
    }

    /// Plain-language status, or `None` when there are stations to list.
    pub fn status_message(&self) -> Option<&'static str> {
        match &self.tier {
            Tier::Idle => None,
            Tier::Loading(_) => Some(LOADING_MESSAGE),
            Tier::Failed(_) => Some(FAILED_MESSAGE),
            Tier::Ready(_) if self.filtered().is_empty() => Some(EMPTY_MESSAGE),
            Tier::Ready(_) => None,
        }
    }

    /// Start the one directory fetch. Only from `Idle`, or from `Failed`
    /// when the operator retries.
    pub(crate) fn begin(&mut self, ticket: Ticket) -> bool {
        match self.tier {
            Tier::Idle | Tier::Failed(_) => {
                self.tier = Tier::Loading(ticket);
                true
            }
            Tier::Loading(_) | Tier::Ready(_) => false,
        }
    }

    /// Apply a completed fetch. Returns `false` if `ticket` is stale.
    pub(crate) fn finish(&mut self, ticket: Ticket, result: Result<Vec<Station>>) -> bool {
        if !self.tier.is_awaiting(ticket) {
            return false;
        }
        self.tier = match result {
            Ok(stations) => {
                info!("Loaded {} stations", stations.len());
                Tier::Ready(stations)
            }
            Err(e) => {
                warn!("Station directory failed to load: {}", e);
                Tier::Failed(e.to_string())
            }
        };
        self.page = 1;
        true
    }
}
