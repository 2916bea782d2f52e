//! The synchronous dashboard core.
//!
//! `Dashboard` owns the navigation state and all three tiers. It performs no
//! I/O. Operations return the [`FetchRequest`]s they need, and results come
//! back through [`Dashboard::complete`], which may ask for more: a loaded
//! catalog leads to the readings of its default channel.
//!
//! Every request carries a fresh [`Ticket`](crate::tier::Ticket), and each tier
//! remembers the ticket and key it is waiting on. A completion that doesn't
//! match both (the user moved on before it arrived) is dropped.

use crate::catalog::MeasurementCatalog;
use crate::directory::StationDirectory;
use crate::navigation::{NavigationController, SelectionState};
use crate::request::{FetchKind, FetchOutcome, FetchRequest};
use crate::series::TimeSeriesPanel;
use crate::sink::ErrorSink;
use crate::tier::{TicketIssuer, TierKind};
use fm_core::error::Result;
use fm_data::clock::{Clock, SystemClock};
use fm_data::directory::STATION_PAGE_SIZE;
use fm_data::timeseries::PipelineOptions;
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardOptions {
    pub station_page_size: usize,
    pub pipeline: PipelineOptions,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            station_page_size: STATION_PAGE_SIZE,
            pipeline: PipelineOptions::default(),
        }
    }
}

/// What to render, chosen by the selection state.
pub enum Screen<'a> {
    Stations(&'a StationDirectory),
    Station {
        station_id: &'a str,
        display_name: &'a str,
        catalog: &'a MeasurementCatalog,
        /// Idle until a channel is selected
        series: &'a TimeSeriesPanel,
    },
}

pub struct Dashboard<C = SystemClock> {
    navigation: NavigationController,
    directory: StationDirectory,
    catalog: MeasurementCatalog,
    series: TimeSeriesPanel,
    clock: C,
    options: DashboardOptions,
    tickets: TicketIssuer,
    sink: Option<Box<dyn ErrorSink>>,
}

impl Dashboard<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Dashboard<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Dashboard<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_options(clock, DashboardOptions::default())
    }

    pub fn with_options(clock: C, options: DashboardOptions) -> Self {
        Self {
            navigation: NavigationController::new(),
            directory: StationDirectory::new(options.station_page_size),
            catalog: MeasurementCatalog::default(),
            series: TimeSeriesPanel::new(options.pipeline.table_page_size),
            clock,
            options,
            tickets: TicketIssuer::default(),
            sink: None,
        }
    }

    /// Report every failed fetch to `sink`.
    pub fn with_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn selection(&self) -> &SelectionState {
        self.navigation.state()
    }

    pub fn directory(&self) -> &StationDirectory {
        &self.directory
    }

    /// For the search box and page buttons.
    pub fn directory_mut(&mut self) -> &mut StationDirectory {
        &mut self.directory
    }

    pub fn catalog(&self) -> &MeasurementCatalog {
        &self.catalog
    }

    pub fn series(&self) -> &TimeSeriesPanel {
        &self.series
    }

    /// For the readings-table page buttons.
    pub fn series_mut(&mut self) -> &mut TimeSeriesPanel {
        &mut self.series
    }

    pub fn screen(&self) -> Screen<'_> {
        match (self.navigation.station_id(), self.navigation.display_name()) {
            (Some(station_id), Some(display_name)) => Screen::Station {
                station_id,
                display_name,
                catalog: &self.catalog,
                series: &self.series,
            },
            _ => Screen::Stations(&self.directory),
        }
    }

    /// Activate the station directory: its one fetch, if not already issued.
    pub fn start(&mut self) -> Vec<FetchRequest> {
        if !self.directory.status().is_idle() {
            return Vec::new();
        }
        self.begin_directory()
    }

    /// Operator-initiated reload after the directory failed.
    pub fn retry_stations(&mut self) -> Vec<FetchRequest> {
        if !self.directory.status().is_failed() {
            return Vec::new();
        }
        self.begin_directory()
    }

    fn begin_directory(&mut self) -> Vec<FetchRequest> {
        let ticket = self.tickets.issue();
        if !self.directory.begin(ticket) {
            return Vec::new();
        }
        info!("Loading station directory");
        vec![FetchRequest {
            ticket,
            kind: FetchKind::Stations,
        }]
    }

    /// Drill into a station. Selecting the station that is already open
    /// does nothing; any other station replaces the catalog and chart.
    pub fn select_station(&mut self, station_id: &str, display_name: &str) -> Vec<FetchRequest> {
        let station_id = station_id.trim();
        let transition = self.navigation.select_station(station_id, display_name);
        if !transition.changed() {
            debug!("Station {} not reloaded ({:?})", station_id, transition);
            return Vec::new();
        }
        self.series.clear();
        let ticket = self.tickets.issue();
        self.catalog.begin(station_id, ticket);
        info!("Loading measurements for {}", station_id);
        vec![FetchRequest {
            ticket,
            kind: FetchKind::Measurements {
                station_id: station_id.to_string(),
            },
        }]
    }

    /// [`select_station`](Self::select_station) for a station in the loaded
    /// directory, named by its catalog entry.
    pub fn select_listed_station(&mut self, station_id: &str) -> Vec<FetchRequest> {
        let display_name = match self.directory.station(station_id) {
            Some(station) => station.display_name().to_string(),
            None => {
                debug!("Station {} is not in the directory", station_id);
                return Vec::new();
            }
        };
        self.select_station(station_id, &display_name)
    }

    /// Switch the chart to another channel of the open station.
    pub fn select_channel(&mut self, notation: &str) -> Vec<FetchRequest> {
        if self.catalog.channel(notation).is_none() {
            debug!("Channel {} is not in the current catalog", notation);
            return Vec::new();
        }
        self.activate_channel(notation)
    }

    fn activate_channel(&mut self, notation: &str) -> Vec<FetchRequest> {
        if !self.navigation.select_channel(notation).changed() {
            return Vec::new();
        }
        let ticket = self.tickets.issue();
        self.series.begin(notation, ticket);
        info!("Loading readings for {}", notation);
        vec![FetchRequest {
            ticket,
            kind: FetchKind::Readings {
                notation: notation.to_string(),
            },
        }]
    }

    /// Back to the station list. In-flight catalog and readings fetches
    /// become stale.
    pub fn reset(&mut self) {
        self.navigation.reset();
        self.catalog.clear();
        self.series.clear();
    }

    /// Apply the outcome of `request`, returning any follow-up requests.
    pub fn complete(&mut self, request: FetchRequest, outcome: FetchOutcome) -> Vec<FetchRequest> {
        let FetchRequest { ticket, kind } = request;
        match (kind, outcome) {
            (FetchKind::Stations, FetchOutcome::Stations(result)) => {
                self.report(TierKind::Stations, &result);
                if !self.directory.finish(ticket, result) {
                    debug!("Discarding stale station list {}", ticket);
                }
                Vec::new()
            }
            (FetchKind::Measurements { station_id }, FetchOutcome::Measurements(result)) => {
                self.report(TierKind::Measurements, &result);
                if !self.catalog.finish(ticket, &station_id, result) {
                    debug!("Discarding stale measurements for {} {}", station_id, ticket);
                    return Vec::new();
                }
                let default_notation = self
                    .catalog
                    .default_channel()
                    .map(|channel| channel.notation.clone());
                match default_notation {
                    Some(notation) => self.activate_channel(&notation),
                    None => Vec::new(),
                }
            }
            (FetchKind::Readings { notation }, FetchOutcome::Readings(result)) => {
                self.report(TierKind::Readings, &result);
                let now = self.clock.now();
                if !self
                    .series
                    .finish(ticket, &notation, result, now, &self.options.pipeline)
                {
                    debug!("Discarding stale readings for {} {}", notation, ticket);
                }
                Vec::new()
            }
            (kind, outcome) => {
                warn!(
                    "Ignoring {} outcome for {} request {}",
                    outcome.tier(),
                    kind.tier(),
                    ticket
                );
                Vec::new()
            }
        }
    }

    fn report<T>(&self, tier: TierKind, result: &Result<T>) {
        if let (Err(error), Some(sink)) = (result, &self.sink) {
            sink.report(tier, error);
        }
    }
}
