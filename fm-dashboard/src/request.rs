//! Fetches the dashboard asks for, and what comes back.

use crate::tier::{Ticket, TierKind};
use fm_core::error::{FetchError, Result};
use fm_core::measurement::MeasurementChannel;
use fm_core::reading::ReadingsPayload;
use fm_core::station::Station;

/// What to fetch. The key is the selection that was active when the request
/// was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    Stations,
    Measurements { station_id: String },
    Readings { notation: String },
}

impl FetchKind {
    pub fn tier(&self) -> TierKind {
        match self {
            FetchKind::Stations => TierKind::Stations,
            FetchKind::Measurements { .. } => TierKind::Measurements,
            FetchKind::Readings { .. } => TierKind::Readings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub kind: FetchKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Stations(Result<Vec<Station>>),
    Measurements(Result<Vec<MeasurementChannel>>),
    Readings(Result<ReadingsPayload>),
}

impl FetchOutcome {
    /// The outcome of a `kind` fetch that failed with `error`.
    pub fn failed(kind: &FetchKind, error: FetchError) -> Self {
        match kind {
            FetchKind::Stations => FetchOutcome::Stations(Err(error)),
            FetchKind::Measurements { .. } => FetchOutcome::Measurements(Err(error)),
            FetchKind::Readings { .. } => FetchOutcome::Readings(Err(error)),
        }
    }

    pub fn tier(&self) -> TierKind {
        match self {
            FetchOutcome::Stations(_) => TierKind::Stations,
            FetchOutcome::Measurements(_) => TierKind::Measurements,
            FetchOutcome::Readings(_) => TierKind::Readings,
        }
    }
}
