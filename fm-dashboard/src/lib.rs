//! Dashboard state for the flood monitor.
//!
//! This crate provides:
//! - `navigation`: the station → channel drill-down as a single sum type
//! - `directory`, `catalog`, `series`: per-tier state, each a tagged
//!   `Idle | Loading | Ready | Failed` variant
//! - `dashboard`: the synchronous core that hands out fetch requests and
//!   applies their completions, discarding stale ones by ticket
//! - `runtime`: executes those requests against a `TelemetryApi` on tokio
//! - `sink`: where fetch failures are reported

pub mod catalog;
pub mod dashboard;
pub mod directory;
pub mod navigation;
pub mod request;
pub mod runtime;
pub mod series;
pub mod sink;
pub mod tier;

pub use dashboard::{Dashboard, DashboardOptions, Screen};
pub use navigation::{NavigationController, SelectionState, Transition};
pub use request::{FetchKind, FetchOutcome, FetchRequest};
pub use runtime::DashboardRuntime;
pub use tier::{Ticket, Tier, TierKind};
