//! Core types for the flood monitor dashboard.
//!
//! This crate provides:
//! - `station`, `measurement`, `reading`: the three wire tiers and their
//!   tolerant decoders
//! - `api`: the `TelemetryApi` trait the dashboard fetches through
//! - `client`: a reqwest implementation of `TelemetryApi` (feature `api`)
//! - `config`: API address and timeout

pub mod api;
#[cfg(feature = "api")]
pub mod client;
pub mod config;
pub mod error;
pub mod measurement;
pub mod reading;
pub mod station;
mod wire;

pub use error::{FetchError, Result};
