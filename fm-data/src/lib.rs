//! Data processing for the flood monitor.
//!
//! This crate turns decoded telemetry into forms suitable for charting and
//! listing. Nothing in here performs I/O; "now" comes from an injected
//! [`clock::Clock`].

pub mod clock;
pub mod directory;
pub mod timeseries;
