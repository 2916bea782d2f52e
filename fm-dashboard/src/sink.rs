//! Where fetch failures are reported for observability.

use crate::tier::TierKind;
use fm_core::error::FetchError;
use log::warn;

/// Receives every failed fetch. Reporting never feeds back into dashboard
/// state.
pub trait ErrorSink {
    fn report(&self, tier: TierKind, error: &FetchError);
}

/// Forwards failures to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, tier: TierKind, error: &FetchError) {
        warn!("{} fetch failed: {}", tier, error);
    }
}
