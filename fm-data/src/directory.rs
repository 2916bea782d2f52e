//! Client-side search over the station directory.

use fm_core::station::Station;

/// Stations shown per directory page.
pub const STATION_PAGE_SIZE: usize = 8;

/// Stations whose catchment name or ID contains `term`, ignoring case, in
/// directory order. An empty term keeps everything.
pub fn filter_stations<'a>(stations: &'a [Station], term: &str) -> Vec<&'a Station> {
    let needle = term.to_lowercase();
    stations
        .iter()
        .filter(|station| station.matches_lowercase(&needle))
        .collect()
}
