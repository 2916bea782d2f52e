//! Runs dashboard fetch requests on tokio.
//!
//! Each request is spawned onto a `JoinSet` and raced against the configured
//! timeout. Completed fetches are fed back to the `Dashboard` one at a time,
//! so state is only ever touched from the caller's task. A task that panics
//! or is cancelled comes back as a failed fetch for its request.

use crate::dashboard::Dashboard;
use crate::request::{FetchKind, FetchOutcome, FetchRequest};
use fm_core::api::TelemetryApi;
use fm_core::config::ApiConfig;
use fm_core::error::{FetchError, Result};
use fm_data::clock::Clock;
use log::{debug, error, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{Id, JoinError, JoinSet};

pub struct DashboardRuntime<A> {
    api: Arc<A>,
    timeout: Duration,
    inflight: JoinSet<FetchOutcome>,
    /// The request behind each spawned task
    pending: HashMap<Id, FetchRequest>,
}

impl<A> DashboardRuntime<A>
where
    A: TelemetryApi + Send + Sync + 'static,
{
    pub fn new(api: A, timeout: Duration) -> Self {
        Self {
            api: Arc::new(api),
            timeout,
            inflight: JoinSet::new(),
            pending: HashMap::new(),
        }
    }

    pub fn from_config(api: A, config: &ApiConfig) -> Self {
        Self::new(api, config.timeout)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Number of fetches spawned and not yet applied.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    pub fn submit(&mut self, requests: Vec<FetchRequest>) {
        for request in requests {
            debug!("Spawning {:?} {}", request.kind, request.ticket);
            let api = Arc::clone(&self.api);
            let limit = self.timeout;
            let kind = request.kind.clone();
            let handle = self
                .inflight
                .spawn(async move { fetch(api.as_ref(), &kind, limit).await });
            self.pending.insert(handle.id(), request);
        }
    }

    /// Wait for the next fetch to finish and apply it, spawning whatever it
    /// leads to. Returns `false` once nothing is in flight.
    pub async fn next<C: Clock>(&mut self, dashboard: &mut Dashboard<C>) -> bool {
        let (id, outcome) = match self.inflight.join_next_with_id().await {
            None => return false,
            Some(Ok((id, outcome))) => (id, Ok(outcome)),
            Some(Err(e)) => (e.id(), Err(e)),
        };
        let Some(request) = self.pending.remove(&id) else {
            error!("Finished fetch task {} has no request", id);
            return true;
        };
        let outcome = outcome.unwrap_or_else(|e| task_failure(&request, e));
        let follow_up = dashboard.complete(request, outcome);
        self.submit(follow_up);
        true
    }

    /// Apply fetches until none are left, including follow-ups.
    pub async fn settle<C: Clock>(&mut self, dashboard: &mut Dashboard<C>) {
        while self.next(dashboard).await {}
    }
}

fn task_failure(request: &FetchRequest, e: JoinError) -> FetchOutcome {
    error!("Fetch task for {:?} {} did not complete: {}", request.kind, request.ticket, e);
    FetchOutcome::failed(&request.kind, FetchError::Request(e.to_string()))
}

async fn fetch<A: TelemetryApi>(api: &A, kind: &FetchKind, limit: Duration) -> FetchOutcome {
    match kind {
        FetchKind::Stations => FetchOutcome::Stations(within(limit, api.get_stations()).await),
        FetchKind::Measurements { station_id } => {
            FetchOutcome::Measurements(within(limit, api.get_measurements(station_id)).await)
        }
        FetchKind::Readings { notation } => {
            FetchOutcome::Readings(within(limit, api.get_readings(notation)).await)
        }
    }
}

async fn within<T>(limit: Duration, request: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result,
        Err(_) => {
            warn!("No response after {:?}", limit);
            Err(FetchError::Timeout(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::directory;
    use crate::navigation::SelectionState;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use fm_core::measurement::MeasurementChannel;
    use fm_core::reading::{Reading, ReadingsPayload};
    use fm_core::station::Station;
    use fm_data::clock::FixedClock;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::time::sleep;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    /// In-memory API with per-call latency, recording every call it serves.
    #[derive(Default)]
    struct FakeApi {
        delays: HashMap<String, Duration>,
        /// Calls that panic instead of answering
        panics: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn with_delay(mut self, call: &str, delay: Duration) -> Self {
            self.delays.insert(call.to_string(), delay);
            self
        }

        fn with_panic(mut self, call: &str) -> Self {
            self.panics.push(call.to_string());
            self
        }

        fn record(&self, call: String) -> Duration {
            let delay = self
                .delays
                .get(&call)
                .copied()
                .unwrap_or(Duration::from_millis(20));
            let panics = self.panics.contains(&call);
            self.calls.lock().unwrap().push(call);
            if panics {
                panic!("fake api failure");
            }
            delay
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TelemetryApi for FakeApi {
        async fn get_stations(&self) -> Result<Vec<Station>> {
            sleep(self.record("stations".to_string())).await;
            Ok(vec![
                Station::new("A", Some("Avon")),
                Station::new("B", Some("Trent")),
            ])
        }

        async fn get_measurements(&self, station_id: &str) -> Result<Vec<MeasurementChannel>> {
            sleep(self.record(format!("measurements/{}", station_id))).await;
            Ok(vec![
                MeasurementChannel::new("Water Level", "Stage", &format!("{}-level", station_id), true),
                MeasurementChannel::new("Flow", "", &format!("{}-flow", station_id), true),
            ])
        }

        async fn get_readings(&self, notation: &str) -> Result<ReadingsPayload> {
            sleep(self.record(format!("readings/{}", notation))).await;
            Ok(ReadingsPayload {
                has_data: true,
                readings: (1..=3)
                    .map(|h| Reading::new(now() - ChronoDuration::hours(h), Some(h as f64)))
                    .collect(),
            })
        }
    }

    fn dashboard() -> Dashboard<FixedClock> {
        Dashboard::with_clock(FixedClock(now()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_drill_down_end_to_end() {
        let mut dash = dashboard();
        let mut runtime = DashboardRuntime::new(FakeApi::default(), TIMEOUT);

        runtime.submit(dash.start());
        assert_eq!(runtime.in_flight(), 1);
        assert!(runtime.next(&mut dash).await);
        assert_eq!(dash.directory().stations().len(), 2);
        assert!(!runtime.next(&mut dash).await);

        runtime.submit(dash.select_listed_station("A"));
        runtime.settle(&mut dash).await;

        assert_eq!(
            runtime.api().calls(),
            vec!["stations", "measurements/A", "readings/A-level"]
        );
        assert_eq!(dash.navigation().notation(), Some("A-level"));
        let series = dash.series().series().unwrap();
        assert_eq!(series.real_points().len(), 3);
        assert_eq!(series.chart_points().last().unwrap().time_label, "12:00");
        assert_eq!(runtime.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_for_abandoned_station_is_ignored() {
        let api = FakeApi::default().with_delay("measurements/A", Duration::from_secs(5));
        let mut dash = dashboard();
        let mut runtime = DashboardRuntime::new(api, TIMEOUT);

        runtime.submit(dash.select_station("A", "Avon"));
        dash.reset();
        runtime.submit(dash.select_station("B", "Trent"));
        runtime.settle(&mut dash).await;

        let calls = runtime.api().calls();
        assert!(calls.contains(&"readings/B-level".to_string()));
        assert!(!calls.contains(&"readings/A-level".to_string()));
        assert_eq!(dash.catalog().station_id(), Some("B"));
        assert_eq!(
            dash.selection(),
            &SelectionState::ChannelSelected {
                station_id: "B".to_string(),
                display_name: "Trent".to_string(),
                notation: "B-level".to_string(),
            }
        );
        assert!(dash.series().series().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_station_list_timeout_fails_the_tier() {
        let api = FakeApi::default().with_delay("stations", Duration::from_secs(30));
        let mut dash = dashboard();
        let mut runtime = DashboardRuntime::new(api, TIMEOUT);

        runtime.submit(dash.start());
        runtime.settle(&mut dash).await;

        assert!(dash.directory().status().is_failed());
        assert_eq!(dash.directory().status_message(), Some(directory::FAILED_MESSAGE));
        assert_eq!(dash.retry_stations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicked_station_fetch_fails_the_tier() {
        let api = FakeApi::default().with_panic("stations");
        let mut dash = dashboard();
        let mut runtime = DashboardRuntime::new(api, TIMEOUT);

        runtime.submit(dash.start());
        runtime.settle(&mut dash).await;

        assert!(dash.directory().status().is_failed());
        assert_eq!(dash.directory().status_message(), Some(directory::FAILED_MESSAGE));
        assert_eq!(runtime.in_flight(), 0);
        assert!(runtime.pending.is_empty());

        let retry = dash.retry_stations();
        assert_eq!(retry.len(), 1);
        assert_eq!(retry[0].kind, FetchKind::Stations);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicked_readings_fetch_is_no_data() {
        let api = FakeApi::default().with_panic("readings/A-level");
        let mut dash = dashboard();
        let mut runtime = DashboardRuntime::new(api, TIMEOUT);

        runtime.submit(dash.select_station("A", "Avon"));
        runtime.settle(&mut dash).await;

        assert!(dash.series().is_no_data());
        assert!(matches!(dash.series().fetch_error(), Some(FetchError::Request(_))));
        assert_eq!(dash.navigation().notation(), Some("A-level"));

        // The other channel still loads
        runtime.submit(dash.select_channel("A-flow"));
        runtime.settle(&mut dash).await;
        assert!(dash.series().series().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_catalog_timeout_fails_the_tier() {
        let api = FakeApi::default().with_delay("measurements/A", Duration::from_secs(30));
        let mut dash = dashboard();
        let mut runtime = DashboardRuntime::new(api, TIMEOUT);

        runtime.submit(dash.select_station("A", "Avon"));
        runtime.settle(&mut dash).await;

        assert!(dash.catalog().status().is_failed());
        assert_eq!(dash.catalog().status_message(), Some(catalog::FAILED_MESSAGE));
        assert_eq!(dash.navigation().station_id(), Some("A"));
        assert!(dash.series().status().is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_readings_timeout_is_no_data() {
        let api = FakeApi::default().with_delay("readings/A-level", Duration::from_secs(60));
        let mut dash = dashboard();
        let mut runtime = DashboardRuntime::new(api, TIMEOUT);

        runtime.submit(dash.select_station("A", "Avon"));
        runtime.settle(&mut dash).await;

        assert!(dash.series().is_no_data());
        assert_eq!(dash.series().fetch_error(), Some(&FetchError::Timeout(TIMEOUT)));
        assert_eq!(dash.catalog().channels().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_switch_while_loading() {
        let api = FakeApi::default().with_delay("readings/A-level", Duration::from_secs(3));
        let mut dash = dashboard();
        let mut runtime = DashboardRuntime::new(api, TIMEOUT);

        runtime.submit(dash.select_station("A", "Avon"));
        // Catalog lands and the default channel starts loading
        assert!(runtime.next(&mut dash).await);
        assert_eq!(runtime.in_flight(), 1);

        runtime.submit(dash.select_channel("A-flow"));
        runtime.settle(&mut dash).await;

        assert_eq!(dash.series().notation(), Some("A-flow"));
        assert!(dash.series().series().is_some());
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_timeout() {
        let config = ApiConfig::default().with_timeout(Duration::from_secs(3));
        let mut runtime = DashboardRuntime::from_config(FakeApi::default(), &config);
        assert_eq!(runtime.timeout, Duration::from_secs(3));
        let mut dash = dashboard();
        assert!(!runtime.next(&mut dash).await);
    }
}
