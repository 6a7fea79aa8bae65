pub mod leak;
mod metrics;
mod reading;
pub mod rollup;
mod snapshot;

pub use reading::{MeterUsage, Reading};
pub use snapshot::WaterSnapshot;

#[cfg(test)]
pub use reading::fixture;

use std::{future::Future, ops::ControlFlow, sync::Arc};

use derive_more::derive::{Display, Error, From};
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tokio_util::sync::CancellationToken;

use crate::adapter::apavital::ApavitalError;
use crate::core::{time::DateTime, time::Duration, unit::CubicMeter};
use crate::t;
use leak::LeakAnalysisError;

/// Supplies the readings of one water meter account.
pub trait UsageSource {
    fn fetch_usage(&self) -> impl Future<Output = Result<MeterUsage, ApavitalError>> + Send;
}

#[derive(Debug, Clone)]
pub enum WaterMeterEvent {
    Updated { account: String },
    Unavailable { account: String },
    AuthFailed { account: String },
}

impl WaterMeterEvent {
    pub fn account(&self) -> &str {
        match self {
            WaterMeterEvent::Updated { account }
            | WaterMeterEvent::Unavailable { account }
            | WaterMeterEvent::AuthFailed { account } => account,
        }
    }
}

#[derive(Debug, Display, Error, From)]
enum RefreshError {
    #[display("Error communicating with Apavital API: {_0}")]
    Fetch(ApavitalError),
    #[display("Error analyzing readings: {_0}")]
    Analysis(LeakAnalysisError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub client_code: String,
    pub api_calls_count: u64,
    pub last_successful_update: Option<DateTime>,
    pub consecutive_errors: u32,
    pub last_error: Option<String>,
    pub update_interval_minutes: i64,
    pub leak_threshold: CubicMeter,
}

#[derive(Debug)]
struct MeterState {
    snapshot: Option<WaterSnapshot>,
    //whether the last cycle succeeded; the snapshot may outlive it
    available: bool,
    diagnostics: Diagnostics,
}

/// Refreshes one account on its own schedule. Refreshes never overlap.
pub struct WaterMeterRunner<S> {
    account: String,
    scan_interval: Duration,
    leak_threshold: CubicMeter,
    source: S,
    state: Arc<RwLock<MeterState>>,
    event_tx: broadcast::Sender<WaterMeterEvent>,
}

/// Read access to the latest state of one account.
#[derive(Clone)]
pub struct WaterMeterClient {
    account: String,
    state: Arc<RwLock<MeterState>>,
}

impl<S: UsageSource> WaterMeterRunner<S> {
    pub fn new(
        account: &str,
        client_code: &str,
        scan_interval: Duration,
        leak_threshold: CubicMeter,
        source: S,
        event_tx: broadcast::Sender<WaterMeterEvent>,
    ) -> Self {
        let diagnostics = Diagnostics {
            client_code: mask_client_code(client_code),
            api_calls_count: 0,
            last_successful_update: None,
            consecutive_errors: 0,
            last_error: None,
            update_interval_minutes: scan_interval.as_minutes(),
            leak_threshold,
        };

        Self {
            account: account.to_string(),
            scan_interval,
            leak_threshold,
            source,
            state: Arc::new(RwLock::new(MeterState {
                snapshot: None,
                available: false,
                diagnostics,
            })),
            event_tx,
        }
    }

    pub fn client(&self) -> WaterMeterClient {
        WaterMeterClient {
            account: self.account.clone(),
            state: self.state.clone(),
        }
    }

    pub async fn run(self, cancel: CancellationToken) {
        let mut timer = tokio::time::interval(self.scan_interval.to_std());
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            "Polling water meter {} every {} minutes",
            self.account,
            self.scan_interval.as_minutes()
        );

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!("Stopped polling water meter {}", self.account);
                    return;
                }

                _ = timer.tick() => {
                    if self.refresh().await.is_break() {
                        return;
                    }
                }
            }
        }
    }

    #[tracing::instrument(skip(self), fields(account = %self.account))]
    async fn refresh(&self) -> ControlFlow<()> {
        self.state.write().await.diagnostics.api_calls_count += 1;
        metrics::api_called(&self.account);

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                metrics::snapshot_updated(&self.account, &snapshot);

                let mut state = self.state.write().await;
                state.diagnostics.last_successful_update = Some(t!(now));
                state.diagnostics.consecutive_errors = 0;
                state.diagnostics.last_error = None;
                state.snapshot = Some(snapshot);
                state.available = true;
                drop(state);

                tracing::debug!("Water meter {} refreshed", self.account);
                self.publish(WaterMeterEvent::Updated {
                    account: self.account.clone(),
                });
                ControlFlow::Continue(())
            }

            Err(RefreshError::Fetch(ApavitalError::Unauthorized)) => {
                self.record_failure("JWT token expired").await;
                tracing::error!(
                    "JWT token of water meter {} expired. Please reconfigure the account, polling stopped",
                    self.account
                );
                self.publish(WaterMeterEvent::AuthFailed {
                    account: self.account.clone(),
                });
                ControlFlow::Break(())
            }

            Err(e) => {
                self.record_failure(&e.to_string()).await;
                let last_success = match self.state.read().await.diagnostics.last_successful_update {
                    Some(time) => time.to_human_readable(),
                    None => "never".to_string(),
                };
                tracing::error!(
                    "Error refreshing water meter {} (last success {}): {:?}",
                    self.account,
                    last_success,
                    e
                );
                self.publish(WaterMeterEvent::Unavailable {
                    account: self.account.clone(),
                });
                ControlFlow::Continue(())
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<WaterSnapshot, RefreshError> {
        let usage = self.source.fetch_usage().await?;
        let snapshot = WaterSnapshot::build(&usage, self.leak_threshold, t!(now))?;
        Ok(snapshot)
    }

    async fn record_failure(&self, error: &str) {
        metrics::refresh_failed(&self.account);

        let mut state = self.state.write().await;
        state.available = false;
        state.diagnostics.consecutive_errors += 1;
        state.diagnostics.last_error = Some(error.to_string());
    }

    fn publish(&self, event: WaterMeterEvent) {
        //no subscriber is not an error
        if let Err(e) = self.event_tx.send(event) {
            tracing::trace!("No listener for water meter event: {:?}", e.0);
        }
    }
}

impl WaterMeterClient {
    pub fn account(&self) -> &str {
        &self.account
    }

    pub async fn snapshot(&self) -> Option<WaterSnapshot> {
        self.state.read().await.snapshot.clone()
    }

    pub async fn is_available(&self) -> bool {
        self.state.read().await.available
    }

    pub async fn diagnostics(&self) -> Diagnostics {
        self.state.read().await.diagnostics.clone()
    }
}

fn mask_client_code(client_code: &str) -> String {
    let visible: String = client_code.chars().take(4).collect();
    format!("{}****", visible)
}
