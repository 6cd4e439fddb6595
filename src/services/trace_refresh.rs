use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::state::AppState;

/// Periodically re-reads the retention window from the store and republishes
/// every chart trace. One cycle runs synchronously at startup so the first
/// page load never sees empty charts.
pub struct TraceRefreshService {
    state: AppState,
}

impl TraceRefreshService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn start(self, cancel: CancellationToken) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.state.config.refresh_interval());
            // Cycles are strictly sequential; an overrun pushes the next
            // tick out instead of bunching.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The startup cycle already ran; swallow the immediate first fire.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = self.refresh_once().await {
                            warn!("trace refresh failed: {err:#}");
                        }
                    }
                }
            }
        });
    }

    /// One fetch-and-publish cycle. The cutoff is computed once so both
    /// fetches see the same retention window; traces keep their previous
    /// points if either fetch fails.
    pub async fn refresh_once(&self) -> Result<()> {
        let oldest = Utc::now().timestamp() - self.state.config.retention_seconds();
        let readings = self
            .state
            .store
            .fetch_sensor_readings(oldest)
            .await
            .context("failed to fetch sensor readings")?;
        let events = self
            .state
            .store
            .fetch_fan_control_events(oldest)
            .await
            .context("failed to fetch fan control events")?;
        self.state.charts.rebuild_sensor_traces(&readings);
        self.state.charts.rebuild_fan_traces(&events);
        tracing::debug!(
            readings = readings.len(),
            events = events.len(),
            "trace refresh complete"
        );
        Ok(())
    }
}
