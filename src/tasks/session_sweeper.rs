use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::PickerConfig;
use crate::metrics::PickerMetrics;
use crate::picker::PickerSessions;

/// Background task discarding picker sessions nobody touched for a while
pub struct SessionSweeper {
    config: PickerConfig,
    sessions: Arc<PickerSessions>,
    shutdown: broadcast::Receiver<()>,
}

impl SessionSweeper {
    pub fn new(
        config: PickerConfig,
        sessions: Arc<PickerSessions>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            config,
            sessions,
            shutdown,
        }
    }

    /// Run until the shutdown signal fires
    pub async fn run(mut self) {
        let interval = Duration::from_secs(self.config.sweep_interval_seconds.max(1));
        let mut timer = tokio::time::interval(interval);

        // Skip immediate first tick
        timer.tick().await;

        tracing::info!(
            sweep_interval_secs = self.config.sweep_interval_seconds,
            session_ttl_secs = self.config.session_ttl_seconds,
            "Picker session sweeper started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("Picker session sweeper received shutdown signal");
                    break;
                }
                _ = timer.tick() => {
                    self.sweep();
                }
            }
        }

        tracing::info!("Picker session sweeper stopped");
    }

    /// Purge idle sessions once; returns how many were removed
    pub fn sweep(&self) -> usize {
        let ttl = Duration::from_secs(self.config.session_ttl_seconds);
        let removed = self.sessions.purge_idle(ttl);

        if removed > 0 {
            tracing::info!(removed, "Expired idle picker sessions");
            PickerMetrics::record_expired(removed);
        }
        PickerMetrics::set_active_sessions(self.sessions.count());

        removed
    }
}
