use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::MonitorConfig;
use crate::service::{AnalyzeParams, SentimentService};

/// Periodically re-analyzes every subfeddit so the store stays warm.
pub struct Monitor {
    service: Arc<SentimentService>,
    interval: Duration,
    params: AnalyzeParams,
}

impl Monitor {
    pub fn new(service: Arc<SentimentService>, config: &MonitorConfig) -> Self {
        Self {
            service,
            interval: Duration::from_secs(config.interval_secs),
            params: AnalyzeParams {
                limit: config.comment_limit,
                ..Default::default()
            },
        }
    }

    /// Sweeps forever. Failed sweeps are logged and retried on the next tick.
    pub async fn run(self) {
        info!(
            "Starting sentiment monitor (interval: {:?}, comment_limit: {})",
            self.interval, self.params.limit
        );

        loop {
            self.sweep().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One pass over all subfeddits. Returns how many analyses were stored.
    pub async fn sweep(&self) -> usize {
        match self.service.analyze_all(&self.params).await {
            Ok(stored) => stored,
            Err(e) => {
                error!("Monitor sweep failed: {}", e);
                0
            }
        }
    }
}
