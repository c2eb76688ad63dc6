//! The check-and-aggregate loop

use crate::config::{CHECK_INTERVAL, Config};
use crate::endpoint::EndpointSpec;
use crate::probe::Prober;
use crate::report::{LogSink, checking_line, render_summary, result_line};
use crate::stats::DomainRegistry;

use chrono::Local;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Lifecycle of a [`Monitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Executing cycles
    Running,
    /// Shutdown requested, in-flight work being dropped
    Stopping,
    /// Loop has exited
    Stopped,
}

/// Probes every endpoint once per cycle, accumulates per-domain counters and
/// logs a summary after each full pass
pub struct Monitor {
    monitor_id: String,
    endpoints: Vec<EndpointSpec>,
    prober: Arc<dyn Prober>,
    sink: Arc<dyn LogSink>,
    registry: Arc<RwLock<DomainRegistry>>,
    state: Arc<RwLock<MonitorState>>,
    max_concurrent_checks: usize,
}

impl Monitor {
    /// Create a monitor over an already loaded endpoint list
    pub fn new(
        endpoints: Vec<EndpointSpec>,
        prober: Arc<dyn Prober>,
        sink: Arc<dyn LogSink>,
        config: &Config,
    ) -> Self {
        Self {
            monitor_id: Uuid::new_v4().to_string(),
            endpoints,
            prober,
            sink,
            registry: Arc::new(RwLock::new(DomainRegistry::new())),
            state: Arc::new(RwLock::new(MonitorState::Running)),
            max_concurrent_checks: config.max_concurrent_checks.max(1),
        }
    }

    /// Run cycles until `shutdown` resolves.
    ///
    /// Both the probes and the pause between cycles are abandoned as soon as
    /// shutdown fires; counters already recorded are kept.
    #[instrument(skip_all, fields(monitor_id = %self.monitor_id))]
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        if self.state().await != MonitorState::Running {
            debug!("Monitor already stopped, not starting again");
            return;
        }

        info!(
            "Starting endpoint monitor {} with {} endpoints",
            self.monitor_id,
            self.endpoints.len()
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = self.run_cycle() => {}
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = sleep(CHECK_INTERVAL) => {}
            }
        }

        self.set_state(MonitorState::Stopping).await;
        self.sink.info("Monitoring stopped by user.");
        self.set_state(MonitorState::Stopped).await;
    }

    /// One full pass over the endpoints followed by the summary
    pub async fn run_cycle(&self) {
        let prober = &self.prober;
        let mut results = stream::iter(self.endpoints.iter())
            .map(|endpoint| async move { (endpoint, prober.check(endpoint).await) })
            .buffered(self.max_concurrent_checks);

        // Results arrive in configured order; this loop is the registry's
        // only writer
        while let Some((endpoint, result)) = results.next().await {
            self.sink.info(&checking_line(endpoint.raw_url()));
            self.sink.info(&result_line(endpoint.raw_url(), &result));

            self.registry
                .write()
                .await
                .record(endpoint.domain(), result.status);
        }

        let summary = {
            let registry = self.registry.read().await;
            render_summary(&registry, &Local::now())
        };

        for line in &summary {
            self.sink.info(line);
        }
    }

    pub async fn state(&self) -> MonitorState {
        *self.state.read().await
    }

    /// Snapshot of the per-domain counters
    pub async fn stats(&self) -> DomainRegistry {
        self.registry.read().await.clone()
    }

    async fn set_state(&self, state: MonitorState) {
        let mut current = self.state.write().await;
        debug!("Monitor state {:?} -> {:?}", *current, state);
        *current = state;
    }
}
