//! HTTP probing and UP/DOWN classification

use crate::config::LATENCY_THRESHOLD_MS;
use crate::endpoint::EndpointSpec;
use crate::errors::{MonitorError, Result};
use crate::report::LogSink;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Health classification of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Up,
    Down,
}

impl CheckStatus {
    pub fn is_up(self) -> bool {
        matches!(self, CheckStatus::Up)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Up => write!(f, "UP"),
            CheckStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// Outcome of one probe. `duration_ms` is `None` when no response arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub duration_ms: Option<f64>,
}

impl CheckResult {
    /// A response arrived with `status_code` after `duration_ms`
    pub fn measured(status_code: u16, duration_ms: f64) -> Self {
        Self {
            status: classify(status_code, duration_ms),
            duration_ms: Some(duration_ms),
        }
    }

    /// The request never produced a response
    pub fn failed() -> Self {
        Self {
            status: CheckStatus::Down,
            duration_ms: None,
        }
    }
}

/// UP iff the status is 2xx and the response came back within the latency
/// threshold
pub fn classify(status_code: u16, duration_ms: f64) -> CheckStatus {
    if (200..300).contains(&status_code) && duration_ms <= LATENCY_THRESHOLD_MS {
        CheckStatus::Up
    } else {
        CheckStatus::Down
    }
}

/// Performs a single health check against an endpoint
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn check(&self, endpoint: &EndpointSpec) -> CheckResult;
}

/// reqwest-backed prober. One attempt per call, no retries.
#[derive(Clone)]
pub struct HttpProber {
    client: Client,
    sink: Arc<dyn LogSink>,
}

impl HttpProber {
    pub fn new(http_timeout: Duration, sink: Arc<dyn LogSink>) -> Result<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .user_agent(format!("endpoint_monitor/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MonitorError::Http)?;

        Ok(Self { client, sink })
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn check(&self, endpoint: &EndpointSpec) -> CheckResult {
        let mut request = self
            .client
            .request(endpoint.method().clone(), endpoint.url().clone())
            .headers(endpoint.headers().clone());

        if let Some(body) = endpoint.body() {
            request = request.json(body);
        }

        // The clock stops once the whole body is in, like a non-streaming client
        let start = Instant::now();
        let outcome = match request.send().await {
            Ok(response) => {
                let status_code = response.status().as_u16();
                response.bytes().await.map(|body| (status_code, body.len()))
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok((status_code, body_len)) => {
                let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
                debug!(
                    "{} {} answered {} with {} bytes in {:.2}ms",
                    endpoint.method(),
                    endpoint.label(),
                    status_code,
                    body_len,
                    duration_ms
                );
                CheckResult::measured(status_code, duration_ms)
            }
            Err(e) => {
                self.sink
                    .warn(&format!("Request failed for {}: {}", endpoint.raw_url(), e));
                CheckResult::failed()
            }
        }
    }
}
