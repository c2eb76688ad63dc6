//! Endpoint Monitor Library
//!
//! Periodically probes a list of HTTP endpoints, classifies each check as UP
//! or DOWN and logs a per-domain availability summary after every cycle.

pub mod config;
pub mod endpoint;
pub mod errors;
pub mod monitor;
pub mod probe;
pub mod report;
pub mod stats;

pub use config::{Config, LogFormat};
pub use endpoint::{EndpointDefinition, EndpointSpec, load_endpoints};
pub use errors::{MonitorError, Result};
pub use monitor::{Monitor, MonitorState};
pub use probe::{CheckResult, CheckStatus, HttpProber, Prober};
pub use report::{LogSink, TracingSink};
pub use stats::{DomainRegistry, DomainStats};
