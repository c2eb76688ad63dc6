//! Log output: the injected sink, per-endpoint result lines and the
//! availability summary block

use crate::probe::{CheckResult, CheckStatus};
use crate::stats::DomainRegistry;
use chrono::{DateTime, TimeZone};
use tracing::{info, warn};

/// Width of the separators and of the domain column
pub const SUMMARY_WIDTH: usize = 60;

/// Destination for the monitor's human-readable output
pub trait LogSink: Send + Sync {
    fn info(&self, line: &str);
    fn warn(&self, line: &str);
}

/// Forwards lines to the global `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, line: &str) {
        info!("{}", line);
    }

    fn warn(&self, line: &str) {
        warn!("{}", line);
    }
}

pub fn checking_line(url: &str) -> String {
    format!("Checking {}...", url)
}

/// The line reporting how a single probe went
pub fn result_line(url: &str, result: &CheckResult) -> String {
    match (result.status, result.duration_ms) {
        (CheckStatus::Up, Some(ms)) => format!("{} is UP (Response Time: {:.2}ms)", url, ms),
        (CheckStatus::Down, Some(ms)) => format!("{} is DOWN (Response Time: {:.2}ms)", url, ms),
        (_, None) => format!("{} is DOWN (Request failed)", url),
    }
}

/// Render the summary block for the current registry contents.
///
/// The block ends with an empty line so consecutive summaries stay visually
/// separated in the log.
pub fn render_summary<Tz>(registry: &DomainRegistry, at: &DateTime<Tz>) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let heavy = "=".repeat(SUMMARY_WIDTH);
    let light = "-".repeat(SUMMARY_WIDTH);

    let mut lines = vec![
        heavy.clone(),
        format!("Availability Summary @ {}", at.format("%Y-%m-%d %H:%M:%S")),
        light.clone(),
        format!("{:<width$} | Availability", "Domain", width = SUMMARY_WIDTH),
        light,
    ];

    for (domain, stats) in registry.iter() {
        // Registry entries always have at least one check behind them
        if let Some(pct) = stats.availability() {
            lines.push(format!("{:<width$} | {}%", domain, pct, width = SUMMARY_WIDTH));
        }
    }

    lines.push(heavy);
    lines.push(String::new());
    lines
}

/// In-memory sink for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    lines: std::sync::Mutex<Vec<(tracing::Level, String)>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn infos(&self) -> Vec<String> {
        self.by_level(tracing::Level::INFO)
    }

    pub(crate) fn warnings(&self) -> Vec<String> {
        self.by_level(tracing::Level::WARN)
    }

    fn by_level(&self, level: tracing::Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

#[cfg(test)]
impl LogSink for RecordingSink {
    fn info(&self, line: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((tracing::Level::INFO, line.to_string()));
    }

    fn warn(&self, line: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((tracing::Level::WARN, line.to_string()));
    }
}
