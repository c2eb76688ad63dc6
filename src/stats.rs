//! Per-domain availability counters
//!
//! The registry lives for the whole process. It grows with the number of
//! distinct domains seen, never with elapsed time, and is never reset.

use crate::probe::CheckStatus;
use std::collections::HashMap;

/// Running check counters for one domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub up: u64,
    pub total: u64,
}

impl DomainStats {
    pub fn record(&mut self, status: CheckStatus) {
        self.total += 1;
        if status.is_up() {
            self.up += 1;
        }
    }

    /// Percentage of UP checks, truncated toward zero. `None` before the
    /// first check.
    pub fn availability(&self) -> Option<u64> {
        if self.total == 0 {
            return None;
        }
        Some(100 * self.up / self.total)
    }
}

/// Domain counters in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    order: Vec<String>,
    stats: HashMap<String, DomainStats>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one check against `domain`, creating its entry on first sight
    pub fn record(&mut self, domain: &str, status: CheckStatus) {
        if !self.stats.contains_key(domain) {
            self.order.push(domain.to_string());
        }
        self.stats.entry(domain.to_string()).or_default().record(status);
    }

    pub fn get(&self, domain: &str) -> Option<&DomainStats> {
        self.stats.get(domain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DomainStats)> {
        self.order
            .iter()
            .filter_map(|domain| self.stats.get(domain).map(|s| (domain.as_str(), s)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
