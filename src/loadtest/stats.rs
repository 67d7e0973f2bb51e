use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

#[derive(Debug, Clone, Default)]
struct EndpointStats {
    num_requests: u64,
    num_failures: u64,
    total_ms: f64,
    min_ms: Option<f64>,
    max_ms: f64,
}

impl EndpointStats {
    fn record(&mut self, elapsed_ms: f64, success: bool) {
        self.num_requests += 1;
        if !success {
            self.num_failures += 1;
        }
        self.total_ms += elapsed_ms;
        self.min_ms = Some(self.min_ms.map_or(elapsed_ms, |m| m.min(elapsed_ms)));
        self.max_ms = self.max_ms.max(elapsed_ms);
    }

    fn merge(&mut self, other: &EndpointStats) {
        self.num_requests += other.num_requests;
        self.num_failures += other.num_failures;
        self.total_ms += other.total_ms;
        self.min_ms = match (self.min_ms, other.min_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_ms = self.max_ms.max(other.max_ms);
    }

    fn summary(&self, method: &str, name: &str) -> EndpointSummary {
        let avg_ms = if self.num_requests == 0 {
            0.0
        } else {
            self.total_ms / self.num_requests as f64
        };
        let failure_rate = if self.num_requests == 0 {
            0.0
        } else {
            self.num_failures as f64 / self.num_requests as f64
        };
        EndpointSummary {
            method: method.to_string(),
            name: name.to_string(),
            num_requests: self.num_requests,
            num_failures: self.num_failures,
            avg_ms,
            min_ms: self.min_ms.unwrap_or(0.0),
            max_ms: self.max_ms,
            failure_rate,
        }
    }
}

/// Request statistics shared by every simulated user.
/// Success is any 2xx status; transport errors count as failures.
#[derive(Debug)]
pub struct RequestStats {
    entries: DashMap<(String, String), EndpointStats>,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EndpointSummary {
    pub method: String,
    pub name: String,
    pub num_requests: u64,
    pub num_failures: u64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub failure_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub endpoints: Vec<EndpointSummary>,
    pub total: EndpointSummary,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            started_at: Utc::now(),
        }
    }

    pub fn record(&self, method: &str, name: &str, elapsed: Duration, success: bool) {
        self.entries
            .entry((method.to_string(), name.to_string()))
            .or_default()
            .record(elapsed.as_secs_f64() * 1000.0, success);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let mut total = EndpointStats::default();
        let mut endpoints: Vec<EndpointSummary> = self
            .entries
            .iter()
            .map(|entry| {
                let (method, name) = entry.key();
                total.merge(entry.value());
                entry.value().summary(method, name)
            })
            .collect();
        endpoints.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.method.cmp(&b.method)));

        StatsSnapshot {
            started_at: self.started_at,
            finished_at: Utc::now(),
            endpoints,
            total: total.summary("", "Aggregated"),
        }
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSnapshot {
    /// Fixed-width summary table
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<7} {:<60} {:>8} {:>8} {:>10} {:>10} {:>10}",
            "Type", "Name", "# reqs", "# fails", "Avg (ms)", "Min (ms)", "Max (ms)"
        );
        let _ = writeln!(out, "{}", "-".repeat(117));
        for row in self.endpoints.iter().chain(std::iter::once(&self.total)) {
            let _ = writeln!(
                out,
                "{:<7} {:<60} {:>8} {:>8} {:>10.0} {:>10.0} {:>10.0}",
                row.method,
                row.name,
                row.num_requests,
                row.num_failures,
                row.avg_ms,
                row.min_ms,
                row.max_ms
            );
        }
        out
    }
}
