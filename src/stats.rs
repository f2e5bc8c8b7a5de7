use crate::router::Decision;
use log::info;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct RequestStats {
    // Aggregate stats per upstream ("backend" / "frontend" is the key)
    per_upstream: HashMap<&'static str, UpstreamStats>,
}

#[derive(Debug, Default, Clone)]
struct UpstreamStats {
    forwarded_count: u64,
    fallback_count: u64,
    failure_count: u64,
}

pub enum RequestMessage {
    Forwarded { decision: Decision },
    FallbackSubstituted,
    UpstreamUnavailable { decision: Decision },
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            per_upstream: HashMap::new(),
        }
    }

    /// Process a message to update the stats
    pub fn handle_message(&mut self, message: RequestMessage) {
        match message {
            RequestMessage::Forwarded { decision } => {
                let entry = self.per_upstream.entry(decision.as_str()).or_default();
                entry.forwarded_count += 1;
            }
            RequestMessage::FallbackSubstituted => {
                let entry = self
                    .per_upstream
                    .entry(Decision::Frontend.as_str())
                    .or_default();
                entry.fallback_count += 1;
            }
            RequestMessage::UpstreamUnavailable { decision } => {
                let entry = self.per_upstream.entry(decision.as_str()).or_default();
                entry.failure_count += 1;
            }
        }
    }

    /// Display statistics
    pub fn print_stats(&self) {
        for (upstream, stats) in &self.per_upstream {
            info!(
                "Upstream: {} | Forwarded: {} | Fallbacks: {} | Failures: {}",
                upstream, stats.forwarded_count, stats.fallback_count, stats.failure_count
            );
        }
    }
}
