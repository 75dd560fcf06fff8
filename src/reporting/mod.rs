use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::discovery::PoolCandidate;
use crate::error::SwapError;

pub const OUTCOME_SUCCESS: &str = "success";

/// One evaluated candidate
#[derive(Debug, Clone, Serialize)]
pub struct SwapRecord {
    pub timestamp: DateTime<Utc>,
    pub attempt: u32,
    pub pool: String,
    pub buy_mint: String,
    pub sell_mint: String,
    /// `success` or the error label
    pub outcome: String,
    pub signature: Option<String>,
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl SwapRecord {
    pub fn success(attempt: u32, candidate: &PoolCandidate, signature: String, latency_ms: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            attempt,
            pool: candidate.address.clone(),
            buy_mint: candidate.token_a.clone(),
            sell_mint: candidate.token_b.clone(),
            outcome: OUTCOME_SUCCESS.to_string(),
            signature: Some(signature),
            error: None,
            latency_ms,
        }
    }

    pub fn failure(attempt: u32, candidate: &PoolCandidate, error: &SwapError, latency_ms: u64) -> Self {
        let signature = match error {
            SwapError::ConfirmationTimeout { signature, .. }
            | SwapError::OnChainExecutionError { signature, .. } => Some(signature.clone()),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            attempt,
            pool: candidate.address.clone(),
            buy_mint: candidate.token_a.clone(),
            sell_mint: candidate.token_b.clone(),
            outcome: error.label().to_string(),
            signature,
            error: Some(error.to_string()),
            latency_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == OUTCOME_SUCCESS
    }
}

/// Aggregate view over one run's records
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total_candidates: usize,
    pub successful: usize,
    pub failed: usize,
    pub average_latency_ms: f64,
    pub top_failures: Vec<(String, usize)>,
}

/// Calculate run summary from swap records
pub fn summarize(records: &[SwapRecord]) -> RunSummary {
    let total_candidates = records.len();
    let successful = records.iter().filter(|r| r.is_success()).count();

    let average_latency_ms = if total_candidates > 0 {
        records.iter().map(|r| r.latency_ms as f64).sum::<f64>() / total_candidates as f64
    } else {
        0.0
    };

    let mut failure_counts: HashMap<String, usize> = HashMap::new();
    for record in records.iter().filter(|r| !r.is_success()) {
        *failure_counts.entry(record.outcome.clone()).or_insert(0) += 1;
    }

    // Top 3, ties broken by label so output is stable
    let mut top_failures: Vec<(String, usize)> = failure_counts.into_iter().collect();
    top_failures.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_failures.truncate(3);

    RunSummary {
        total_candidates,
        successful,
        failed: total_candidates - successful,
        average_latency_ms,
        top_failures,
    }
}

/// Render a summary as a few log-friendly lines
pub fn format_summary(summary: &RunSummary) -> String {
    let mut report = String::new();

    report.push_str(&format!(
        "Candidates evaluated: {} ({} succeeded, {} failed)\n",
        summary.total_candidates, summary.successful, summary.failed
    ));
    report.push_str(&format!(
        "Average candidate latency: {:.0} ms\n",
        summary.average_latency_ms
    ));

    if !summary.top_failures.is_empty() {
        report.push_str("Top failure reasons:\n");
        for (i, (label, count)) in summary.top_failures.iter().enumerate() {
            let percentage = (*count as f64 / summary.failed as f64) * 100.0;
            report.push_str(&format!("  {}. {} x{} ({:.1}%)\n", i + 1, label, count, percentage));
        }
    }

    report
}
