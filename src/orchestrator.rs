// Retry orchestrator
//
// Idle -> Attempting{n} -> Succeeded | Exhausted
//
// Every attempt runs one discovery round and walks its candidates in order through
// the swap pipeline. A candidate failure moves on to the next candidate; an attempt
// with no success sleeps the fixed backoff and rediscovers, up to `max_retries`
// attempts.

use solana_sdk::signature::Signature;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::context::AgentContext;
use crate::discovery::PoolDiscovery;
use crate::error::{Disposition, SwapError};
use crate::reporting::SwapRecord;
use crate::swap::SwapPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Attempting { attempt: u32 },
    Succeeded,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempt: u32,
    pub max_attempts: u32,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
        }
    }

    /// Start the next attempt, returning its 1-based number
    pub fn advance(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

/// Outcome of one orchestrator run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub final_state: RunState,
    pub attempts: u32,
    pub discovery_rounds: u32,
    pub backoff_sleeps: u32,
    pub records: Vec<SwapRecord>,
    pub signature: Option<Signature>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.final_state == RunState::Succeeded
    }
}

pub struct Orchestrator {
    pipeline: SwapPipeline,
    discovery: Box<dyn PoolDiscovery>,
}

impl Orchestrator {
    pub fn new(pipeline: SwapPipeline, discovery: Box<dyn PoolDiscovery>) -> Self {
        Self {
            pipeline,
            discovery,
        }
    }

    pub async fn run(&self, ctx: &AgentContext) -> RunReport {
        let mut retry = RetryState::new(ctx.config.retry.max_retries);
        let mut report = RunReport {
            final_state: RunState::Idle,
            attempts: 0,
            discovery_rounds: 0,
            backoff_sleeps: 0,
            records: Vec::new(),
            signature: None,
        };

        loop {
            let attempt = retry.advance();
            report.attempts = attempt;
            report.final_state = RunState::Attempting { attempt };
            info!("🔄 Attempt {}/{}: discovering pools", attempt, retry.max_attempts);

            report.discovery_rounds += 1;
            let candidates = match self.discovery.discover().await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("⚠️  Discovery failed on attempt {}: {}", attempt, e);
                    Vec::new()
                }
            };

            for candidate in &candidates {
                info!("🎯 Evaluating {}", candidate);
                let started = Instant::now();
                let outcome = self.pipeline.execute(ctx, candidate).await;
                let latency_ms = started.elapsed().as_millis() as u64;

                match outcome {
                    Ok(success) => {
                        report.records.push(SwapRecord::success(
                            attempt,
                            candidate,
                            success.signature.to_string(),
                            latency_ms,
                        ));
                        report.signature = Some(success.signature);
                        report.final_state = RunState::Succeeded;
                        info!("✅ Swap succeeded on attempt {}: {}", attempt, success.signature);
                        return report;
                    }
                    Err(e) => {
                        log_candidate_failure(candidate.address.as_str(), &e);
                        report
                            .records
                            .push(SwapRecord::failure(attempt, candidate, &e, latency_ms));
                    }
                }
            }

            if retry.is_exhausted() {
                break;
            }

            let backoff = ctx.config.backoff();
            debug!("No swap on attempt {}, sleeping {:?}", attempt, backoff);
            sleep(backoff).await;
            report.backoff_sleeps += 1;
        }

        report.final_state = RunState::Exhausted;
        error!(
            "❌ {}",
            SwapError::MaxRetriesExceeded {
                attempts: report.attempts
            }
        );
        report
    }
}

fn log_candidate_failure(pool: &str, error: &SwapError) {
    match error.disposition() {
        Disposition::SkipCandidate => info!("⏭️  Skipping pool {}: {}", pool, error),
        Disposition::AbortCandidate => warn!("⚠️  Swap on pool {} failed: {}", pool, error),
        Disposition::RetrySameRequest => {
            warn!("⚠️  Pool {} still failing after local retries: {}", pool, error)
        }
        Disposition::Terminal => error!("❌ Pool {}: {}", pool, error),
    }
}
