//! Error taxonomy for the swap pipeline.
//!
//! Every stage reports failures as a [`SwapError`]. The orchestrator reads
//! [`SwapError::disposition`] to decide whether to retry the same request,
//! move on to the next candidate, or stop the run.

use thiserror::Error;

/// What the caller is expected to do with a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Same request may be sent again (bounded by the stage's local limit)
    RetrySameRequest,
    /// Candidate cannot be swapped; continue with the next one
    SkipCandidate,
    /// Candidate reached the network and failed; never resign, continue with the next one
    AbortCandidate,
    /// Whole run is over
    Terminal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Token not tradable: {0}")]
    NotTradable(String),

    #[error("No route: {0}")]
    NoRoute(String),

    #[error("Transient transport error: {0}")]
    Transient(String),

    #[error("Pool liquidity burned: {0}")]
    LiquidityBurned(String),

    #[error("Swap transaction build failed: {0}")]
    BuildFailed(String),

    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),

    #[error("Confirmation timeout for {signature} after {waited_ms}ms")]
    ConfirmationTimeout { signature: String, waited_ms: u64 },

    #[error("Transaction {signature} executed with error: {error}")]
    OnChainExecutionError { signature: String, error: String },

    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded { attempts: u32 },
}

impl SwapError {
    pub fn disposition(&self) -> Disposition {
        match self {
            SwapError::RateLimited(_) | SwapError::Transient(_) => Disposition::RetrySameRequest,
            SwapError::InvalidAddress(_)
            | SwapError::NotTradable(_)
            | SwapError::NoRoute(_)
            | SwapError::LiquidityBurned(_)
            | SwapError::BuildFailed(_) => Disposition::SkipCandidate,
            SwapError::BroadcastFailed(_)
            | SwapError::ConfirmationTimeout { .. }
            | SwapError::OnChainExecutionError { .. } => Disposition::AbortCandidate,
            SwapError::MaxRetriesExceeded { .. } => Disposition::Terminal,
        }
    }

    /// Stable short name used in swap records and run summaries
    pub fn label(&self) -> &'static str {
        match self {
            SwapError::InvalidAddress(_) => "invalid_address",
            SwapError::RateLimited(_) => "rate_limited",
            SwapError::NotTradable(_) => "not_tradable",
            SwapError::NoRoute(_) => "no_route",
            SwapError::Transient(_) => "transient",
            SwapError::LiquidityBurned(_) => "liquidity_burned",
            SwapError::BuildFailed(_) => "build_failed",
            SwapError::BroadcastFailed(_) => "broadcast_failed",
            SwapError::ConfirmationTimeout { .. } => "confirmation_timeout",
            SwapError::OnChainExecutionError { .. } => "on_chain_error",
            SwapError::MaxRetriesExceeded { .. } => "max_retries_exceeded",
        }
    }
}

pub type SwapResult<T> = std::result::Result<T, SwapError>;
