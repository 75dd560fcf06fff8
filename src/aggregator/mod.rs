//! DEX aggregator seam
//!
//! The pipeline talks to the aggregator only through [`SwapAggregator`]; the
//! production implementation is [`JupiterClient`].

pub mod jupiter;
pub mod types;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub use jupiter::JupiterClient;
pub use types::{Quote, QuoteReply, QuoteRequest, RouteStep, UnsignedTransaction};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregatorError {
    #[error("Aggregator rate limited the request: {0}")]
    RateLimited(String),

    #[error("Aggregator transport error: {0}")]
    Transport(String),

    #[error("Aggregator returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed aggregator response: {0}")]
    Malformed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapAggregator: Send + Sync {
    /// Full list of mints the aggregator can route
    async fn tradable_tokens(&self) -> Result<Vec<String>, AggregatorError>;

    /// Price a swap; never fails, every outcome is a tagged reply
    async fn quote(&self, request: &QuoteRequest) -> QuoteReply;

    /// Serialized unsigned swap transaction for `quote`
    async fn swap_transaction(
        &self,
        quote: Quote,
        user_public_key: &Pubkey,
        wrap_and_unwrap_sol: bool,
    ) -> Result<UnsignedTransaction, AggregatorError>;
}
