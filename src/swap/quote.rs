// Quote retrieval with local retry of transient and rate-limited replies

use std::time::Duration;
use tracing::{info, warn};

use crate::aggregator::{Quote, QuoteReply, QuoteRequest, SwapAggregator};
use crate::chain::address::parse_address;
use crate::config::Config;
use crate::error::{SwapError, SwapResult};
use crate::utils::retry::{RetryAction, RetryPolicy};

pub struct QuoteFetcher {
    policy: RetryPolicy,
    rate_limit_delay: Duration,
}

impl QuoteFetcher {
    pub fn new(policy: RetryPolicy, rate_limit_delay: Duration) -> Self {
        Self {
            policy,
            rate_limit_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            RetryPolicy::new(config.retry.transient_retries),
            config.rate_limit_delay(),
        )
    }

    /// Price selling `amount` of `sell_mint` for `buy_mint`
    pub async fn fetch(
        &self,
        aggregator: &dyn SwapAggregator,
        buy_mint: &str,
        sell_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> SwapResult<Quote> {
        let request = QuoteRequest {
            sell_mint: parse_address(sell_mint)?,
            buy_mint: parse_address(buy_mint)?,
            amount,
            slippage_bps,
        };
        let request = &request;
        let rate_limit_delay = self.rate_limit_delay;

        let quote = self
            .policy
            .retry_async(
                || async move { into_result(aggregator.quote(request).await) },
                |e: &SwapError| match e {
                    SwapError::Transient(_) => RetryAction::Backoff,
                    SwapError::RateLimited(_) => RetryAction::After(rate_limit_delay),
                    _ => RetryAction::Stop,
                },
            )
            .await
            .map_err(|e| {
                warn!("Quote {} -> {} failed: {}", sell_mint, buy_mint, e);
                e
            })?;

        info!(
            "💱 Quote: {} -> {} in={} out={} min_out={} route={}",
            quote.sell_mint,
            quote.buy_mint,
            quote.amount,
            quote.estimated_output,
            quote.other_amount_threshold,
            quote.route_summary()
        );
        Ok(quote)
    }
}

fn into_result(reply: QuoteReply) -> SwapResult<Quote> {
    match reply {
        QuoteReply::Quoted(quote) => Ok(quote),
        QuoteReply::NotTradable(msg) => Err(SwapError::NotTradable(msg)),
        QuoteReply::NoRoute(msg) => Err(SwapError::NoRoute(msg)),
        QuoteReply::RateLimited(msg) => Err(SwapError::RateLimited(msg)),
        QuoteReply::Transient(msg) => Err(SwapError::Transient(msg)),
    }
}
