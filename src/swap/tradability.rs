// Aggregator token-list membership check with a short-lived cache

use moka::future::Cache;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::aggregator::SwapAggregator;
use crate::chain::address::is_valid_address;

pub struct TradabilityChecker {
    token_list: Cache<(), Arc<HashSet<String>>>,
}

impl TradabilityChecker {
    pub fn new(ttl: Duration) -> Self {
        let token_list = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { token_list }
    }

    /// True iff `mint` is on the aggregator's token list. Fails closed: a list that
    /// cannot be fetched makes every mint untradable until the next call.
    pub async fn is_tradable(&self, aggregator: &dyn SwapAggregator, mint: &str) -> bool {
        if !is_valid_address(mint) {
            debug!("Rejecting malformed mint {:?}", mint);
            return false;
        }

        match self.tokens(aggregator).await {
            Some(tokens) => {
                let listed = tokens.contains(mint);
                info!("🔍 {} tradable: {}", mint, listed);
                listed
            }
            None => false,
        }
    }

    async fn tokens(&self, aggregator: &dyn SwapAggregator) -> Option<Arc<HashSet<String>>> {
        if let Some(tokens) = self.token_list.get(&()).await {
            debug!("Token list cache hit ({} mints)", tokens.len());
            return Some(tokens);
        }

        match aggregator.tradable_tokens().await {
            Ok(list) => {
                let tokens: Arc<HashSet<String>> = Arc::new(list.into_iter().collect());
                self.token_list.insert((), Arc::clone(&tokens)).await;
                Some(tokens)
            }
            Err(e) => {
                error!("❌ Failed to fetch tradable token list: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{AggregatorError, MockSwapAggregator};

    const LISTED: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    const UNLISTED: &str = "So11111111111111111111111111111111111111112";

    #[tokio::test]
    async fn test_listed_mint_is_tradable_and_list_is_cached() {
        let mut aggregator = MockSwapAggregator::new();
        aggregator
            .expect_tradable_tokens()
            .times(1)
            .returning(|| Ok(vec![LISTED.to_string()]));

        let checker = TradabilityChecker::new(Duration::from_secs(60));
        assert!(checker.is_tradable(&aggregator, LISTED).await);
        assert!(!checker.is_tradable(&aggregator, UNLISTED).await);
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_closed_and_is_not_cached() {
        let mut aggregator = MockSwapAggregator::new();
        let mut calls = 0;
        aggregator.expect_tradable_tokens().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(AggregatorError::Transport("connection refused".into()))
            } else {
                Ok(vec![LISTED.to_string()])
            }
        });

        let checker = TradabilityChecker::new(Duration::from_secs(60));
        assert!(!checker.is_tradable(&aggregator, LISTED).await);
        assert!(checker.is_tradable(&aggregator, LISTED).await);
    }

    #[tokio::test]
    async fn test_malformed_mint_skips_network() {
        let mut aggregator = MockSwapAggregator::new();
        aggregator.expect_tradable_tokens().never();

        let checker = TradabilityChecker::new(Duration::from_secs(60));
        assert!(!checker.is_tradable(&aggregator, "0xdeadbeef").await);
    }
}
