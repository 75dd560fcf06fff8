use solana_sdk::pubkey::Pubkey;
use tracing::{error, info};

use crate::aggregator::{Quote, SwapAggregator, UnsignedTransaction};
use crate::error::{SwapError, SwapResult};

/// Turns a quote into an unsigned swap transaction via the aggregator
pub struct TransactionBuilder {
    wrap_and_unwrap_sol: bool,
}

impl TransactionBuilder {
    pub fn new(wrap_and_unwrap_sol: bool) -> Self {
        Self { wrap_and_unwrap_sol }
    }

    /// Consumes `quote`; any failure is terminal for it
    pub async fn build(
        &self,
        aggregator: &dyn SwapAggregator,
        quote: Quote,
        user_public_key: &Pubkey,
    ) -> SwapResult<UnsignedTransaction> {
        let route = quote.route_summary();

        let unsigned = aggregator
            .swap_transaction(quote, user_public_key, self.wrap_and_unwrap_sol)
            .await
            .map_err(|e| {
                error!("❌ Swap build failed: {}", e);
                SwapError::BuildFailed(e.to_string())
            })?;

        if unsigned.encoded.trim().is_empty() {
            return Err(SwapError::BuildFailed("Empty swap transaction".to_string()));
        }

        info!(
            "🔨 Built swap transaction via {} ({} bytes base64, last valid height {:?})",
            route,
            unsigned.encoded.len(),
            unsigned.last_valid_block_height
        );
        Ok(unsigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{AggregatorError, MockSwapAggregator};

    fn quote() -> Quote {
        Quote {
            sell_mint: Pubkey::new_unique(),
            buy_mint: Pubkey::new_unique(),
            amount: 10_000,
            slippage_bps: 150,
            route: vec![],
            estimated_output: 10,
            other_amount_threshold: 9,
            price_impact_pct: None,
            raw: serde_json::json!({"outAmount": "10"}),
        }
    }

    #[tokio::test]
    async fn test_build_passes_wrap_flag() {
        let user = Pubkey::new_unique();
        let mut aggregator = MockSwapAggregator::new();
        aggregator
            .expect_swap_transaction()
            .withf(move |_, key, wrap| *key == user && !*wrap)
            .times(1)
            .returning(|quote, _, _| {
                Ok(UnsignedTransaction {
                    encoded: "AQID".to_string(),
                    last_valid_block_height: Some(10),
                    sell_mint: quote.sell_mint,
                    buy_mint: quote.buy_mint,
                })
            });

        let unsigned = TransactionBuilder::new(false)
            .build(&aggregator, quote(), &user)
            .await
            .unwrap();
        assert_eq!(unsigned.encoded, "AQID");
    }

    #[tokio::test]
    async fn test_aggregator_error_is_build_failed() {
        let mut aggregator = MockSwapAggregator::new();
        aggregator
            .expect_swap_transaction()
            .withf(|_, key, wrap| *key == Pubkey::default() && *wrap)
            .times(1)
            .returning(|_, _, _| {
                Err(AggregatorError::Http {
                    status: 400,
                    message: "invalid quoteResponse".into(),
                })
            });

        let result = TransactionBuilder::new(true)
            .build(&aggregator, quote(), &Pubkey::default())
            .await;
        assert!(matches!(result, Err(SwapError::BuildFailed(_))));
    }
}
