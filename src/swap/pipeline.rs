// Single-candidate swap pipeline
//
// validate -> (liquidity gate) -> tradability -> quote -> build -> sign/send -> confirm
//
// Each candidate runs to a terminal outcome before the caller moves on; nothing here
// runs concurrently.

use solana_sdk::signature::Signature;
use tracing::{info, warn};

use super::builder::TransactionBuilder;
use super::quote::QuoteFetcher;
use super::tradability::TradabilityChecker;
use crate::chain::address::parse_address;
use crate::chain::confirmation::{Confirmation, ConfirmationWatcher};
use crate::chain::liquidity::LiquidityInspector;
use crate::chain::transaction_sender::TransactionSender;
use crate::config::Config;
use crate::context::AgentContext;
use crate::discovery::PoolCandidate;
use crate::error::{SwapError, SwapResult};

/// Confirmed swap
#[derive(Debug, Clone)]
pub struct SwapSuccess {
    pub signature: Signature,
    pub confirmation: Confirmation,
    pub estimated_output: u64,
}

pub struct SwapPipeline {
    tradability: TradabilityChecker,
    quotes: QuoteFetcher,
    builder: TransactionBuilder,
    sender: TransactionSender,
    watcher: ConfirmationWatcher,
    amount: u64,
    slippage_bps: u16,
    skip_burned_pools: bool,
}

impl SwapPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            tradability: TradabilityChecker::new(std::time::Duration::from_secs(
                config.aggregator.token_list_ttl_seconds,
            )),
            quotes: QuoteFetcher::from_config(config),
            builder: TransactionBuilder::new(config.swap.wrap_and_unwrap_sol),
            sender: TransactionSender::from_config(config),
            watcher: ConfirmationWatcher::from_config(config),
            amount: config.swap.amount,
            slippage_bps: config.swap.slippage_bps,
            skip_burned_pools: config.swap.skip_burned_pools,
        }
    }

    /// Swap `token_b` for `token_a` of one candidate pool
    pub async fn execute(&self, ctx: &AgentContext, candidate: &PoolCandidate) -> SwapResult<SwapSuccess> {
        let pool = parse_address(&candidate.address)?;
        parse_address(&candidate.token_a)?;
        parse_address(&candidate.token_b)?;

        let network = ctx.network.as_ref();
        let aggregator = ctx.aggregator.as_ref();

        if self.skip_burned_pools && LiquidityInspector::is_liquidity_burned(network, &pool).await {
            warn!("🔥 Liquidity burned for pool {}", pool);
            return Err(SwapError::LiquidityBurned(candidate.address.clone()));
        }

        if !self.tradability.is_tradable(aggregator, &candidate.token_a).await {
            return Err(SwapError::NotTradable(format!(
                "{} is not on the aggregator token list",
                candidate.token_a
            )));
        }

        let quote = self
            .quotes
            .fetch(
                aggregator,
                &candidate.token_a,
                &candidate.token_b,
                self.amount,
                self.slippage_bps,
            )
            .await?;
        let estimated_output = quote.estimated_output;

        let unsigned = self
            .builder
            .build(aggregator, quote, &ctx.wallet_pubkey())
            .await?;

        let signature = self
            .sender
            .sign_and_send(network, &ctx.wallet, unsigned)
            .await?;

        let confirmation = self.watcher.wait(network, &signature).await?;
        info!(
            "🎉 Swap confirmed: {} (estimated output {})",
            signature, estimated_output
        );

        Ok(SwapSuccess {
            signature,
            confirmation,
            estimated_output,
        })
    }
}
