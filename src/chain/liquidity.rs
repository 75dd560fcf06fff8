// Pool account liquidity check
//
// A pool whose account is gone or drained of lamports has had its liquidity burned or
// withdrawn.

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use super::network::SwapNetwork;

pub struct LiquidityInspector;

impl LiquidityInspector {
    /// Missing account or zero lamports means burned. A failed lookup is logged and
    /// reported as not burned so the candidate is still evaluated.
    pub async fn is_liquidity_burned(network: &dyn SwapNetwork, pool: &Pubkey) -> bool {
        match network.account_snapshot(pool).await {
            Ok(Some(account)) => {
                debug!(
                    "Pool {} owner={} executable={} lamports={} data={}B",
                    pool,
                    account.owner,
                    account.executable,
                    account.lamports,
                    account.data.len()
                );
                account.lamports == 0
            }
            Ok(None) => {
                debug!("Pool account {} does not exist", pool);
                true
            }
            Err(e) => {
                warn!("⚠️  Could not inspect pool {}: {}", pool, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::constants::RAYDIUM_AMM_V4;
    use crate::chain::network::{AccountSnapshot, MockSwapNetwork, NetworkError};

    fn snapshot(lamports: u64) -> AccountSnapshot {
        AccountSnapshot {
            owner: RAYDIUM_AMM_V4,
            executable: false,
            lamports,
            data: vec![0; 752],
        }
    }

    #[tokio::test]
    async fn test_funded_pool_is_live() {
        let mut network = MockSwapNetwork::new();
        network
            .expect_account_snapshot()
            .returning(|_| Ok(Some(snapshot(6_124_800))));
        assert!(!LiquidityInspector::is_liquidity_burned(&network, &Pubkey::new_unique()).await);
    }

    #[tokio::test]
    async fn test_empty_or_missing_pool_is_burned() {
        let mut network = MockSwapNetwork::new();
        network.expect_account_snapshot().returning(|_| Ok(Some(snapshot(0))));
        assert!(LiquidityInspector::is_liquidity_burned(&network, &Pubkey::new_unique()).await);

        let mut network = MockSwapNetwork::new();
        network.expect_account_snapshot().returning(|_| Ok(None));
        assert!(LiquidityInspector::is_liquidity_burned(&network, &Pubkey::new_unique()).await);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_burned() {
        let mut network = MockSwapNetwork::new();
        network
            .expect_account_snapshot()
            .returning(|_| Err(NetworkError::Transport("timeout".into())));
        assert!(!LiquidityInspector::is_liquidity_burned(&network, &Pubkey::new_unique()).await);
    }
}
