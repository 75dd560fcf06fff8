// Shared agent state, built once at startup and passed by reference
//
// Holds the wallet and the two remote collaborators. Only the transaction sender ever
// reads the wallet's secret key.

use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use std::sync::Arc;

use crate::aggregator::SwapAggregator;
use crate::chain::network::SwapNetwork;
use crate::config::Config;

pub struct AgentContext {
    pub config: Config,
    pub wallet: Arc<Keypair>,
    pub network: Arc<dyn SwapNetwork>,
    pub aggregator: Arc<dyn SwapAggregator>,
}

impl AgentContext {
    pub fn new(
        config: Config,
        wallet: Arc<Keypair>,
        network: Arc<dyn SwapNetwork>,
        aggregator: Arc<dyn SwapAggregator>,
    ) -> Self {
        Self {
            config,
            wallet,
            network,
            aggregator,
        }
    }

    pub fn wallet_pubkey(&self) -> Pubkey {
        self.wallet.pubkey()
    }
}
