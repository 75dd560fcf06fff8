// Swap transaction signing and submission
//
// The aggregator hands back a base64 bincode `VersionedTransaction` with placeholder
// signatures. This module:
// 1. Rejects payloads whose blockhash has already expired
// 2. Decodes and signs the message with the wallet key
// 3. Submits with preflight simulation enabled
// 4. Resubmits the same signed payload on transport failures only
//
// Node rejections are final; a rejected payload is never re-signed.

use base64::{engine::general_purpose::STANDARD, Engine};
use solana_sdk::{
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::VersionedTransaction,
};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::network::{NetworkError, SendOptions, SwapNetwork};
use crate::aggregator::UnsignedTransaction;
use crate::config::Config;
use crate::error::{SwapError, SwapResult};
use crate::utils::retry::{RetryAction, RetryPolicy};

/// Signs aggregator payloads with the wallet and submits them
pub struct TransactionSender {
    options: SendOptions,
    submit_policy: RetryPolicy,
}

impl TransactionSender {
    pub fn new(options: SendOptions, submit_policy: RetryPolicy) -> Self {
        Self {
            options,
            submit_policy,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let options = SendOptions {
            skip_preflight: false,
            preflight_commitment: config.rpc.commitment,
            max_retries: config.rpc.send_max_retries,
        };
        let submit_policy = RetryPolicy {
            max_retries: config.rpc.submit_retries,
            initial_interval: Duration::from_millis(200),
            max_interval: Duration::from_secs(2),
            multiplier: 2.0,
        };
        Self::new(options, submit_policy)
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    /// Base64 then bincode
    pub fn decode(unsigned: &UnsignedTransaction) -> SwapResult<VersionedTransaction> {
        let bytes = STANDARD
            .decode(unsigned.encoded.trim())
            .map_err(|e| SwapError::BroadcastFailed(format!("Invalid base64 payload: {}", e)))?;
        bincode::deserialize(&bytes)
            .map_err(|e| SwapError::BroadcastFailed(format!("Invalid transaction bytes: {}", e)))
    }

    /// Replace placeholder signatures with the wallet's
    pub fn sign(transaction: VersionedTransaction, wallet: &Keypair) -> SwapResult<VersionedTransaction> {
        VersionedTransaction::try_new(transaction.message, &[wallet]).map_err(|e| {
            SwapError::BroadcastFailed(format!("Wallet {} cannot sign payload: {}", wallet.pubkey(), e))
        })
    }

    /// Fails when the network is already past the payload's last valid block height
    async fn ensure_not_expired(
        &self,
        network: &dyn SwapNetwork,
        unsigned: &UnsignedTransaction,
    ) -> SwapResult<()> {
        let Some(last_valid) = unsigned.last_valid_block_height else {
            return Ok(());
        };

        match network.block_height().await {
            Ok(current) if current > last_valid => Err(SwapError::BroadcastFailed(format!(
                "Quote expired: block height {} is past last valid height {}",
                current, last_valid
            ))),
            Ok(current) => {
                debug!("Payload valid for {} more blocks", last_valid - current);
                Ok(())
            }
            Err(e) => {
                warn!("Could not read block height, relying on preflight: {}", e);
                Ok(())
            }
        }
    }

    /// Decode, sign and submit; returns the transaction signature
    pub async fn sign_and_send(
        &self,
        network: &dyn SwapNetwork,
        wallet: &Keypair,
        unsigned: UnsignedTransaction,
    ) -> SwapResult<Signature> {
        self.ensure_not_expired(network, &unsigned).await?;

        let transaction = Self::sign(Self::decode(&unsigned)?, wallet)?;
        let expected = transaction.signatures.first().copied().unwrap_or_default();

        info!(
            "📤 Submitting swap {} -> {} (preflight={}, node retries={})",
            unsigned.sell_mint,
            unsigned.buy_mint,
            !self.options.skip_preflight,
            self.options.max_retries
        );

        let result = self
            .submit_policy
            .retry_async(
                || network.send_transaction(&transaction, &self.options),
                |e: &NetworkError| {
                    if e.is_transport() {
                        RetryAction::Backoff
                    } else {
                        RetryAction::Stop
                    }
                },
            )
            .await;

        match result {
            Ok(signature) => {
                if signature != expected {
                    warn!("Node returned signature {} but payload is signed as {}", signature, expected);
                }
                info!("✅ Transaction sent: {}", signature);
                Ok(signature)
            }
            Err(e) => {
                error!("❌ Broadcast failed: {}", e);
                Err(SwapError::BroadcastFailed(e.to_string()))
            }
        }
    }
}
