// Signature status polling with a hard deadline

use solana_sdk::signature::Signature;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info};

use super::network::SwapNetwork;
use crate::config::{Commitment, Config};
use crate::error::{SwapError, SwapResult};

/// Terminal status of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub signature: Signature,
    pub commitment: Option<Commitment>,
    pub slot: u64,
    /// Present when the transaction landed but its execution failed
    pub error: Option<String>,
}

impl Confirmation {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> SwapResult<Confirmation> {
        match self.error {
            Some(error) => Err(SwapError::OnChainExecutionError {
                signature: self.signature.to_string(),
                error,
            }),
            None => Ok(self),
        }
    }
}

pub struct ConfirmationWatcher {
    commitment: Commitment,
    timeout: Duration,
    poll_interval: Duration,
}

impl ConfirmationWatcher {
    pub fn new(commitment: Commitment, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            commitment,
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.rpc.commitment,
            config.confirmation_timeout(),
            config.poll_interval(),
        )
    }

    /// Poll until `signature` reaches the target commitment, fails on chain, or the
    /// deadline passes
    pub async fn wait(
        &self,
        network: &dyn SwapNetwork,
        signature: &Signature,
    ) -> SwapResult<Confirmation> {
        let started = Instant::now();
        info!("⏳ Waiting for {} to reach {}", signature, self.commitment);

        match timeout(self.timeout, self.poll(network, signature)).await {
            Ok(confirmation) => {
                let elapsed = started.elapsed().as_millis();
                match &confirmation.error {
                    None => info!("✅ {} confirmed at slot {} in {}ms", signature, confirmation.slot, elapsed),
                    Some(e) => error!("❌ {} failed on chain at slot {}: {}", signature, confirmation.slot, e),
                }
                confirmation.into_result()
            }
            Err(_) => {
                error!("⌛ {} not confirmed within {:?}", signature, self.timeout);
                Err(SwapError::ConfirmationTimeout {
                    signature: signature.to_string(),
                    waited_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }

    async fn poll(&self, network: &dyn SwapNetwork, signature: &Signature) -> Confirmation {
        loop {
            match network.signature_status(signature).await {
                Ok(Some(status)) if status.error.is_some() => {
                    return Confirmation {
                        signature: *signature,
                        commitment: status.commitment,
                        slot: status.slot,
                        error: status.error,
                    };
                }
                Ok(Some(status)) => {
                    if let Some(observed) = status.commitment {
                        if self.commitment.is_reached_by(observed) {
                            return Confirmation {
                                signature: *signature,
                                commitment: Some(observed),
                                slot: status.slot,
                                error: None,
                            };
                        }
                    }
                    debug!("{} at {:?}, slot {}", signature, status.commitment, status.slot);
                }
                Ok(None) => debug!("{} not seen yet", signature),
                Err(e) => debug!("Status query failed for {}: {}", signature, e),
            }
            sleep(self.poll_interval).await;
        }
    }
}
