// Solana RPC seam
//
// Everything the pipeline needs from a node goes through `SwapNetwork`, so the
// broadcaster, confirmation watcher and liquidity inspector can run against a fake
// node in tests. `RpcNetwork` is the production implementation over the nonblocking
// `RpcClient`.

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction};
use solana_transaction_status::TransactionConfirmationStatus;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::config::Commitment;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Request never got a node answer (I/O, HTTP, timeouts)
    #[error("RPC transport error: {0}")]
    Transport(String),

    /// Node answered and refused (preflight failure, bad blockhash, RPC error)
    #[error("RPC rejected request: {0}")]
    Rejected(String),
}

impl NetworkError {
    pub fn is_transport(&self) -> bool {
        matches!(self, NetworkError::Transport(_))
    }
}

impl From<ClientError> for NetworkError {
    fn from(err: ClientError) -> Self {
        match err.kind() {
            ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => {
                NetworkError::Transport(err.to_string())
            }
            _ => NetworkError::Rejected(err.to_string()),
        }
    }
}

/// Options applied to every submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: Commitment,
    pub max_retries: usize,
}

/// Signature status as seen by the node at one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    pub slot: u64,
    pub commitment: Option<Commitment>,
    pub error: Option<String>,
}

/// Account fields the liquidity check reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub owner: Pubkey,
    pub executable: bool,
    pub lamports: u64,
    pub data: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapNetwork: Send + Sync {
    /// Submit an already-signed transaction
    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
        options: &SendOptions,
    ) -> Result<Signature, NetworkError>;

    /// `None` while the node has not seen the signature
    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, NetworkError>;

    async fn block_height(&self) -> Result<u64, NetworkError>;

    /// `None` when the account does not exist
    async fn account_snapshot(
        &self,
        address: &Pubkey,
    ) -> Result<Option<AccountSnapshot>, NetworkError>;
}

/// `SwapNetwork` over a JSON-RPC node
pub struct RpcNetwork {
    rpc_client: Arc<RpcClient>,
    commitment: Commitment,
}

impl RpcNetwork {
    pub fn new(rpc_client: Arc<RpcClient>, commitment: Commitment) -> Self {
        Self {
            rpc_client,
            commitment,
        }
    }

    pub fn client(&self) -> &Arc<RpcClient> {
        &self.rpc_client
    }
}

fn map_confirmation_status(status: &TransactionConfirmationStatus) -> Commitment {
    match status {
        TransactionConfirmationStatus::Processed => Commitment::Processed,
        TransactionConfirmationStatus::Confirmed => Commitment::Confirmed,
        TransactionConfirmationStatus::Finalized => Commitment::Finalized,
    }
}

#[async_trait]
impl SwapNetwork for RpcNetwork {
    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
        options: &SendOptions,
    ) -> Result<Signature, NetworkError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            preflight_commitment: Some(options.preflight_commitment.level()),
            encoding: None,
            max_retries: Some(options.max_retries),
            min_context_slot: None,
        };

        self.rpc_client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(NetworkError::from)
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, NetworkError> {
        let response = self
            .rpc_client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(NetworkError::from)?;

        let status = response.value.into_iter().next().flatten().map(|status| {
            SignatureStatus {
                slot: status.slot,
                commitment: status
                    .confirmation_status
                    .as_ref()
                    .map(map_confirmation_status),
                error: status.err.as_ref().map(|e| format!("{:?}", e)),
            }
        });

        if let Some(ref s) = status {
            debug!("Status for {}: {:?} at slot {}", signature, s.commitment, s.slot);
        }
        Ok(status)
    }

    async fn block_height(&self) -> Result<u64, NetworkError> {
        self.rpc_client
            .get_block_height_with_commitment(self.commitment.config())
            .await
            .map_err(NetworkError::from)
    }

    async fn account_snapshot(
        &self,
        address: &Pubkey,
    ) -> Result<Option<AccountSnapshot>, NetworkError> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.commitment.config())
            .await
            .map_err(NetworkError::from)?;

        Ok(response.value.map(|account| AccountSnapshot {
            owner: account.owner,
            executable: account.executable,
            lamports: account.lamports,
            data: account.data,
        }))
    }
}
