// Shared fakes for cross-component tests
//
// - FakeAggregator: token list plus a fixed quote outcome per buy mint
// - FakeNetwork: scripted send results and per-submission confirmation behavior
// - FakeDiscovery: queued discovery rounds with a round counter
// - fixtures for configs, wallets and aggregator payloads

#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use solana_pool_sniper::aggregator::{
    AggregatorError, Quote, QuoteReply, QuoteRequest, SwapAggregator, UnsignedTransaction,
};
use solana_pool_sniper::chain::network::{
    AccountSnapshot, NetworkError, SendOptions, SignatureStatus, SwapNetwork,
};
use solana_pool_sniper::config::{Commitment, Config};
use solana_pool_sniper::discovery::{DiscoveryError, PoolCandidate, PoolDiscovery};
use solana_pool_sniper::AgentContext;
use solana_sdk::{
    hash::Hash,
    message::{Message, VersionedMessage},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::VersionedTransaction,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

pub const SOL: &str = "So11111111111111111111111111111111111111112";

/// Config with every wait shortened for tests
pub fn test_config(max_retries: u32) -> Config {
    let mut config = Config::default();
    config.retry.max_retries = max_retries;
    config.retry.backoff_ms = 1;
    config.retry.transient_retries = 1;
    config.retry.rate_limit_delay_ms = 0;
    config.rpc.confirmation_timeout_ms = 150;
    config.rpc.poll_interval_ms = 5;
    config.rpc.submit_retries = 1;
    config.logging.log_file = None;
    config
}

/// Candidate selling SOL for a fresh unique mint
pub fn candidate() -> PoolCandidate {
    PoolCandidate::new(
        Pubkey::new_unique().to_string(),
        Pubkey::new_unique().to_string(),
        SOL,
    )
}

/// Base64 bincode payload whose only required signer is `payer`
pub fn unsigned_payload(payer: &Pubkey) -> String {
    let message = Message::new_with_blockhash(&[], Some(payer), &Hash::new_unique());
    let transaction = VersionedTransaction {
        signatures: vec![Signature::default()],
        message: VersionedMessage::Legacy(message),
    };
    STANDARD.encode(bincode::serialize(&transaction).unwrap())
}

pub fn context(
    config: Config,
    wallet: Keypair,
    network: Arc<FakeNetwork>,
    aggregator: Arc<FakeAggregator>,
) -> AgentContext {
    AgentContext::new(config, Arc::new(wallet), network, aggregator)
}

// ============================================================================
// Aggregator
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOutcome {
    Quoted(u64),
    NotTradable,
    NoRoute,
    Transient,
}

pub struct FakeAggregator {
    tokens: Mutex<Vec<String>>,
    outcomes: Mutex<HashMap<Pubkey, QuoteOutcome>>,
    payer: Pubkey,
    last_valid_block_height: Mutex<Option<u64>>,
    pub token_list_calls: AtomicU32,
    pub quote_calls: Mutex<Vec<QuoteRequest>>,
    pub swap_calls: AtomicU32,
}

impl FakeAggregator {
    /// Builds payloads for `payer`; lists only SOL until `list` is called
    pub fn new(payer: Pubkey) -> Self {
        Self {
            tokens: Mutex::new(vec![SOL.to_string()]),
            outcomes: Mutex::new(HashMap::new()),
            payer,
            last_valid_block_height: Mutex::new(None),
            token_list_calls: AtomicU32::new(0),
            quote_calls: Mutex::new(Vec::new()),
            swap_calls: AtomicU32::new(0),
        }
    }

    /// List `mint` as tradable and quote it with `outcome`
    pub fn list(&self, mint: &str, outcome: QuoteOutcome) {
        self.tokens.lock().unwrap().push(mint.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .insert(mint.parse().unwrap(), outcome);
    }

    pub fn set_last_valid_block_height(&self, height: u64) {
        *self.last_valid_block_height.lock().unwrap() = Some(height);
    }

    pub fn quoted_buy_mints(&self) -> Vec<String> {
        self.quote_calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.buy_mint.to_string())
            .collect()
    }
}

#[async_trait]
impl SwapAggregator for FakeAggregator {
    async fn tradable_tokens(&self) -> Result<Vec<String>, AggregatorError> {
        self.token_list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn quote(&self, request: &QuoteRequest) -> QuoteReply {
        self.quote_calls.lock().unwrap().push(request.clone());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(&request.buy_mint)
            .copied()
            .unwrap_or(QuoteOutcome::NoRoute);

        match outcome {
            QuoteOutcome::Quoted(out) => QuoteReply::Quoted(Quote {
                sell_mint: request.sell_mint,
                buy_mint: request.buy_mint,
                amount: request.amount,
                slippage_bps: request.slippage_bps,
                route: vec![],
                estimated_output: out,
                other_amount_threshold: out - out / 100,
                price_impact_pct: None,
                raw: serde_json::json!({ "outAmount": out.to_string() }),
            }),
            QuoteOutcome::NotTradable => QuoteReply::NotTradable("The token is not tradable".into()),
            QuoteOutcome::NoRoute => QuoteReply::NoRoute("Could not find any route".into()),
            QuoteOutcome::Transient => QuoteReply::Transient("HTTP 503".into()),
        }
    }

    async fn swap_transaction(
        &self,
        quote: Quote,
        _user_public_key: &Pubkey,
        _wrap_and_unwrap_sol: bool,
    ) -> Result<UnsignedTransaction, AggregatorError> {
        self.swap_calls.fetch_add(1, Ordering::SeqCst);
        Ok(UnsignedTransaction {
            encoded: unsigned_payload(&self.payer),
            last_valid_block_height: *self.last_valid_block_height.lock().unwrap(),
            sell_mint: quote.sell_mint,
            buy_mint: quote.buy_mint,
        })
    }
}

// ============================================================================
// Network
// ============================================================================

/// How the chain treats one accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landing {
    Confirms,
    FailsOnChain(String),
    NeverSeen,
}

pub struct FakeNetwork {
    send_results: Mutex<VecDeque<Result<(), NetworkError>>>,
    landings: Mutex<VecDeque<Landing>>,
    landed: Mutex<HashMap<Signature, Landing>>,
    block_height: u64,
    pool_lamports: Option<u64>,
    pub sends: AtomicU32,
    pub status_polls: AtomicU32,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self {
            send_results: Mutex::new(VecDeque::new()),
            landings: Mutex::new(VecDeque::new()),
            landed: Mutex::new(HashMap::new()),
            block_height: 100,
            pool_lamports: Some(6_124_800),
            sends: AtomicU32::new(0),
            status_polls: AtomicU32::new(0),
        }
    }

    pub fn with_block_height(mut self, height: u64) -> Self {
        self.block_height = height;
        self
    }

    pub fn with_pool_lamports(mut self, lamports: Option<u64>) -> Self {
        self.pool_lamports = lamports;
        self
    }

    /// Queue the outcome of the next accepted submission; unqueued submissions confirm
    pub fn then_land(self, landing: Landing) -> Self {
        self.landings.lock().unwrap().push_back(landing);
        self
    }

    /// Queue a send failure; unqueued sends are accepted
    pub fn then_send_error(self, error: NetworkError) -> Self {
        self.send_results.lock().unwrap().push_back(Err(error));
        self
    }
}

#[async_trait]
impl SwapNetwork for FakeNetwork {
    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
        _options: &SendOptions,
    ) -> Result<Signature, NetworkError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if let Some(Err(e)) = self.send_results.lock().unwrap().pop_front() {
            return Err(e);
        }

        let signature = transaction.signatures[0];
        let landing = self
            .landings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Landing::Confirms);
        self.landed.lock().unwrap().insert(signature, landing);
        Ok(signature)
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, NetworkError> {
        self.status_polls.fetch_add(1, Ordering::SeqCst);
        let landing = self.landed.lock().unwrap().get(signature).cloned();
        Ok(match landing {
            Some(Landing::Confirms) => Some(SignatureStatus {
                slot: 250_000_000,
                commitment: Some(Commitment::Confirmed),
                error: None,
            }),
            Some(Landing::FailsOnChain(error)) => Some(SignatureStatus {
                slot: 250_000_000,
                commitment: Some(Commitment::Processed),
                error: Some(error),
            }),
            Some(Landing::NeverSeen) | None => None,
        })
    }

    async fn block_height(&self) -> Result<u64, NetworkError> {
        Ok(self.block_height)
    }

    async fn account_snapshot(
        &self,
        _address: &Pubkey,
    ) -> Result<Option<AccountSnapshot>, NetworkError> {
        Ok(self.pool_lamports.map(|lamports| AccountSnapshot {
            owner: Pubkey::new_unique(),
            executable: false,
            lamports,
            data: vec![0; 752],
        }))
    }
}

// ============================================================================
// Discovery
// ============================================================================

pub struct FakeDiscovery {
    rounds: Mutex<VecDeque<Result<Vec<PoolCandidate>, DiscoveryError>>>,
    calls: Arc<AtomicU32>,
}

impl FakeDiscovery {
    /// Returns queued rounds in order, then empty batches
    pub fn new(rounds: Vec<Result<Vec<PoolCandidate>, DiscoveryError>>) -> Self {
        Self {
            rounds: Mutex::new(rounds.into()),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Same batch every round
    pub fn repeating(batch: Vec<PoolCandidate>, rounds: usize) -> Self {
        Self::new((0..rounds).map(|_| Ok(batch.clone())).collect())
    }

    pub fn call_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PoolDiscovery for FakeDiscovery {
    async fn discover(&self) -> Result<Vec<PoolCandidate>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rounds
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn wallet() -> Keypair {
    Keypair::new()
}

pub fn pubkey_of(keypair: &Keypair) -> Pubkey {
    keypair.pubkey()
}
