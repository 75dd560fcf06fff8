use anyhow::{bail, Context, Result};
use clap::Parser;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_pool_sniper::aggregator::JupiterClient;
use solana_pool_sniper::chain::RpcNetwork;
use solana_pool_sniper::config::{Config, WalletConfig};
use solana_pool_sniper::discovery::BitqueryDiscovery;
use solana_pool_sniper::reporting::{format_summary, summarize};
use solana_pool_sniper::swap::SwapPipeline;
use solana_pool_sniper::utils::init_tracing;
use solana_pool_sniper::{AgentContext, Orchestrator, RunState};
use solana_sdk::{
    signature::{read_keypair_file, Keypair},
    signer::Signer,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Discover new Raydium pools and swap into the first tradable one
#[derive(Parser, Debug)]
#[command(name = "swap-agent", version, about)]
struct Cli {
    /// Read environment from this file instead of `.env`
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Discovery attempts before giving up (MAX_RETRIES)
    #[arg(long)]
    max_retries: Option<u32>,

    /// Swap size in base units of the sold token (SWAP_AMOUNT)
    #[arg(long)]
    amount: Option<u64>,

    /// Slippage tolerance in basis points (SLIPPAGE_BPS)
    #[arg(long)]
    slippage_bps: Option<u16>,

    /// Emit console logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(max_retries) = self.max_retries {
            config.retry.max_retries = max_retries;
        }
        if let Some(amount) = self.amount {
            config.swap.amount = amount;
        }
        if let Some(slippage_bps) = self.slippage_bps {
            config.swap.slippage_bps = slippage_bps;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ========================================================================
    // Step 1: Configuration
    // ========================================================================
    let mut config = match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to read env file {}", path.display()))?;
            Config::from_env()?
        }
        None => Config::load().context("Failed to load configuration")?,
    };
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    // ========================================================================
    // Step 2: Logging
    // ========================================================================
    let _log_guard = init_tracing(&config.logging)?;

    info!("🚀 Starting Solana pool swap agent...");
    info!("✅ Configuration loaded");
    info!(
        "   Amount: {}, slippage: {} bps, max attempts: {}",
        config.swap.amount, config.swap.slippage_bps, config.retry.max_retries
    );
    debug!(
        "   Commitment: {}, confirmation timeout: {}ms, backoff: {}ms",
        config.rpc.commitment, config.rpc.confirmation_timeout_ms, config.retry.backoff_ms
    );

    // ========================================================================
    // Step 3: Wallet
    // ========================================================================
    let wallet = load_keypair(&config.wallet)?;
    let wallet_address = wallet.pubkey();
    info!("✅ Wallet loaded: {}", wallet_address);

    // ========================================================================
    // Step 4: RPC connection
    // ========================================================================
    let rpc_client = Arc::new(RpcClient::new_with_commitment(
        config.rpc.url.clone(),
        config.rpc.commitment.config(),
    ));
    info!("✅ RPC client initialized: {}", config.rpc.url);

    match rpc_client.get_slot().await {
        Ok(slot) => info!("🔗 Connected to Solana, current slot {}", slot),
        Err(e) => error!("❌ Failed to connect to Solana: {}", e),
    }

    match rpc_client.get_balance(&wallet_address).await {
        Ok(balance) => info!(
            "💰 Wallet balance: {:.4} SOL ({} lamports)",
            balance as f64 / 1e9,
            balance
        ),
        Err(e) => warn!("⚠️  Failed to check wallet balance: {}", e),
    }

    // ========================================================================
    // Step 5: Collaborators
    // ========================================================================
    let aggregator =
        JupiterClient::from_config(&config.aggregator).context("Failed to create Jupiter client")?;
    info!("✅ Jupiter client initialized: {}", aggregator.base_url());

    let discovery = BitqueryDiscovery::new(
        &config.discovery,
        config.rate_limit_delay(),
        Duration::from_secs(config.aggregator.http_timeout_seconds),
    )
    .context("Failed to create Bitquery discovery (is BITQUERY_OAUTH_TOKEN set?)")?;

    let network = RpcNetwork::new(Arc::clone(&rpc_client), config.rpc.commitment);
    let pipeline = SwapPipeline::new(&config);
    let ctx = AgentContext::new(
        config,
        Arc::new(wallet),
        Arc::new(network),
        Arc::new(aggregator),
    );
    let orchestrator = Orchestrator::new(pipeline, Box::new(discovery));

    // ========================================================================
    // Step 6: Run
    // ========================================================================
    let report = orchestrator.run(&ctx).await;

    for line in format_summary(&summarize(&report.records)).lines() {
        info!("📊 {}", line);
    }

    match report.final_state {
        RunState::Succeeded => {
            if let Some(signature) = report.signature {
                info!("🎉 Swap successful: https://solscan.io/tx/{}", signature);
            }
        }
        _ => error!(
            "❌ Max retries reached after {} attempts ({} discovery rounds). Could not find a valid token pair to swap.",
            report.attempts, report.discovery_rounds
        ),
    }

    info!("👋 Shutting down...");
    Ok(())
}

/// Load keypair from file or base58 private key, checking PUBLIC_KEY when given
fn load_keypair(wallet_config: &WalletConfig) -> Result<Keypair> {
    let keypair = if let Some(ref keypair_path) = wallet_config.keypair_path {
        info!("Loading keypair from file: {}", keypair_path);
        read_keypair_file(keypair_path)
            .map_err(|e| anyhow::anyhow!("Failed to read keypair file: {}", e))?
    } else if let Some(ref private_key) = wallet_config.private_key {
        info!("Loading keypair from environment variable");
        let decoded = bs58::decode(private_key)
            .into_vec()
            .context("Failed to decode base58 private key")?;
        Keypair::from_bytes(&decoded).context("Failed to create keypair from bytes")?
    } else {
        bail!("No wallet configuration found. Set WALLET_KEYPAIR_PATH or PRIVATE_KEY");
    };

    if let Some(ref expected) = wallet_config.public_key {
        let actual = keypair.pubkey().to_string();
        if actual != *expected {
            bail!("PUBLIC_KEY {} does not match private key ({})", expected, actual);
        }
    }

    Ok(keypair)
}
