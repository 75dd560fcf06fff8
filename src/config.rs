use anyhow::{anyhow, bail, Context, Result};
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::chain::constants::{
    DEFAULT_BITQUERY_API_URL, DEFAULT_DISCOVERY_METHOD, DEFAULT_JUPITER_API_BASE_URL,
    DEFAULT_RPC_URL, DEFAULT_SEND_MAX_RETRIES, RAYDIUM_AMM_V4_PROGRAM_ID,
};

/// Main configuration struct containing all agent settings
#[derive(Debug, Clone)]
pub struct Config {
    pub swap: SwapConfig,
    pub retry: RetryConfig,
    pub rpc: RpcConfig,
    pub aggregator: AggregatorConfig,
    pub discovery: DiscoveryConfig,
    pub wallet: WalletConfig,
    pub logging: LoggingConfig,
}

/// Swap sizing and candidate gating
#[derive(Debug, Clone)]
pub struct SwapConfig {
    /// Swap size in base units of the sell mint
    pub amount: u64,
    pub slippage_bps: u16,
    pub wrap_and_unwrap_sol: bool,
    pub skip_burned_pools: bool,
}

/// Orchestrator and per-request retry bounds
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff_ms: u64,
    pub transient_retries: u32,
    pub rate_limit_delay_ms: u64,
}

/// RPC endpoint and confirmation configuration
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub commitment: Commitment,
    pub confirmation_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Node-level resubmissions requested in sendTransaction
    pub send_max_retries: usize,
    /// Local resubmissions of the same signed payload on transport failure
    pub submit_retries: u32,
}

/// Jupiter aggregator configuration
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub base_url: String,
    pub token_list_ttl_seconds: u64,
    pub http_timeout_seconds: u64,
}

/// Bitquery pool discovery configuration
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub api_url: String,
    pub oauth_token: Option<String>,
    pub program_id: String,
    pub method: String,
    pub limit: u32,
    pub rate_limit_retries: u32,
}

/// Wallet configuration
#[derive(Debug, Clone, Default)]
pub struct WalletConfig {
    pub keypair_path: Option<String>,
    pub private_key: Option<String>,
    pub public_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `None` disables the file layer
    pub log_file: Option<String>,
    pub json: bool,
}

/// Confirmation depth, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn level(self) -> CommitmentLevel {
        match self {
            Commitment::Processed => CommitmentLevel::Processed,
            Commitment::Confirmed => CommitmentLevel::Confirmed,
            Commitment::Finalized => CommitmentLevel::Finalized,
        }
    }

    pub fn config(self) -> CommitmentConfig {
        CommitmentConfig {
            commitment: self.level(),
        }
    }

    /// True when an observed level is at least as deep as `self`
    pub fn is_reached_by(self, observed: Commitment) -> bool {
        observed >= self
    }
}

impl FromStr for Commitment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(anyhow!("Unknown commitment level '{}'", other)),
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        };
        f.write_str(s)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            swap: SwapConfig {
                amount: 10_000,
                slippage_bps: 150,
                wrap_and_unwrap_sol: true,
                skip_burned_pools: false,
            },
            retry: RetryConfig {
                max_retries: 5,
                backoff_ms: 5_000,
                transient_retries: 3,
                rate_limit_delay_ms: 1_000,
            },
            rpc: RpcConfig {
                url: DEFAULT_RPC_URL.to_string(),
                commitment: Commitment::Confirmed,
                confirmation_timeout_ms: 60_000,
                poll_interval_ms: 400,
                send_max_retries: DEFAULT_SEND_MAX_RETRIES,
                submit_retries: 2,
            },
            aggregator: AggregatorConfig {
                base_url: DEFAULT_JUPITER_API_BASE_URL.to_string(),
                token_list_ttl_seconds: 60,
                http_timeout_seconds: 30,
            },
            discovery: DiscoveryConfig {
                api_url: DEFAULT_BITQUERY_API_URL.to_string(),
                oauth_token: None,
                program_id: RAYDIUM_AMM_V4_PROGRAM_ID.to_string(),
                method: DEFAULT_DISCOVERY_METHOD.to_string(),
                limit: 3,
                rate_limit_retries: 10,
            },
            wallet: WalletConfig::default(),
            logging: LoggingConfig {
                log_file: Some("log.log".to_string()),
                json: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present)
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let swap = SwapConfig {
            amount: get_u64_env("SWAP_AMOUNT", defaults.swap.amount)?,
            slippage_bps: u16::try_from(get_u32_env(
                "SLIPPAGE_BPS",
                defaults.swap.slippage_bps as u32,
            )?)
            .context("SLIPPAGE_BPS does not fit in u16")?,
            wrap_and_unwrap_sol: get_bool_env(
                "WRAP_AND_UNWRAP_SOL",
                defaults.swap.wrap_and_unwrap_sol,
            ),
            skip_burned_pools: get_bool_env("SKIP_BURNED_POOLS", defaults.swap.skip_burned_pools),
        };

        let retry = RetryConfig {
            max_retries: get_u32_env("MAX_RETRIES", defaults.retry.max_retries)?,
            backoff_ms: get_u64_env("RETRY_BACKOFF_MS", defaults.retry.backoff_ms)?,
            transient_retries: get_u32_env("TRANSIENT_RETRIES", defaults.retry.transient_retries)?,
            rate_limit_delay_ms: get_u64_env(
                "RATE_LIMIT_DELAY_MS",
                defaults.retry.rate_limit_delay_ms,
            )?,
        };

        let rpc = RpcConfig {
            url: get_env_or_default("RPC_URL", &defaults.rpc.url),
            commitment: get_env_or_default("COMMITMENT_LEVEL", &defaults.rpc.commitment.to_string())
                .parse::<Commitment>()
                .context("Failed to parse COMMITMENT_LEVEL")?,
            confirmation_timeout_ms: get_u64_env(
                "CONFIRMATION_TIMEOUT_MS",
                defaults.rpc.confirmation_timeout_ms,
            )?,
            poll_interval_ms: get_u64_env("POLL_INTERVAL_MS", defaults.rpc.poll_interval_ms)?,
            send_max_retries: get_u32_env("SEND_MAX_RETRIES", defaults.rpc.send_max_retries as u32)?
                as usize,
            submit_retries: get_u32_env("SUBMIT_RETRIES", defaults.rpc.submit_retries)?,
        };

        let aggregator = AggregatorConfig {
            base_url: get_env_or_default("JUPITER_API_BASE_URL", &defaults.aggregator.base_url),
            token_list_ttl_seconds: get_u64_env(
                "TOKEN_LIST_TTL_SECONDS",
                defaults.aggregator.token_list_ttl_seconds,
            )?,
            http_timeout_seconds: get_u64_env(
                "HTTP_TIMEOUT_SECONDS",
                defaults.aggregator.http_timeout_seconds,
            )?,
        };

        let discovery = DiscoveryConfig {
            api_url: get_env_or_default("BITQUERY_API_URL", &defaults.discovery.api_url),
            oauth_token: get_optional_env("BITQUERY_OAUTH_TOKEN"),
            program_id: get_env_or_default("DISCOVERY_PROGRAM_ID", &defaults.discovery.program_id),
            method: get_env_or_default("DISCOVERY_METHOD", &defaults.discovery.method),
            limit: get_u32_env("DISCOVERY_LIMIT", defaults.discovery.limit)?,
            rate_limit_retries: get_u32_env(
                "DISCOVERY_RATE_LIMIT_RETRIES",
                defaults.discovery.rate_limit_retries,
            )?,
        };

        let wallet = WalletConfig {
            keypair_path: get_optional_env("WALLET_KEYPAIR_PATH"),
            private_key: get_optional_env("PRIVATE_KEY")
                .or_else(|| get_optional_env("WALLET_PRIVATE_KEY")),
            public_key: get_optional_env("PUBLIC_KEY"),
        };

        let logging = LoggingConfig {
            log_file: match std::env::var("LOG_FILE") {
                Ok(path) if path.trim().is_empty() => None,
                Ok(path) => Some(path),
                Err(_) => defaults.logging.log_file,
            },
            json: get_env_or_default("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
        };

        Ok(Config {
            swap,
            retry,
            rpc,
            aggregator,
            discovery,
            wallet,
            logging,
        })
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_retries == 0 {
            bail!("MAX_RETRIES must be at least 1");
        }
        if self.swap.amount == 0 {
            bail!("SWAP_AMOUNT must be greater than zero");
        }
        if self.swap.slippage_bps > 10_000 {
            bail!(
                "SLIPPAGE_BPS must be at most 10000, got {}",
                self.swap.slippage_bps
            );
        }
        if self.rpc.confirmation_timeout_ms == 0 {
            bail!("CONFIRMATION_TIMEOUT_MS must be greater than zero");
        }
        if self.discovery.limit == 0 {
            bail!("DISCOVERY_LIMIT must be at least 1");
        }
        Ok(())
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc.confirmation_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.rpc.poll_interval_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.retry.backoff_ms)
    }

    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.retry.rate_limit_delay_ms)
    }
}

// ============================================================================
// Helper Functions for Environment Variable Parsing
// ============================================================================

/// Get environment variable or return default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Non-empty environment variable, if set
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get boolean environment variable with default
fn get_bool_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}

/// Get u32 environment variable with default
fn get_u32_env(key: &str, default: u32) -> Result<u32> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .context(format!("Failed to parse {} as u32", key))
}

/// Get u64 environment variable with default
fn get_u64_env(key: &str, default: u64) -> Result<u64> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .context(format!("Failed to parse {} as u64", key))
}
