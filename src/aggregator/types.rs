// Aggregator request/response types
//
// `Quote` and `UnsignedTransaction` are not `Clone`: a quote feeds exactly
// one swap build, and a built payload is signed and submitted at most once.

use serde::{Deserialize, Deserializer};
use solana_sdk::pubkey::Pubkey;

/// Priced swap request parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub sell_mint: Pubkey,
    pub buy_mint: Pubkey,
    pub amount: u64,
    pub slippage_bps: u16,
}

/// One hop of the aggregator's route plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStep {
    pub amm_key: String,
    pub label: Option<String>,
    pub percent: u8,
}

/// Priced swap route returned by the aggregator
#[derive(Debug)]
pub struct Quote {
    pub sell_mint: Pubkey,
    pub buy_mint: Pubkey,
    pub amount: u64,
    pub slippage_bps: u16,
    pub route: Vec<RouteStep>,
    pub estimated_output: u64,
    /// Minimum output after slippage
    pub other_amount_threshold: u64,
    pub price_impact_pct: Option<String>,
    /// Verbatim response body, posted back as `quoteResponse`
    pub raw: serde_json::Value,
}

/// Decoded outcome of one quote call
#[derive(Debug)]
pub enum QuoteReply {
    Quoted(Quote),
    NotTradable(String),
    NoRoute(String),
    RateLimited(String),
    Transient(String),
}

/// Serialized swap transaction awaiting the wallet signature
#[derive(Debug)]
pub struct UnsignedTransaction {
    /// Base64 of the bincode wire format
    pub encoded: String,
    /// Blockhash expiry reported by the aggregator
    pub last_valid_block_height: Option<u64>,
    pub sell_mint: Pubkey,
    pub buy_mint: Pubkey,
}

// ============================================================================
// Wire formats
// ============================================================================

/// Structured error body: `{"error": "...", "errorCode": "..."}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub error_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteBody {
    pub input_mint: String,
    pub output_mint: String,
    #[serde(deserialize_with = "u64_from_string")]
    pub in_amount: u64,
    #[serde(deserialize_with = "u64_from_string")]
    pub out_amount: u64,
    #[serde(deserialize_with = "u64_from_string")]
    pub other_amount_threshold: u64,
    pub slippage_bps: u16,
    #[serde(default)]
    pub price_impact_pct: Option<String>,
    #[serde(default)]
    pub route_plan: Vec<RoutePlanBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoutePlanBody {
    pub swap_info: SwapInfoBody,
    pub percent: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwapInfoBody {
    pub amm_key: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwapBody {
    pub swap_transaction: String,
    #[serde(default)]
    pub last_valid_block_height: Option<u64>,
}

/// Amounts arrive as decimal strings
fn u64_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(u64),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Text(s) => s.parse().map_err(serde::de::Error::custom),
        Amount::Number(n) => Ok(n),
    }
}

impl RouteStep {
    pub(crate) fn from_body(body: RoutePlanBody) -> Self {
        Self {
            amm_key: body.swap_info.amm_key,
            label: body.swap_info.label,
            percent: body.percent,
        }
    }
}

impl Quote {
    /// Short route description for logs, e.g. `Raydium(100%)`
    pub fn route_summary(&self) -> String {
        self.route
            .iter()
            .map(|step| {
                format!(
                    "{}({}%)",
                    step.label.as_deref().unwrap_or(&step.amm_key),
                    step.percent
                )
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
