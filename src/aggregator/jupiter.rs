// Jupiter v6 HTTP client
//
// Endpoints:
// - GET  /quote?inputMint&outputMint&amount&slippageBps
// - POST /swap {quoteResponse, userPublicKey, wrapAndUnwrapSol}
// - GET  /tokens
//
// Jupiter reports semantic failures through `errorCode` in the body, sometimes with a
// 200 status, so quote responses are classified by error code first and HTTP status
// second.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{ErrorBody, QuoteBody, RouteStep, SwapBody};
use super::{AggregatorError, Quote, QuoteReply, QuoteRequest, SwapAggregator, UnsignedTransaction};
use crate::chain::constants::{
    ERROR_CODE_COULD_NOT_FIND_ANY_ROUTE, ERROR_CODE_NO_ROUTES_FOUND,
    ERROR_CODE_ROUTE_PLAN_PARTIAL, ERROR_CODE_TOKEN_NOT_TRADABLE,
};
use crate::config::AggregatorConfig;

/// Jupiter aggregator API client
pub struct JupiterClient {
    http_client: Client,
    base_url: String,
}

impl JupiterClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AggregatorError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AggregatorError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AggregatorConfig) -> Result<Self, AggregatorError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.http_timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Classify one `/quote` response
pub fn decode_quote_response(status: u16, body: &str, request: &QuoteRequest) -> QuoteReply {
    let value: Option<Value> = serde_json::from_str(body).ok();

    if let Some(error) = value
        .as_ref()
        .and_then(|v| serde_json::from_value::<ErrorBody>(v.clone()).ok())
    {
        if let Some(code) = error.error_code {
            let message = error.error.unwrap_or_else(|| code.clone());
            return match code.as_str() {
                ERROR_CODE_TOKEN_NOT_TRADABLE => QuoteReply::NotTradable(message),
                ERROR_CODE_COULD_NOT_FIND_ANY_ROUTE
                | ERROR_CODE_NO_ROUTES_FOUND
                | ERROR_CODE_ROUTE_PLAN_PARTIAL => QuoteReply::NoRoute(message),
                _ if status == StatusCode::TOO_MANY_REQUESTS.as_u16() => {
                    QuoteReply::RateLimited(format!("{}: {}", code, message))
                }
                _ => QuoteReply::Transient(format!("{}: {}", code, message)),
            };
        }
    }

    if status == StatusCode::TOO_MANY_REQUESTS.as_u16() {
        return QuoteReply::RateLimited("HTTP 429 from /quote".to_string());
    }
    if !(200..300).contains(&status) {
        return QuoteReply::Transient(format!("HTTP {} from /quote: {}", status, snippet(body)));
    }

    let Some(raw) = value else {
        return QuoteReply::Transient(format!("Quote body is not JSON: {}", snippet(body)));
    };
    let parsed: QuoteBody = match serde_json::from_value(raw.clone()) {
        Ok(parsed) => parsed,
        Err(e) => return QuoteReply::Transient(format!("Malformed quote: {}", e)),
    };

    if parsed.input_mint != request.sell_mint.to_string()
        || parsed.output_mint != request.buy_mint.to_string()
    {
        return QuoteReply::Transient(format!(
            "Quote mints {} -> {} do not match request",
            parsed.input_mint, parsed.output_mint
        ));
    }

    if parsed.out_amount == 0 {
        return QuoteReply::NoRoute("Quote estimates zero output".to_string());
    }

    QuoteReply::Quoted(Quote {
        sell_mint: request.sell_mint,
        buy_mint: request.buy_mint,
        amount: parsed.in_amount,
        slippage_bps: parsed.slippage_bps,
        route: parsed.route_plan.into_iter().map(RouteStep::from_body).collect(),
        estimated_output: parsed.out_amount,
        other_amount_threshold: parsed.other_amount_threshold,
        price_impact_pct: parsed.price_impact_pct,
        raw,
    })
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}

fn transport(e: reqwest::Error) -> AggregatorError {
    AggregatorError::Transport(e.to_string())
}

#[async_trait]
impl SwapAggregator for JupiterClient {
    async fn tradable_tokens(&self) -> Result<Vec<String>, AggregatorError> {
        let url = format!("{}/tokens", self.base_url);
        debug!("Fetching tradable token list from {}", url);

        let response = self.http_client.get(&url).send().await.map_err(transport)?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AggregatorError::RateLimited("HTTP 429 from /tokens".to_string()));
        }
        let body = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(AggregatorError::Http {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let tokens: Vec<String> = serde_json::from_str(&body)
            .map_err(|e| AggregatorError::Malformed(format!("Token list: {}", e)))?;
        info!("📋 Jupiter lists {} tradable tokens", tokens.len());
        Ok(tokens)
    }

    async fn quote(&self, request: &QuoteRequest) -> QuoteReply {
        let url = format!("{}/quote", self.base_url);
        info!(
            "Requesting quote: {} -> {} amount={} slippage={}bps",
            request.sell_mint, request.buy_mint, request.amount, request.slippage_bps
        );

        let response = match self
            .http_client
            .get(&url)
            .query(&[
                ("inputMint", request.sell_mint.to_string()),
                ("outputMint", request.buy_mint.to_string()),
                ("amount", request.amount.to_string()),
                ("slippageBps", request.slippage_bps.to_string()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return QuoteReply::Transient(format!("Quote request failed: {}", e)),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => decode_quote_response(status, &body, request),
            Err(e) => QuoteReply::Transient(format!("Failed to read quote body: {}", e)),
        }
    }

    async fn swap_transaction(
        &self,
        quote: Quote,
        user_public_key: &Pubkey,
        wrap_and_unwrap_sol: bool,
    ) -> Result<UnsignedTransaction, AggregatorError> {
        let url = format!("{}/swap", self.base_url);
        let payload = json!({
            "quoteResponse": quote.raw,
            "userPublicKey": user_public_key.to_string(),
            "wrapAndUnwrapSol": wrap_and_unwrap_sol,
        });

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AggregatorError::RateLimited("HTTP 429 from /swap".to_string()));
        }
        if let Ok(ErrorBody {
            error_code: Some(code),
            error,
        }) = serde_json::from_str::<ErrorBody>(&body)
        {
            warn!("Swap build rejected with {}", code);
            return Err(AggregatorError::Http {
                status: status.as_u16(),
                message: format!("{}: {}", code, error.unwrap_or_default()),
            });
        }
        if !status.is_success() {
            return Err(AggregatorError::Http {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let swap: SwapBody = serde_json::from_str(&body)
            .map_err(|e| AggregatorError::Malformed(format!("Swap response: {}", e)))?;

        Ok(UnsignedTransaction {
            encoded: swap.swap_transaction,
            last_valid_block_height: swap.last_valid_block_height,
            sell_mint: quote.sell_mint,
            buy_mint: quote.buy_mint,
        })
    }
}
