// Bitquery GraphQL pool discovery
//
// Queries successful instructions of the pool program's initialization method,
// oldest block first, and reads the pool and both mints from the instruction's
// account list at fixed positions.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{DiscoveryError, PoolCandidate, PoolDiscovery};
use crate::chain::constants::{POOL_ACCOUNT_INDEX, TOKEN_A_ACCOUNT_INDEX, TOKEN_B_ACCOUNT_INDEX};
use crate::config::DiscoveryConfig;
use crate::utils::retry::{RetryAction, RetryPolicy};

pub struct BitqueryDiscovery {
    http_client: Client,
    api_url: String,
    oauth_token: String,
    query: String,
    rate_limit_policy: RetryPolicy,
}

impl BitqueryDiscovery {
    pub fn new(
        config: &DiscoveryConfig,
        rate_limit_delay: Duration,
        http_timeout: Duration,
    ) -> Result<Self, DiscoveryError> {
        let oauth_token = config
            .oauth_token
            .clone()
            .ok_or(DiscoveryError::MissingCredential)?;

        let http_client = Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        info!(
            "🔎 Bitquery discovery: program={} method={} limit={}",
            config.program_id, config.method, config.limit
        );

        Ok(Self {
            http_client,
            api_url: config.api_url.clone(),
            oauth_token,
            query: build_query(&config.program_id, &config.method, config.limit),
            rate_limit_policy: RetryPolicy::fixed(config.rate_limit_retries, rate_limit_delay),
        })
    }

    async fn fetch_once(&self) -> Result<String, DiscoveryError> {
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.oauth_token)
            .json(&json!({ "query": self.query }))
            .send()
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DiscoveryError::RateLimited("HTTP 429".to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(DiscoveryError::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl PoolDiscovery for BitqueryDiscovery {
    async fn discover(&self) -> Result<Vec<PoolCandidate>, DiscoveryError> {
        debug!("Querying {}", self.api_url);

        let body = self
            .rate_limit_policy
            .retry_async(
                || self.fetch_once(),
                |e| match e {
                    DiscoveryError::RateLimited(_) => RetryAction::Backoff,
                    _ => RetryAction::Stop,
                },
            )
            .await?;

        let candidates = parse_candidates(&body)?;
        if candidates.is_empty() {
            warn!("⚠️  No pool initializations found");
        } else {
            info!("🆕 Discovered {} pool candidate(s)", candidates.len());
        }
        Ok(candidates)
    }
}

/// GraphQL document for the pool-initialization search
pub fn build_query(program_id: &str, method: &str, limit: u32) -> String {
    format!(
        r#"{{
  Solana {{
    Instructions(
      where: {{
        Transaction: {{ Result: {{ Success: true }} }}
        Instruction: {{
          Program: {{
            Method: {{ is: "{method}" }}
            Address: {{ is: "{program_id}" }}
          }}
        }}
      }}
      limit: {{ count: {limit} }}
      orderBy: {{ ascending: Block_Date }}
    ) {{
      Instruction {{
        Accounts {{
          Address
        }}
      }}
    }}
  }}
}}"#
    )
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<DataBody>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DataBody {
    solana: SolanaBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SolanaBody {
    #[serde(default)]
    instructions: Vec<InstructionRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstructionRow {
    instruction: InstructionBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstructionBody {
    #[serde(default)]
    accounts: Vec<AccountBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccountBody {
    address: String,
}

/// Decode an indexer response into candidates, in response order
pub fn parse_candidates(body: &str) -> Result<Vec<PoolCandidate>, DiscoveryError> {
    let response: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| DiscoveryError::Malformed(e.to_string()))?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(DiscoveryError::Query(messages.join("; ")));
    }

    let data = response
        .data
        .ok_or_else(|| DiscoveryError::Malformed("response has no data".to_string()))?;

    let candidates = data
        .solana
        .instructions
        .into_iter()
        .filter_map(|row| {
            let accounts = row.instruction.accounts;
            if accounts.len() <= TOKEN_B_ACCOUNT_INDEX {
                warn!(
                    "Skipping instruction with {} accounts, need at least {}",
                    accounts.len(),
                    TOKEN_B_ACCOUNT_INDEX + 1
                );
                return None;
            }
            Some(PoolCandidate::new(
                accounts[POOL_ACCOUNT_INDEX].address.clone(),
                accounts[TOKEN_A_ACCOUNT_INDEX].address.clone(),
                accounts[TOKEN_B_ACCOUNT_INDEX].address.clone(),
            ))
        })
        .collect();

    Ok(candidates)
}
