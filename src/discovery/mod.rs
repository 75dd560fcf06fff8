//! New-pool discovery
//!
//! The orchestrator asks a [`PoolDiscovery`] for a fresh batch of candidates at the
//! start of every attempt. [`BitqueryDiscovery`] is the production source.

pub mod bitquery;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub use bitquery::BitqueryDiscovery;

/// Freshly initialized pool as reported by the indexer
///
/// Addresses are kept as raw strings; they are validated by the pipeline before any
/// network call uses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolCandidate {
    pub address: String,
    /// Coin mint, the token being bought
    pub token_a: String,
    /// Pc mint, the token being sold
    pub token_b: String,
}

impl PoolCandidate {
    pub fn new(address: impl Into<String>, token_a: impl Into<String>, token_b: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token_a: token_a.into(),
            token_b: token_b.into(),
        }
    }
}

impl fmt::Display for PoolCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool {} ({} / {})", self.address, self.token_a, self.token_b)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("Indexer credential is not configured")]
    MissingCredential,

    #[error("Indexer rate limited the query: {0}")]
    RateLimited(String),

    #[error("Indexer transport error: {0}")]
    Transport(String),

    #[error("Indexer returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Indexer query failed: {0}")]
    Query(String),

    #[error("Malformed indexer response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait PoolDiscovery: Send + Sync {
    /// One discovery round, candidates in indexer order
    async fn discover(&self) -> Result<Vec<PoolCandidate>, DiscoveryError>;
}
