// Solana Pool Sniper Library
//
// Components for an agent that swaps into freshly created Raydium pools:
// - Pool discovery through the Bitquery indexer
// - Jupiter quote and swap-transaction retrieval
// - Transaction signing, submission and confirmation polling
// - A bounded retry orchestrator driving discovery and swaps
// - Per-run swap records and summaries

pub mod aggregator;
pub mod chain;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod orchestrator;
pub mod reporting;
pub mod swap;
pub mod utils;

pub use config::Config;
pub use context::AgentContext;
pub use error::{Disposition, SwapError, SwapResult};
pub use orchestrator::{Orchestrator, RunReport, RunState};
