pub mod builder;
pub mod pipeline;
pub mod quote;
pub mod tradability;

pub use builder::TransactionBuilder;
pub use pipeline::{SwapPipeline, SwapSuccess};
pub use quote::QuoteFetcher;
pub use tradability::TradabilityChecker;
