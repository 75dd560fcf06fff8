pub mod address;
pub mod confirmation;
pub mod constants;
pub mod liquidity;
pub mod network;
pub mod transaction_sender;

pub use address::{is_valid_address, parse_address};
pub use confirmation::{Confirmation, ConfirmationWatcher};
pub use constants::{USDC_MINT, WSOL_MINT};
pub use liquidity::LiquidityInspector;
pub use network::{NetworkError, RpcNetwork, SendOptions, SwapNetwork};
pub use transaction_sender::TransactionSender;
