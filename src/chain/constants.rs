// Well-known addresses, endpoints and wire constants
//
// Program and mint IDs use `solana_program::pubkey!` so a typo fails at compile time
// rather than at the first RPC call.

use solana_program::pubkey::Pubkey;

/// Wrapped SOL token mint address (9 decimals)
pub const WSOL_MINT: Pubkey = solana_program::pubkey!("So11111111111111111111111111111111111111112");

/// USDC token mint address (6 decimals)
pub const USDC_MINT: Pubkey = solana_program::pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");

/// Raydium AMM v4 program, whose pool initialization is what discovery watches
pub const RAYDIUM_AMM_V4: Pubkey =
    solana_program::pubkey!("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");
pub const RAYDIUM_AMM_V4_PROGRAM_ID: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_JUPITER_API_BASE_URL: &str = "https://quote-api.jup.ag/v6";
pub const DEFAULT_BITQUERY_API_URL: &str = "https://streaming.bitquery.io/eap";
pub const DEFAULT_DISCOVERY_METHOD: &str = "initializeUserWithNonce";

/// Node-level resubmissions requested with every sendTransaction
pub const DEFAULT_SEND_MAX_RETRIES: usize = 4;

// Positions inside the pool-initialization instruction's account list
pub const POOL_ACCOUNT_INDEX: usize = 4;
pub const TOKEN_A_ACCOUNT_INDEX: usize = 8;
pub const TOKEN_B_ACCOUNT_INDEX: usize = 9;

// Jupiter structured error codes
pub const ERROR_CODE_TOKEN_NOT_TRADABLE: &str = "TOKEN_NOT_TRADABLE";
pub const ERROR_CODE_COULD_NOT_FIND_ANY_ROUTE: &str = "COULD_NOT_FIND_ANY_ROUTE";
pub const ERROR_CODE_NO_ROUTES_FOUND: &str = "NO_ROUTES_FOUND";
pub const ERROR_CODE_ROUTE_PLAN_PARTIAL: &str = "ROUTE_PLAN_DOES_NOT_CONSUME_ALL_THE_AMOUNT";
