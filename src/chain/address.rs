// Base58 address validation
//
// Gate run before any network call that takes an address, so malformed indexer output
// fails locally instead of as a confusing aggregator or RPC error.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::error::{SwapError, SwapResult};

pub const MIN_ADDRESS_LEN: usize = 32;
pub const MAX_ADDRESS_LEN: usize = 44;

/// Bitcoin base58 alphabet: no `0`, `O`, `I` or `l`
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// True iff `candidate` is 32–44 base58 characters
pub fn is_valid_address(candidate: &str) -> bool {
    let len = candidate.len();
    (MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&len)
        && candidate.chars().all(|c| BASE58_ALPHABET.contains(c))
}

/// Validate and decode into a `Pubkey`
pub fn parse_address(candidate: &str) -> SwapResult<Pubkey> {
    if !is_valid_address(candidate) {
        return Err(SwapError::InvalidAddress(candidate.to_string()));
    }
    Pubkey::from_str(candidate).map_err(|_| SwapError::InvalidAddress(candidate.to_string()))
}
