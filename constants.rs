//! Hardcoded constants for the parimutuel market program.
//!
//! Contains the program ID, treasury, PDA seed literals, and the default
//! protocol parameters that back [`crate::config::ProtocolConfig::default`].

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Parimutuel market program ID (mainnet production)
pub const PROGRAM_ID: &str = "H35t27SLhuC8tCsusVZb2E1ZamvawCq1VLs6ZFLmcuxa";

/// Protocol treasury receiving creation fees (mainnet)
pub const TREASURY: &str = "6fd1GSGPyriP1NZ2RDqSpe9bQVGqiA1ZeXZvrtMnfwtF";

/// PDA seed literals. Part of the program's public interface.
pub mod seeds {
    pub const CONFIG: &[u8] = b"config";
    pub const MARKET: &[u8] = b"market";
    pub const POSITION: &[u8] = b"position";
    pub const WHITELIST: &[u8] = b"whitelist";
    pub const RACE_MARKET: &[u8] = b"race";
    pub const RACE_POSITION: &[u8] = b"race_position";
    pub const RACE_WHITELIST: &[u8] = b"race_whitelist";
    pub const AFFILIATE: &[u8] = b"affiliate";
    pub const REFERRED_USER: &[u8] = b"referred";
    pub const CREATOR_PROFILE: &[u8] = b"creator_profile";
    pub const DISPUTE_META: &[u8] = b"dispute_meta";
}

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Smallest accepted bet (0.01 SOL)
pub const MIN_BET_LAMPORTS: u64 = 10_000_000;

/// Largest accepted single bet (100 SOL)
pub const MAX_BET_LAMPORTS: u64 = 100 * LAMPORTS_PER_SOL;

pub const BPS_DENOMINATOR: u64 = 10_000;

/// Platform fee per layer, taken from gross profit at claim time.
pub const OFFICIAL_FEE_BPS: u16 = 250;
pub const LAB_FEE_BPS: u16 = 300;
pub const PRIVATE_FEE_BPS: u16 = 200;

/// Share of the platform fee routed to a referring affiliate.
pub const AFFILIATE_FEE_BPS: u16 = 100;

/// Upper bound on a creator's fee.
pub const MAX_CREATOR_FEE_BPS: u16 = 200;

pub const MAX_QUESTION_LEN: usize = 200;
pub const MAX_REASON_LEN: usize = 200;
pub const MAX_DISPLAY_NAME_LEN: usize = 32;
pub const MAX_OUTCOME_LABEL_LEN: usize = 32;
pub const MIN_AFFILIATE_CODE_LEN: usize = 3;
pub const MAX_AFFILIATE_CODE_LEN: usize = 16;

pub const MIN_RACE_OUTCOMES: usize = 2;
pub const MAX_RACE_OUTCOMES: usize = 10;

/// Claims packed into one transaction by the batch builder.
pub const MAX_BATCH_CLAIMS: usize = 8;

/// Minimum gap between betting close and the event (hours).
pub const MIN_EVENT_BUFFER_HOURS: f64 = 12.0;

/// Recommended gap between betting close and the event (hours).
pub const RECOMMENDED_EVENT_BUFFER_HOURS: f64 = 18.0;

/// Sources accepted as verifiable resolution data.
pub const APPROVED_SOURCES: [&str; 24] = [
    "coingecko",
    "coinmarketcap",
    "binance",
    "coinbase",
    "kraken",
    "tradingview",
    "yahoo finance",
    "bloomberg",
    "reuters",
    "associated press",
    "ap news",
    "bbc",
    "espn",
    "nba.com",
    "nfl.com",
    "mlb.com",
    "fifa",
    "uefa",
    "federal reserve",
    "bls.gov",
    "sec.gov",
    "noaa",
    "weather.gov",
    "solscan",
];

/// Get the program ID
pub fn program_id() -> Pubkey {
    Pubkey::from_str(PROGRAM_ID).expect("Invalid program ID")
}

/// Get the protocol treasury
pub fn treasury() -> Pubkey {
    Pubkey::from_str(TREASURY).expect("Invalid treasury")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_ids_parse() {
        assert_ne!(program_id(), treasury());
        assert_eq!(program_id().to_string(), PROGRAM_ID);
    }
}
