//! Program-derived address helpers.
//!
//! Seed order and literals mirror the program's account constraints exactly;
//! a wrong seed derives an address that does not exist on-chain and the
//! transaction fails at execution, not here.

use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::seeds,
    types::{CodecError, CodecResult},
};

/// Derive a PDA, scanning bumps from 255 down.
///
/// "No valid bump" is practically unreachable and surfaces as
/// [`CodecError::PdaDerivation`].
pub fn derive(
    label: &'static str,
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> CodecResult<(Pubkey, u8)> {
    Pubkey::try_find_program_address(seeds, program_id).ok_or(CodecError::PdaDerivation(label))
}

pub fn config_pda(program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive("config", &[seeds::CONFIG], program_id)
}

pub fn market_pda(market_id: u64, program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive("market", &[seeds::MARKET, &market_id.to_le_bytes()], program_id)
}

pub fn position_pda(
    market_id: u64,
    user: &Pubkey,
    program_id: &Pubkey,
) -> CodecResult<(Pubkey, u8)> {
    derive(
        "position",
        &[seeds::POSITION, &market_id.to_le_bytes(), user.as_ref()],
        program_id,
    )
}

pub fn whitelist_pda(market_id: u64, program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive(
        "whitelist",
        &[seeds::WHITELIST, &market_id.to_le_bytes()],
        program_id,
    )
}

pub fn race_market_pda(market_id: u64, program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive(
        "race market",
        &[seeds::RACE_MARKET, &market_id.to_le_bytes()],
        program_id,
    )
}

pub fn race_position_pda(
    market_id: u64,
    user: &Pubkey,
    program_id: &Pubkey,
) -> CodecResult<(Pubkey, u8)> {
    derive(
        "race position",
        &[seeds::RACE_POSITION, &market_id.to_le_bytes(), user.as_ref()],
        program_id,
    )
}

/// Race whitelists are keyed by the race market's address, not its id.
pub fn race_whitelist_pda(race_market: &Pubkey, program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive(
        "race whitelist",
        &[seeds::RACE_WHITELIST, race_market.as_ref()],
        program_id,
    )
}

pub fn affiliate_pda(owner: &Pubkey, program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive("affiliate", &[seeds::AFFILIATE, owner.as_ref()], program_id)
}

pub fn referred_user_pda(user: &Pubkey, program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive("referred user", &[seeds::REFERRED_USER, user.as_ref()], program_id)
}

pub fn creator_profile_pda(owner: &Pubkey, program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive(
        "creator profile",
        &[seeds::CREATOR_PROFILE, owner.as_ref()],
        program_id,
    )
}

/// Works for both boolean and race markets.
pub fn dispute_meta_pda(market: &Pubkey, program_id: &Pubkey) -> CodecResult<(Pubkey, u8)> {
    derive("dispute meta", &[seeds::DISPUTE_META, market.as_ref()], program_id)
}
