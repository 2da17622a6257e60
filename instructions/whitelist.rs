//! Whitelist membership for private boolean and race markets.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::{
    args::WhitelistUserArgs, build, readonly, signer, signer_mut, system_program_id, writable,
};
use crate::{
    config::ProtocolConfig,
    discriminator::Opcode,
    pda::{market_pda, race_market_pda, race_whitelist_pda, whitelist_pda},
    types::CodecResult,
};

/// Which market family a whitelist belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistTarget {
    Market(u64),
    RaceMarket(u64),
}

fn market_and_whitelist(
    target: WhitelistTarget,
    program_id: &Pubkey,
) -> CodecResult<(Pubkey, Pubkey)> {
    match target {
        WhitelistTarget::Market(id) => Ok((
            market_pda(id, program_id)?.0,
            whitelist_pda(id, program_id)?.0,
        )),
        WhitelistTarget::RaceMarket(id) => {
            let (race_market, _) = race_market_pda(id, program_id)?;
            Ok((race_market, race_whitelist_pda(&race_market, program_id)?.0))
        }
    }
}

/// Build `add_to_whitelist` or `add_to_race_whitelist`.
///
/// # Accounts
///
/// 0. market or race market (read-only)
/// 1. whitelist (writable)
/// 2. creator (signer, writable)
/// 3. system program
pub fn build_add_to_whitelist_instruction(
    target: WhitelistTarget,
    creator: &Pubkey,
    user: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let (market, whitelist) = market_and_whitelist(target, program_id)?;
    let opcode = match target {
        WhitelistTarget::Market(_) => Opcode::AddToWhitelist,
        WhitelistTarget::RaceMarket(_) => Opcode::AddToRaceWhitelist,
    };
    let accounts: Vec<AccountMeta> = vec![
        readonly(market),
        writable(whitelist),
        signer_mut(*creator),
        readonly(system_program_id()),
    ];
    build(program_id, opcode, &WhitelistUserArgs { user: *user }, accounts)
}

/// Build `remove_from_whitelist` or `remove_from_race_whitelist`.
///
/// # Accounts
///
/// 0. market or race market (read-only)
/// 1. whitelist (writable)
/// 2. creator (signer)
pub fn build_remove_from_whitelist_instruction(
    target: WhitelistTarget,
    creator: &Pubkey,
    user: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let (market, whitelist) = market_and_whitelist(target, program_id)?;
    let opcode = match target {
        WhitelistTarget::Market(_) => Opcode::RemoveFromWhitelist,
        WhitelistTarget::RaceMarket(_) => Opcode::RemoveFromRaceWhitelist,
    };
    let accounts = vec![readonly(market), writable(whitelist), signer(*creator)];
    build(program_id, opcode, &WhitelistUserArgs { user: *user }, accounts)
}
