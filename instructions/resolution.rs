//! Boolean-market resolution instructions: propose, resolve, finalize,
//! dispute and council vote.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use super::{
    args::{NoArgs, OutcomeArgs, ReasonArgs, VoteCouncilArgs},
    build, check_reason, optional_writable, readonly, signer, signer_mut, system_program_id,
    writable,
};
use crate::{
    config::ProtocolConfig,
    discriminator::Opcode,
    pda::{config_pda, creator_profile_pda, dispute_meta_pda, market_pda},
    types::{CodecResult, Side},
};

fn config_market_signer(
    opcode: Opcode,
    market_id: u64,
    authority: &Pubkey,
    outcome: Side,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(market_pda(market_id, program_id)?.0),
        signer(*authority),
    ];
    build(
        program_id,
        opcode,
        &OutcomeArgs {
            outcome: outcome.as_bool(),
        },
        accounts,
    )
}

/// Build `propose_resolution` (creator-proposed markets).
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. proposer (signer)
pub fn build_propose_resolution_instruction(
    market_id: u64,
    proposer: &Pubkey,
    outcome: Side,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    config_market_signer(Opcode::ProposeResolution, market_id, proposer, outcome, config)
}

/// Build `resolve_market` (host oracle).
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. resolver (signer)
pub fn build_resolve_market_instruction(
    market_id: u64,
    resolver: &Pubkey,
    outcome: Side,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    config_market_signer(Opcode::ResolveMarket, market_id, resolver, outcome, config)
}

/// Build `finalize_resolution` once the dispute window has passed.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. creator profile (writable), or placeholder
/// 3. caller (signer, writable)
pub fn build_finalize_resolution_instruction(
    market_id: u64,
    caller: &Pubkey,
    creator_profile_owner: Option<&Pubkey>,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let creator_profile = match creator_profile_owner {
        Some(owner) => Some(creator_profile_pda(owner, program_id)?.0),
        None => None,
    };
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(market_pda(market_id, program_id)?.0),
        optional_writable(creator_profile, program_id),
        signer_mut(*caller),
    ];
    build(program_id, Opcode::FinalizeResolution, &NoArgs, accounts)
}

/// Build `flag_dispute`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. dispute meta (writable)
/// 3. disputer (signer, writable)
/// 4. system program
pub fn build_flag_dispute_instruction(
    market_id: u64,
    disputer: &Pubkey,
    reason: &str,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_reason(reason)?;
    let program_id = &config.program_id;
    let (market, _) = market_pda(market_id, program_id)?;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(market),
        writable(dispute_meta_pda(&market, program_id)?.0),
        signer_mut(*disputer),
        readonly(system_program_id()),
    ];
    build(
        program_id,
        Opcode::FlagDispute,
        &ReasonArgs {
            reason: reason.to_string(),
        },
        accounts,
    )
}

/// Build `vote_council`.
///
/// # Accounts
///
/// 0. market (writable)
/// 1. council member (signer)
pub fn build_vote_council_instruction(
    market_id: u64,
    member: &Pubkey,
    vote_yes: bool,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        writable(market_pda(market_id, program_id)?.0),
        signer(*member),
    ];
    build(
        program_id,
        Opcode::VoteCouncil,
        &VoteCouncilArgs { vote_yes },
        accounts,
    )
}
