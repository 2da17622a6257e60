//! Race (multi-outcome) market instructions.
//!
//! Account shapes follow the boolean builders; race accounts are addressed
//! with the race seeds, and race whitelists hang off the race market's
//! address instead of its id.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

use super::{
    args::{
        CreateRaceMarketArgs, ExtendMarketArgs, NoArgs, RaceBetArgs, RaceOutcomeArgs,
        RaceVoteArgs, ReasonArgs,
    },
    build, check_outcome_index, check_outcome_labels, check_reason, check_schedule,
    market::MarketTerms,
    optional_readonly, optional_writable, readonly, signer, signer_mut, system_program_id,
    writable,
};
use crate::{
    config::ProtocolConfig,
    discriminator::Opcode,
    pda::{
        affiliate_pda, config_pda, creator_profile_pda, dispute_meta_pda, race_market_pda,
        race_position_pda, race_whitelist_pda, referred_user_pda,
    },
    types::{CodecError, CodecResult},
};

/// Inputs for a race market creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRaceMarketParams {
    /// The config account's current race market count.
    pub market_id: u64,
    pub creator: Pubkey,
    pub terms: MarketTerms,
    pub outcome_labels: Vec<String>,
    pub has_creator_profile: bool,
}

/// Build `create_race_market_sol`.
///
/// # Accounts
///
/// 0. config (writable)
/// 1. race market (writable)
/// 2. creator profile (writable), or placeholder
/// 3. creator (signer, writable)
/// 4. treasury (writable)
/// 5. system program
pub fn build_create_race_market_instruction(
    params: &CreateRaceMarketParams,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    params.terms.check(config)?;
    check_outcome_labels(&params.outcome_labels)?;
    let program_id = &config.program_id;
    let creator_profile = if params.has_creator_profile {
        Some(creator_profile_pda(&params.creator, program_id)?.0)
    } else {
        None
    };
    let accounts = vec![
        writable(config_pda(program_id)?.0),
        writable(race_market_pda(params.market_id, program_id)?.0),
        optional_writable(creator_profile, program_id),
        signer_mut(params.creator),
        writable(config.treasury),
        readonly(system_program_id()),
    ];

    let terms = &params.terms;
    build(
        program_id,
        Opcode::CreateRaceMarketSol,
        &CreateRaceMarketArgs {
            question: terms.question.clone(),
            outcome_labels: params.outcome_labels.clone(),
            closing_time: terms.closing_time,
            resolution_time: terms.resolution_time,
            resolution_mode: terms.resolution_mode.as_u8(),
            oracle_host: terms.oracle_host,
            creator_fee_bps: terms.creator_fee_bps,
        },
        accounts,
    )
}

/// Inputs for a race bet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceBetParams {
    pub market_id: u64,
    pub user: Pubkey,
    pub outcome_index: u8,
    pub amount: u64,
    pub whitelist_required: bool,
    pub affiliate: Option<Pubkey>,
}

/// Build `bet_on_race_outcome_sol`, or its `_with_affiliate` variant.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. race market (writable)
/// 2. race position (writable)
/// 3. race whitelist (read-only), or placeholder when not required
/// 4. affiliate (writable), affiliate variant only
/// 5. referred user (writable), affiliate variant only
/// 6. user (signer, writable)
/// 7. system program
pub fn build_race_bet_instruction(
    params: &RaceBetParams,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_outcome_index(params.outcome_index)?;
    config.bet_limits.check(params.amount)?;
    if params.affiliate == Some(params.user) {
        return Err(CodecError::InvalidArgument(
            "a user cannot refer themselves".to_string(),
        ));
    }

    let program_id = &config.program_id;
    let (race_market, _) = race_market_pda(params.market_id, program_id)?;
    let whitelist = if params.whitelist_required {
        Some(race_whitelist_pda(&race_market, program_id)?.0)
    } else {
        None
    };
    let mut accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(race_market),
        writable(race_position_pda(params.market_id, &params.user, program_id)?.0),
        optional_readonly(whitelist, program_id),
    ];

    let opcode = match params.affiliate {
        Some(owner) => {
            accounts.push(writable(affiliate_pda(&owner, program_id)?.0));
            accounts.push(writable(referred_user_pda(&params.user, program_id)?.0));
            Opcode::BetOnRaceOutcomeSolWithAffiliate
        }
        None => Opcode::BetOnRaceOutcomeSol,
    };
    accounts.push(signer_mut(params.user));
    accounts.push(readonly(system_program_id()));

    debug!(
        market_id = params.market_id,
        outcome_index = params.outcome_index,
        amount = params.amount,
        "building race bet"
    );
    build(
        program_id,
        opcode,
        &RaceBetArgs {
            outcome_index: params.outcome_index,
            amount: params.amount,
        },
        accounts,
    )
}

fn race_claim(
    opcode: Opcode,
    market_id: u64,
    user: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(race_market_pda(market_id, program_id)?.0),
        writable(race_position_pda(market_id, user, program_id)?.0),
        signer_mut(*user),
        readonly(system_program_id()),
    ];
    build(program_id, opcode, &NoArgs, accounts)
}

/// Build `claim_race_winnings_sol`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. race market (writable)
/// 2. race position (writable)
/// 3. user (signer, writable)
/// 4. system program
pub fn build_claim_race_winnings_instruction(
    market_id: u64,
    user: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    race_claim(Opcode::ClaimRaceWinningsSol, market_id, user, config)
}

/// Build `claim_race_refund_sol`. Same accounts as winnings.
pub fn build_claim_race_refund_instruction(
    market_id: u64,
    user: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    race_claim(Opcode::ClaimRaceRefundSol, market_id, user, config)
}

fn race_authority(
    opcode: Opcode,
    market_id: u64,
    authority: &Pubkey,
    config: &ProtocolConfig,
    args: &impl borsh::BorshSerialize,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(race_market_pda(market_id, program_id)?.0),
        signer(*authority),
    ];
    build(program_id, opcode, args, accounts)
}

/// Build `propose_race_resolution`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. race market (writable)
/// 2. proposer (signer)
pub fn build_propose_race_resolution_instruction(
    market_id: u64,
    proposer: &Pubkey,
    winning_outcome: u8,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_outcome_index(winning_outcome)?;
    race_authority(
        Opcode::ProposeRaceResolution,
        market_id,
        proposer,
        config,
        &RaceOutcomeArgs { winning_outcome },
    )
}

/// Build `resolve_race`. Same accounts as proposal, with the resolver signing.
pub fn build_resolve_race_instruction(
    market_id: u64,
    resolver: &Pubkey,
    winning_outcome: u8,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_outcome_index(winning_outcome)?;
    race_authority(
        Opcode::ResolveRace,
        market_id,
        resolver,
        config,
        &RaceOutcomeArgs { winning_outcome },
    )
}

/// Build `finalize_race_resolution`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. race market (writable)
/// 2. caller (signer, writable)
pub fn build_finalize_race_resolution_instruction(
    market_id: u64,
    caller: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(race_market_pda(market_id, program_id)?.0),
        signer_mut(*caller),
    ];
    build(program_id, Opcode::FinalizeRaceResolution, &NoArgs, accounts)
}

/// Build `flag_race_dispute`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. race market (writable)
/// 2. dispute meta (writable)
/// 3. disputer (signer, writable)
/// 4. system program
pub fn build_flag_race_dispute_instruction(
    market_id: u64,
    disputer: &Pubkey,
    reason: &str,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_reason(reason)?;
    let program_id = &config.program_id;
    let (race_market, _) = race_market_pda(market_id, program_id)?;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(race_market),
        writable(dispute_meta_pda(&race_market, program_id)?.0),
        signer_mut(*disputer),
        readonly(system_program_id()),
    ];
    build(
        program_id,
        Opcode::FlagRaceDispute,
        &ReasonArgs {
            reason: reason.to_string(),
        },
        accounts,
    )
}

/// Build `vote_council_race`.
///
/// # Accounts
///
/// 0. race market (writable)
/// 1. council member (signer)
pub fn build_vote_council_race_instruction(
    market_id: u64,
    member: &Pubkey,
    outcome_index: u8,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_outcome_index(outcome_index)?;
    let program_id = &config.program_id;
    let accounts = vec![
        writable(race_market_pda(market_id, program_id)?.0),
        signer(*member),
    ];
    build(
        program_id,
        Opcode::VoteCouncilRace,
        &RaceVoteArgs { outcome_index },
        accounts,
    )
}

/// Build `close_race_market`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. race market (writable)
/// 2. caller (signer)
pub fn build_close_race_market_instruction(
    market_id: u64,
    caller: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    race_authority(Opcode::CloseRaceMarket, market_id, caller, config, &NoArgs)
}

/// Build `extend_race_market`. Accounts as [`build_close_race_market_instruction`].
pub fn build_extend_race_market_instruction(
    market_id: u64,
    authority: &Pubkey,
    new_closing_time: i64,
    new_resolution_time: Option<i64>,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    if let Some(resolution_time) = new_resolution_time {
        check_schedule(new_closing_time, resolution_time)?;
    }
    race_authority(
        Opcode::ExtendRaceMarket,
        market_id,
        authority,
        config,
        &ExtendMarketArgs {
            new_closing_time,
            new_resolution_time,
        },
    )
}

/// Build `cancel_race`. Accounts as [`build_close_race_market_instruction`].
pub fn build_cancel_race_instruction(
    market_id: u64,
    authority: &Pubkey,
    reason: &str,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_reason(reason)?;
    race_authority(
        Opcode::CancelRace,
        market_id,
        authority,
        config,
        &ReasonArgs {
            reason: reason.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::LAMPORTS_PER_SOL,
        discriminator,
        instructions::{
            args::{decode_instruction_data, DecodedInstruction},
            market::tests::terms,
        },
    };

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Team {i}")).collect()
    }

    #[test]
    fn test_create_race_market() {
        let config = ProtocolConfig::default();
        let params = CreateRaceMarketParams {
            market_id: 3,
            creator: Pubkey::new_unique(),
            terms: terms(),
            outcome_labels: labels(3),
            has_creator_profile: false,
        };
        let ix = build_create_race_market_instruction(&params, &config).unwrap();
        assert_eq!(&ix.data[..8], &discriminator::CREATE_RACE_MARKET_SOL);
        assert_eq!(
            ix.accounts[1].pubkey,
            race_market_pda(3, &config.program_id).unwrap().0
        );
        match decode_instruction_data(&ix.data).unwrap().1 {
            DecodedInstruction::CreateRaceMarketSol(args) => {
                assert_eq!(args.outcome_labels, labels(3))
            }
            other => panic!("unexpected decode: {other:?}"),
        }

        for bad in [labels(1), labels(11), vec!["A".to_string(), String::new()]] {
            let params = CreateRaceMarketParams {
                outcome_labels: bad,
                ..params.clone()
            };
            assert!(build_create_race_market_instruction(&params, &config).is_err());
        }
    }

    #[test]
    fn test_race_bet_accounts() {
        let config = ProtocolConfig::default();
        let program = config.program_id;
        let params = RaceBetParams {
            market_id: 3,
            user: Pubkey::new_unique(),
            outcome_index: 2,
            amount: LAMPORTS_PER_SOL,
            whitelist_required: true,
            affiliate: None,
        };
        let ix = build_race_bet_instruction(&params, &config).unwrap();
        let race_market = race_market_pda(3, &program).unwrap().0;

        assert_eq!(&ix.data[..8], &discriminator::BET_ON_RACE_OUTCOME_SOL);
        assert_eq!(ix.data[8], 2);
        assert_eq!(&ix.data[9..], &LAMPORTS_PER_SOL.to_le_bytes());
        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(
            ix.accounts[2].pubkey,
            race_position_pda(3, &params.user, &program).unwrap().0
        );
        assert_eq!(
            ix.accounts[3].pubkey,
            race_whitelist_pda(&race_market, &program).unwrap().0
        );

        let with_affiliate = RaceBetParams {
            affiliate: Some(Pubkey::new_unique()),
            whitelist_required: false,
            ..params.clone()
        };
        let ix = build_race_bet_instruction(&with_affiliate, &config).unwrap();
        assert_eq!(
            &ix.data[..8],
            &discriminator::BET_ON_RACE_OUTCOME_SOL_WITH_AFFILIATE
        );
        assert_eq!(ix.accounts.len(), 8);
        assert_eq!(ix.accounts[3].pubkey, program);

        let bad_index = RaceBetParams {
            outcome_index: 10,
            ..params
        };
        assert!(build_race_bet_instruction(&bad_index, &config).is_err());
    }

    #[test]
    fn test_race_resolution_flow() {
        let config = ProtocolConfig::default();
        let authority = Pubkey::new_unique();

        let propose =
            build_propose_race_resolution_instruction(3, &authority, 4, &config).unwrap();
        assert_eq!(propose.data[8..], [4]);
        assert!(build_resolve_race_instruction(3, &authority, 10, &config).is_err());

        let finalize = build_finalize_race_resolution_instruction(3, &authority, &config).unwrap();
        assert_eq!(finalize.data, discriminator::FINALIZE_RACE_RESOLUTION.to_vec());

        let vote = build_vote_council_race_instruction(3, &authority, 1, &config).unwrap();
        assert_eq!(&vote.data[..8], &discriminator::VOTE_COUNCIL_RACE);

        let dispute = build_flag_race_dispute_instruction(3, &authority, "late data", &config)
            .unwrap();
        let race_market = race_market_pda(3, &config.program_id).unwrap().0;
        assert_eq!(
            dispute.accounts[2].pubkey,
            dispute_meta_pda(&race_market, &config.program_id).unwrap().0
        );
    }

    #[test]
    fn test_race_claims_and_lifecycle() {
        let config = ProtocolConfig::default();
        let user = Pubkey::new_unique();

        let win = build_claim_race_winnings_instruction(3, &user, &config).unwrap();
        let refund = build_claim_race_refund_instruction(3, &user, &config).unwrap();
        assert_eq!(win.accounts, refund.accounts);
        assert_ne!(win.data, refund.data);

        let close = build_close_race_market_instruction(3, &user, &config).unwrap();
        assert_eq!(close.data, discriminator::CLOSE_RACE_MARKET.to_vec());
        let extend =
            build_extend_race_market_instruction(3, &user, 10, Some(20), &config).unwrap();
        assert_eq!(extend.data.len(), 8 + 8 + 1 + 8);
        let cancel = build_cancel_race_instruction(3, &user, "void", &config).unwrap();
        assert_eq!(&cancel.data[..8], &discriminator::CANCEL_RACE);
    }
}
