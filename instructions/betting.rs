//! Boolean-market betting and claim instructions.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

use super::{
    args::{NoArgs, PlaceBetArgs},
    build, optional_readonly, optional_writable, readonly, signer_mut, system_program_id,
    writable,
};
use crate::{
    config::ProtocolConfig,
    discriminator::Opcode,
    pda::{
        affiliate_pda, config_pda, creator_profile_pda, market_pda, position_pda,
        referred_user_pda, whitelist_pda,
    },
    types::{CodecError, CodecResult, Side},
};

/// Inputs for a boolean bet.
///
/// `whitelist_required` should come from
/// [`read_market_access`](crate::state::read_market_access) on the fetched
/// market account, never from a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceBetParams {
    pub market_id: u64,
    pub user: Pubkey,
    pub side: Side,
    pub amount: u64,
    pub whitelist_required: bool,
    /// Wallet of the referring affiliate, if any.
    pub affiliate: Option<Pubkey>,
}

/// Build `place_bet_sol`, or `place_bet_sol_with_affiliate` when an affiliate
/// is given.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. position (writable)
/// 3. whitelist (read-only), or placeholder when not required
/// 4. affiliate (writable), affiliate variant only
/// 5. referred user (writable), affiliate variant only
/// 6. user (signer, writable)
/// 7. system program
pub fn build_place_bet_instruction(
    params: &PlaceBetParams,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    config.bet_limits.check(params.amount)?;
    if params.affiliate == Some(params.user) {
        return Err(CodecError::InvalidArgument(
            "a user cannot refer themselves".to_string(),
        ));
    }

    let program_id = &config.program_id;
    let (config_account, _) = config_pda(program_id)?;
    let (market, _) = market_pda(params.market_id, program_id)?;
    let (position, _) = position_pda(params.market_id, &params.user, program_id)?;
    let whitelist = if params.whitelist_required {
        Some(whitelist_pda(params.market_id, program_id)?.0)
    } else {
        None
    };

    let mut accounts = vec![
        readonly(config_account), // 0: config
        writable(market), // 1: market
        writable(position), // 2: position
        optional_readonly(whitelist, program_id), // 3: whitelist or placeholder
    ];

    let opcode = match params.affiliate {
        Some(affiliate_owner) => {
            let (affiliate, _) = affiliate_pda(&affiliate_owner, program_id)?;
            let (referred_user, _) = referred_user_pda(&params.user, program_id)?;
            accounts.push(writable(affiliate)); // 4: affiliate
            accounts.push(writable(referred_user)); // 5: referred user
            Opcode::PlaceBetSolWithAffiliate
        }
        None => Opcode::PlaceBetSol,
    };
    accounts.push(signer_mut(params.user));
    accounts.push(readonly(system_program_id()));

    debug!(
        market_id = params.market_id,
        side = ?params.side,
        amount = params.amount,
        affiliate = params.affiliate.is_some(),
        "building bet"
    );
    build(
        program_id,
        opcode,
        &PlaceBetArgs {
            outcome: params.side.as_bool(),
            amount: params.amount,
        },
        accounts,
    )
}

/// Which payout a claim collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimKind {
    Winnings,
    Refund,
}

/// Inputs for a boolean-market claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimParams {
    pub market_id: u64,
    pub user: Pubkey,
    pub kind: ClaimKind,
    /// Affiliate wallet recorded for this user, credited on winning claims.
    pub affiliate: Option<Pubkey>,
    /// Owner of the market's creator profile, credited on winning claims.
    pub creator_profile_owner: Option<Pubkey>,
}

impl ClaimParams {
    pub fn winnings(market_id: u64, user: Pubkey) -> Self {
        Self {
            market_id,
            user,
            kind: ClaimKind::Winnings,
            affiliate: None,
            creator_profile_owner: None,
        }
    }

    pub fn refund(market_id: u64, user: Pubkey) -> Self {
        Self {
            kind: ClaimKind::Refund,
            ..Self::winnings(market_id, user)
        }
    }
}

/// Build `claim_winnings_sol` or `claim_refund_sol`.
///
/// # Accounts (winnings)
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. position (writable)
/// 3. affiliate (writable), or placeholder
/// 4. referred user (read-only), or placeholder
/// 5. creator profile (writable), or placeholder
/// 6. user (signer, writable)
/// 7. system program
///
/// # Accounts (refund)
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. position (writable)
/// 3. user (signer, writable)
/// 4. system program
///
/// The affiliate and referred-user slots are filled together or not at all.
pub fn build_claim_instruction(
    params: &ClaimParams,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let (config_account, _) = config_pda(program_id)?;
    let (market, _) = market_pda(params.market_id, program_id)?;
    let (position, _) = position_pda(params.market_id, &params.user, program_id)?;

    let mut accounts = vec![
        readonly(config_account), // 0: config
        writable(market), // 1: market
        writable(position), // 2: position
    ];

    let opcode = match params.kind {
        ClaimKind::Winnings => {
            let (affiliate, referred_user) = match params.affiliate {
                Some(owner) => (
                    Some(affiliate_pda(&owner, program_id)?.0),
                    Some(referred_user_pda(&params.user, program_id)?.0),
                ),
                None => (None, None),
            };
            let creator_profile = match params.creator_profile_owner {
                Some(owner) => Some(creator_profile_pda(&owner, program_id)?.0),
                None => None,
            };
            accounts.push(optional_writable(affiliate, program_id)); // 3
            accounts.push(optional_readonly(referred_user, program_id)); // 4
            accounts.push(optional_writable(creator_profile, program_id)); // 5
            Opcode::ClaimWinningsSol
        }
        ClaimKind::Refund => Opcode::ClaimRefundSol,
    };
    accounts.push(signer_mut(params.user));
    accounts.push(readonly(system_program_id()));

    build(program_id, opcode, &NoArgs, accounts)
}

/// Build one claim instruction per entry, for a single signer.
///
/// There is no batch opcode; the batch is an ordered list of individual
/// claims meant for one transaction, capped at
/// [`ProtocolConfig::max_batch_claims`].
pub fn build_batch_claim_instructions(
    claims: &[ClaimParams],
    config: &ProtocolConfig,
) -> CodecResult<Vec<Instruction>> {
    let Some(first) = claims.first() else {
        return Err(CodecError::InvalidArgument(
            "batch claim needs at least one market".to_string(),
        ));
    };
    if claims.len() > config.max_batch_claims {
        return Err(CodecError::InvalidArgument(format!(
            "batch claim of {} markets exceeds limit {}",
            claims.len(),
            config.max_batch_claims
        )));
    }
    if claims.iter().any(|claim| claim.user != first.user) {
        return Err(CodecError::InvalidArgument(
            "batch claim entries must share one user".to_string(),
        ));
    }

    claims
        .iter()
        .map(|claim| build_claim_instruction(claim, config))
        .collect()
}
