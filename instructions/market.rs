//! Boolean-market lifecycle instructions: create, close, extend, cancel.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use super::{
    args::{CreateLabMarketArgs, CreatePrivateMarketArgs, ExtendMarketArgs, NoArgs, ReasonArgs},
    build, check_creator_fee, check_question, check_reason, check_schedule, optional_writable,
    readonly, signer, signer_mut, system_program_id, writable,
};
use crate::{
    config::ProtocolConfig,
    discriminator::Opcode,
    pda::{config_pda, creator_profile_pda, market_pda, whitelist_pda},
    types::{AccessGate, CodecError, CodecResult, ResolutionMode},
};

/// Terms shared by every market creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketTerms {
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub resolution_mode: ResolutionMode,
    pub oracle_host: Option<Pubkey>,
    pub creator_fee_bps: u16,
}

impl MarketTerms {
    pub(crate) fn check(&self, config: &ProtocolConfig) -> CodecResult<()> {
        check_question(&self.question)?;
        check_schedule(self.closing_time, self.resolution_time)?;
        check_creator_fee(self.creator_fee_bps, config.fees.max_creator_fee_bps)?;
        if self.resolution_mode == ResolutionMode::HostOracle && self.oracle_host.is_none() {
            return Err(CodecError::InvalidArgument(
                "host-oracle resolution needs an oracle host".to_string(),
            ));
        }
        Ok(())
    }
}

/// Inputs for a market creation.
///
/// `market_id` is the config account's current market count, see
/// [`next_market_id`](crate::state::next_market_id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMarketParams {
    pub market_id: u64,
    pub creator: Pubkey,
    pub terms: MarketTerms,
    /// Set when the creator has a creator profile to credit.
    pub has_creator_profile: bool,
}

/// Private-market access settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivateAccess {
    pub access_gate: AccessGate,
    pub invite_hash: Option<[u8; 32]>,
}

impl PrivateAccess {
    fn check(&self) -> CodecResult<()> {
        match (self.access_gate, self.invite_hash.is_some()) {
            (AccessGate::InviteHash, false) => Err(CodecError::InvalidArgument(
                "invite-hash gate needs an invite hash".to_string(),
            )),
            (AccessGate::Public | AccessGate::Whitelist, true) => Err(CodecError::InvalidArgument(
                "invite hash is only allowed with the invite-hash gate".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn creator_profile_slot(
    params: &CreateMarketParams,
    program_id: &Pubkey,
) -> CodecResult<Option<Pubkey>> {
    if !params.has_creator_profile {
        return Ok(None);
    }
    Ok(Some(creator_profile_pda(&params.creator, program_id)?.0))
}

/// Build `create_lab_market_sol`.
///
/// # Accounts
///
/// 0. config (writable)
/// 1. market (writable)
/// 2. creator profile (writable), or placeholder
/// 3. creator (signer, writable)
/// 4. treasury (writable)
/// 5. system program
pub fn build_create_lab_market_instruction(
    params: &CreateMarketParams,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    params.terms.check(config)?;
    let program_id = &config.program_id;
    let (config_account, _) = config_pda(program_id)?;
    let (market, _) = market_pda(params.market_id, program_id)?;
    let creator_profile = creator_profile_slot(params, program_id)?;

    let accounts = vec![
        writable(config_account), // 0: config
        writable(market), // 1: market
        optional_writable(creator_profile, program_id), // 2: creator profile
        signer_mut(params.creator), // 3: creator
        writable(config.treasury), // 4: treasury
        readonly(system_program_id()), // 5: system program
    ];

    let terms = &params.terms;
    build(
        program_id,
        Opcode::CreateLabMarketSol,
        &CreateLabMarketArgs {
            question: terms.question.clone(),
            closing_time: terms.closing_time,
            resolution_time: terms.resolution_time,
            resolution_mode: terms.resolution_mode.as_u8(),
            oracle_host: terms.oracle_host,
            creator_fee_bps: terms.creator_fee_bps,
        },
        accounts,
    )
}

/// Build `create_private_market_sol`.
///
/// # Accounts
///
/// 0. config (writable)
/// 1. market (writable)
/// 2. whitelist (writable) for the whitelist gate, otherwise placeholder
/// 3. creator profile (writable), or placeholder
/// 4. creator (signer, writable)
/// 5. treasury (writable)
/// 6. system program
pub fn build_create_private_market_instruction(
    params: &CreateMarketParams,
    access: &PrivateAccess,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    params.terms.check(config)?;
    access.check()?;
    let program_id = &config.program_id;
    let (config_account, _) = config_pda(program_id)?;
    let (market, _) = market_pda(params.market_id, program_id)?;
    let whitelist = if access.access_gate == AccessGate::Whitelist {
        Some(whitelist_pda(params.market_id, program_id)?.0)
    } else {
        None
    };
    let creator_profile = creator_profile_slot(params, program_id)?;

    let accounts = vec![
        writable(config_account), // 0: config
        writable(market), // 1: market
        optional_writable(whitelist, program_id), // 2: whitelist
        optional_writable(creator_profile, program_id), // 3: creator profile
        signer_mut(params.creator), // 4: creator
        writable(config.treasury), // 5: treasury
        readonly(system_program_id()), // 6: system program
    ];

    let terms = &params.terms;
    build(
        program_id,
        Opcode::CreatePrivateMarketSol,
        &CreatePrivateMarketArgs {
            question: terms.question.clone(),
            closing_time: terms.closing_time,
            resolution_time: terms.resolution_time,
            resolution_mode: terms.resolution_mode.as_u8(),
            oracle_host: terms.oracle_host,
            creator_fee_bps: terms.creator_fee_bps,
            access_gate: access.access_gate.as_u8(),
            invite_hash: access.invite_hash,
        },
        accounts,
    )
}

/// Build `close_market`: stop betting and snapshot the pools.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. caller (signer)
pub fn build_close_market_instruction(
    market_id: u64,
    caller: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(market_pda(market_id, program_id)?.0),
        signer(*caller),
    ];
    build(program_id, Opcode::CloseMarket, &NoArgs, accounts)
}

/// Build `extend_market`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. authority (signer)
pub fn build_extend_market_instruction(
    market_id: u64,
    authority: &Pubkey,
    new_closing_time: i64,
    new_resolution_time: Option<i64>,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    if let Some(resolution_time) = new_resolution_time {
        check_schedule(new_closing_time, resolution_time)?;
    }
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(market_pda(market_id, program_id)?.0),
        signer(*authority),
    ];
    build(
        program_id,
        Opcode::ExtendMarket,
        &ExtendMarketArgs {
            new_closing_time,
            new_resolution_time,
        },
        accounts,
    )
}

/// Build `cancel_market`; bettors then claim refunds.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. market (writable)
/// 2. authority (signer)
pub fn build_cancel_market_instruction(
    market_id: u64,
    authority: &Pubkey,
    reason: &str,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_reason(reason)?;
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(market_pda(market_id, program_id)?.0),
        signer(*authority),
    ];
    build(
        program_id,
        Opcode::CancelMarket,
        &ReasonArgs {
            reason: reason.to_string(),
        },
        accounts,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        discriminator,
        instructions::args::{decode_instruction_data, DecodedInstruction},
    };

    pub(crate) fn terms() -> MarketTerms {
        MarketTerms {
            question: "Will BTC close above $100k on 2026-02-01 per CoinGecko?".to_string(),
            closing_time: 1_769_839_200,
            resolution_time: 1_769_925_600,
            resolution_mode: ResolutionMode::CreatorProposed,
            oracle_host: None,
            creator_fee_bps: 100,
        }
    }

    fn params(has_creator_profile: bool) -> CreateMarketParams {
        CreateMarketParams {
            market_id: 12,
            creator: Pubkey::new_unique(),
            terms: terms(),
            has_creator_profile,
        }
    }

    #[test]
    fn test_create_lab_market() {
        let config = ProtocolConfig::default();
        let params = params(false);
        let ix = build_create_lab_market_instruction(&params, &config).unwrap();

        assert_eq!(&ix.data[..8], &discriminator::CREATE_LAB_MARKET_SOL);
        assert_eq!(ix.accounts.len(), 6);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, market_pda(12, &config.program_id).unwrap().0);
        assert_eq!(ix.accounts[2].pubkey, config.program_id);
        assert!(!ix.accounts[2].is_writable);
        assert_eq!(ix.accounts[3].pubkey, params.creator);
        assert!(ix.accounts[3].is_signer);
        assert_eq!(ix.accounts[4].pubkey, config.treasury);

        match decode_instruction_data(&ix.data).unwrap().1 {
            DecodedInstruction::CreateLabMarketSol(args) => {
                assert_eq!(args.question, params.terms.question);
                assert_eq!(args.resolution_mode, 1);
                assert_eq!(args.oracle_host, None);
                assert_eq!(args.creator_fee_bps, 100);
            }
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn test_create_with_creator_profile() {
        let config = ProtocolConfig::default();
        let params = params(true);
        let ix = build_create_lab_market_instruction(&params, &config).unwrap();
        assert_eq!(
            ix.accounts[2].pubkey,
            creator_profile_pda(&params.creator, &config.program_id).unwrap().0
        );
        assert!(ix.accounts[2].is_writable);
    }

    #[test]
    fn test_create_private_market_gates() {
        let config = ProtocolConfig::default();
        let params = params(false);
        let whitelist_gate = PrivateAccess {
            access_gate: AccessGate::Whitelist,
            invite_hash: None,
        };
        let ix =
            build_create_private_market_instruction(&params, &whitelist_gate, &config).unwrap();
        assert_eq!(ix.accounts.len(), 7);
        assert_eq!(
            ix.accounts[2].pubkey,
            whitelist_pda(12, &config.program_id).unwrap().0
        );

        let invite_gate = PrivateAccess {
            access_gate: AccessGate::InviteHash,
            invite_hash: Some([7; 32]),
        };
        let ix = build_create_private_market_instruction(&params, &invite_gate, &config).unwrap();
        assert_eq!(ix.accounts[2].pubkey, config.program_id);
        let tail = &ix.data[ix.data.len() - 34..];
        assert_eq!(tail[0], AccessGate::InviteHash.as_u8());
        assert_eq!(tail[1], 1);
        assert_eq!(&tail[2..], &[7; 32]);

        let missing_hash = PrivateAccess {
            access_gate: AccessGate::InviteHash,
            invite_hash: None,
        };
        assert!(build_create_private_market_instruction(&params, &missing_hash, &config).is_err());
        let stray_hash = PrivateAccess {
            access_gate: AccessGate::Public,
            invite_hash: Some([1; 32]),
        };
        assert!(build_create_private_market_instruction(&params, &stray_hash, &config).is_err());
    }

    #[test]
    fn test_create_input_checks() {
        let config = ProtocolConfig::default();
        let mut params = params(false);
        params.terms.closing_time = params.terms.resolution_time;
        assert!(build_create_lab_market_instruction(&params, &config).is_err());

        let mut params = self::params(false);
        params.terms.creator_fee_bps = config.fees.max_creator_fee_bps + 1;
        assert!(build_create_lab_market_instruction(&params, &config).is_err());

        let mut params = self::params(false);
        params.terms.question = "q".repeat(201);
        assert!(build_create_lab_market_instruction(&params, &config).is_err());

        let mut params = self::params(false);
        params.terms.resolution_mode = ResolutionMode::HostOracle;
        assert!(build_create_lab_market_instruction(&params, &config).is_err());
        params.terms.oracle_host = Some(Pubkey::new_unique());
        assert!(build_create_lab_market_instruction(&params, &config).is_ok());
    }

    #[test]
    fn test_lifecycle_instructions() {
        let config = ProtocolConfig::default();
        let authority = Pubkey::new_unique();

        let close = build_close_market_instruction(5, &authority, &config).unwrap();
        assert_eq!(close.data, discriminator::CLOSE_MARKET.to_vec());
        assert!(close.accounts[2].is_signer && !close.accounts[2].is_writable);

        let extend =
            build_extend_market_instruction(5, &authority, 100, None, &config).unwrap();
        assert_eq!(extend.data.len(), 8 + 8 + 1);
        assert!(build_extend_market_instruction(5, &authority, 100, Some(50), &config).is_err());

        let cancel =
            build_cancel_market_instruction(5, &authority, "source went offline", &config)
                .unwrap();
        assert_eq!(&cancel.data[..8], &discriminator::CANCEL_MARKET);
        assert!(build_cancel_market_instruction(5, &authority, "", &config).is_err());
    }
}
