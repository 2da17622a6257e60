//! Every builder's payload decodes back to the exact inputs it was given.

use parimutuel_codec::{
    build_add_to_whitelist_instruction, build_cancel_market_instruction,
    build_cancel_race_instruction, build_claim_affiliate_instruction,
    build_claim_creator_instruction, build_claim_instruction,
    build_claim_race_refund_instruction, build_claim_race_winnings_instruction,
    build_close_market_instruction, build_close_race_market_instruction,
    build_create_creator_profile_instruction, build_create_lab_market_instruction,
    build_create_private_market_instruction, build_create_race_market_instruction,
    build_extend_market_instruction, build_extend_race_market_instruction,
    build_finalize_race_resolution_instruction, build_finalize_resolution_instruction,
    build_flag_dispute_instruction, build_flag_race_dispute_instruction,
    build_place_bet_instruction, build_propose_race_resolution_instruction,
    build_propose_resolution_instruction, build_race_bet_instruction,
    build_register_affiliate_instruction, build_remove_from_whitelist_instruction,
    build_resolve_market_instruction, build_resolve_race_instruction,
    build_toggle_affiliate_instruction, build_update_creator_profile_instruction,
    build_vote_council_instruction, build_vote_council_race_instruction,
    decode_instruction_data,
    instructions::args::{
        CreateCreatorProfileArgs, CreateLabMarketArgs, CreatePrivateMarketArgs,
        CreateRaceMarketArgs, ExtendMarketArgs, OutcomeArgs, PlaceBetArgs, RaceBetArgs,
        RaceOutcomeArgs, RaceVoteArgs, ReasonArgs, RegisterAffiliateArgs, ToggleAffiliateArgs,
        UpdateCreatorProfileArgs, VoteCouncilArgs, WhitelistUserArgs,
    },
    AccessGate, ClaimParams, CreateMarketParams, CreateRaceMarketParams, DecodedInstruction,
    MarketTerms, Opcode, PlaceBetParams, PrivateAccess, ProtocolConfig, RaceBetParams,
    ResolutionMode, Side, WhitelistTarget,
};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

const CLOSING_TIME: i64 = 1_769_896_800;
const RESOLUTION_TIME: i64 = CLOSING_TIME + 86_400;

fn terms(oracle: Pubkey) -> MarketTerms {
    MarketTerms {
        question: "Will SOL close above $300 on Feb 1? (Source: CoinGecko)".to_string(),
        closing_time: CLOSING_TIME,
        resolution_time: RESOLUTION_TIME,
        resolution_mode: ResolutionMode::HostOracle,
        oracle_host: Some(oracle),
        creator_fee_bps: 150,
    }
}

fn all_cases(config: &ProtocolConfig) -> Vec<(Instruction, Opcode, DecodedInstruction)> {
    let user = Pubkey::new_unique();
    let creator = Pubkey::new_unique();
    let affiliate = Pubkey::new_unique();
    let oracle = Pubkey::new_unique();
    let invite_hash = [7u8; 32];
    let labels = vec!["Red".to_string(), "Blue".to_string(), "Green".to_string()];
    let market = CreateMarketParams {
        market_id: 11,
        creator,
        terms: terms(oracle),
        has_creator_profile: true,
    };
    let with_affiliate = ClaimParams {
        affiliate: Some(affiliate),
        creator_profile_owner: Some(creator),
        ..ClaimParams::winnings(11, user)
    };
    let bet = PlaceBetParams {
        market_id: 11,
        user,
        side: Side::No,
        amount: 750_000_000,
        whitelist_required: true,
        affiliate: None,
    };
    let race_bet = RaceBetParams {
        market_id: 4,
        user,
        outcome_index: 2,
        amount: 250_000_000,
        whitelist_required: false,
        affiliate: None,
    };
    let reason = "Oracle reported the wrong close";

    vec![
        (
            build_create_lab_market_instruction(&market, config).unwrap(),
            Opcode::CreateLabMarketSol,
            DecodedInstruction::CreateLabMarketSol(CreateLabMarketArgs {
                question: market.terms.question.clone(),
                closing_time: CLOSING_TIME,
                resolution_time: RESOLUTION_TIME,
                resolution_mode: ResolutionMode::HostOracle.as_u8(),
                oracle_host: Some(oracle),
                creator_fee_bps: 150,
            }),
        ),
        (
            build_create_private_market_instruction(
                &market,
                &PrivateAccess {
                    access_gate: AccessGate::InviteHash,
                    invite_hash: Some(invite_hash),
                },
                config,
            )
            .unwrap(),
            Opcode::CreatePrivateMarketSol,
            DecodedInstruction::CreatePrivateMarketSol(CreatePrivateMarketArgs {
                question: market.terms.question.clone(),
                closing_time: CLOSING_TIME,
                resolution_time: RESOLUTION_TIME,
                resolution_mode: ResolutionMode::HostOracle.as_u8(),
                oracle_host: Some(oracle),
                creator_fee_bps: 150,
                access_gate: AccessGate::InviteHash.as_u8(),
                invite_hash: Some(invite_hash),
            }),
        ),
        (
            build_place_bet_instruction(&bet, config).unwrap(),
            Opcode::PlaceBetSol,
            DecodedInstruction::PlaceBetSol(PlaceBetArgs {
                outcome: false,
                amount: 750_000_000,
            }),
        ),
        (
            build_place_bet_instruction(
                &PlaceBetParams {
                    side: Side::Yes,
                    affiliate: Some(affiliate),
                    ..bet.clone()
                },
                config,
            )
            .unwrap(),
            Opcode::PlaceBetSolWithAffiliate,
            DecodedInstruction::PlaceBetSolWithAffiliate(PlaceBetArgs {
                outcome: true,
                amount: 750_000_000,
            }),
        ),
        (
            build_claim_instruction(&with_affiliate, config).unwrap(),
            Opcode::ClaimWinningsSol,
            DecodedInstruction::ClaimWinningsSol,
        ),
        (
            build_claim_instruction(&ClaimParams::refund(11, user), config).unwrap(),
            Opcode::ClaimRefundSol,
            DecodedInstruction::ClaimRefundSol,
        ),
        (
            build_claim_affiliate_instruction(&affiliate, config).unwrap(),
            Opcode::ClaimAffiliateSol,
            DecodedInstruction::ClaimAffiliateSol,
        ),
        (
            build_register_affiliate_instruction(&affiliate, "ALPHA42", config).unwrap(),
            Opcode::RegisterAffiliate,
            DecodedInstruction::RegisterAffiliate(RegisterAffiliateArgs {
                code: "ALPHA42".to_string(),
            }),
        ),
        (
            build_toggle_affiliate_instruction(&affiliate, false, config).unwrap(),
            Opcode::ToggleAffiliate,
            DecodedInstruction::ToggleAffiliate(ToggleAffiliateArgs { active: false }),
        ),
        (
            build_propose_resolution_instruction(11, &creator, Side::Yes, config).unwrap(),
            Opcode::ProposeResolution,
            DecodedInstruction::ProposeResolution(OutcomeArgs { outcome: true }),
        ),
        (
            build_resolve_market_instruction(11, &oracle, Side::No, config).unwrap(),
            Opcode::ResolveMarket,
            DecodedInstruction::ResolveMarket(OutcomeArgs { outcome: false }),
        ),
        (
            build_finalize_resolution_instruction(11, &user, Some(&creator), config).unwrap(),
            Opcode::FinalizeResolution,
            DecodedInstruction::FinalizeResolution,
        ),
        (
            build_flag_dispute_instruction(11, &user, reason, config).unwrap(),
            Opcode::FlagDispute,
            DecodedInstruction::FlagDispute(ReasonArgs {
                reason: reason.to_string(),
            }),
        ),
        (
            build_vote_council_instruction(11, &user, false, config).unwrap(),
            Opcode::VoteCouncil,
            DecodedInstruction::VoteCouncil(VoteCouncilArgs { vote_yes: false }),
        ),
        (
            build_add_to_whitelist_instruction(WhitelistTarget::Market(11), &creator, &user, config)
                .unwrap(),
            Opcode::AddToWhitelist,
            DecodedInstruction::AddToWhitelist(WhitelistUserArgs { user }),
        ),
        (
            build_remove_from_whitelist_instruction(
                WhitelistTarget::Market(11),
                &creator,
                &user,
                config,
            )
            .unwrap(),
            Opcode::RemoveFromWhitelist,
            DecodedInstruction::RemoveFromWhitelist(WhitelistUserArgs { user }),
        ),
        (
            build_create_creator_profile_instruction(&creator, "Sol Oracle Desk", 120, config)
                .unwrap(),
            Opcode::CreateCreatorProfile,
            DecodedInstruction::CreateCreatorProfile(CreateCreatorProfileArgs {
                display_name: "Sol Oracle Desk".to_string(),
                default_fee_bps: 120,
            }),
        ),
        (
            build_update_creator_profile_instruction(&creator, None, Some(80), config).unwrap(),
            Opcode::UpdateCreatorProfile,
            DecodedInstruction::UpdateCreatorProfile(UpdateCreatorProfileArgs {
                display_name: None,
                default_fee_bps: Some(80),
            }),
        ),
        (
            build_claim_creator_instruction(&creator, config).unwrap(),
            Opcode::ClaimCreatorSol,
            DecodedInstruction::ClaimCreatorSol,
        ),
        (
            build_close_market_instruction(11, &user, config).unwrap(),
            Opcode::CloseMarket,
            DecodedInstruction::CloseMarket,
        ),
        (
            build_extend_market_instruction(11, &creator, CLOSING_TIME + 3_600, None, config)
                .unwrap(),
            Opcode::ExtendMarket,
            DecodedInstruction::ExtendMarket(ExtendMarketArgs {
                new_closing_time: CLOSING_TIME + 3_600,
                new_resolution_time: None,
            }),
        ),
        (
            build_cancel_market_instruction(11, &creator, reason, config).unwrap(),
            Opcode::CancelMarket,
            DecodedInstruction::CancelMarket(ReasonArgs {
                reason: reason.to_string(),
            }),
        ),
        (
            build_create_race_market_instruction(
                &CreateRaceMarketParams {
                    market_id: 4,
                    creator,
                    terms: terms(oracle),
                    outcome_labels: labels.clone(),
                    has_creator_profile: false,
                },
                config,
            )
            .unwrap(),
            Opcode::CreateRaceMarketSol,
            DecodedInstruction::CreateRaceMarketSol(CreateRaceMarketArgs {
                question: market.terms.question.clone(),
                outcome_labels: labels,
                closing_time: CLOSING_TIME,
                resolution_time: RESOLUTION_TIME,
                resolution_mode: ResolutionMode::HostOracle.as_u8(),
                oracle_host: Some(oracle),
                creator_fee_bps: 150,
            }),
        ),
        (
            build_race_bet_instruction(&race_bet, config).unwrap(),
            Opcode::BetOnRaceOutcomeSol,
            DecodedInstruction::BetOnRaceOutcomeSol(RaceBetArgs {
                outcome_index: 2,
                amount: 250_000_000,
            }),
        ),
        (
            build_race_bet_instruction(
                &RaceBetParams {
                    outcome_index: 0,
                    affiliate: Some(affiliate),
                    ..race_bet.clone()
                },
                config,
            )
            .unwrap(),
            Opcode::BetOnRaceOutcomeSolWithAffiliate,
            DecodedInstruction::BetOnRaceOutcomeSolWithAffiliate(RaceBetArgs {
                outcome_index: 0,
                amount: 250_000_000,
            }),
        ),
        (
            build_claim_race_winnings_instruction(4, &user, config).unwrap(),
            Opcode::ClaimRaceWinningsSol,
            DecodedInstruction::ClaimRaceWinningsSol,
        ),
        (
            build_claim_race_refund_instruction(4, &user, config).unwrap(),
            Opcode::ClaimRaceRefundSol,
            DecodedInstruction::ClaimRaceRefundSol,
        ),
        (
            build_propose_race_resolution_instruction(4, &creator, 1, config).unwrap(),
            Opcode::ProposeRaceResolution,
            DecodedInstruction::ProposeRaceResolution(RaceOutcomeArgs { winning_outcome: 1 }),
        ),
        (
            build_resolve_race_instruction(4, &oracle, 2, config).unwrap(),
            Opcode::ResolveRace,
            DecodedInstruction::ResolveRace(RaceOutcomeArgs { winning_outcome: 2 }),
        ),
        (
            build_finalize_race_resolution_instruction(4, &user, config).unwrap(),
            Opcode::FinalizeRaceResolution,
            DecodedInstruction::FinalizeRaceResolution,
        ),
        (
            build_flag_race_dispute_instruction(4, &user, reason, config).unwrap(),
            Opcode::FlagRaceDispute,
            DecodedInstruction::FlagRaceDispute(ReasonArgs {
                reason: reason.to_string(),
            }),
        ),
        (
            build_vote_council_race_instruction(4, &user, 9, config).unwrap(),
            Opcode::VoteCouncilRace,
            DecodedInstruction::VoteCouncilRace(RaceVoteArgs { outcome_index: 9 }),
        ),
        (
            build_add_to_whitelist_instruction(
                WhitelistTarget::RaceMarket(4),
                &creator,
                &user,
                config,
            )
            .unwrap(),
            Opcode::AddToRaceWhitelist,
            DecodedInstruction::AddToRaceWhitelist(WhitelistUserArgs { user }),
        ),
        (
            build_remove_from_whitelist_instruction(
                WhitelistTarget::RaceMarket(4),
                &creator,
                &user,
                config,
            )
            .unwrap(),
            Opcode::RemoveFromRaceWhitelist,
            DecodedInstruction::RemoveFromRaceWhitelist(WhitelistUserArgs { user }),
        ),
        (
            build_close_race_market_instruction(4, &user, config).unwrap(),
            Opcode::CloseRaceMarket,
            DecodedInstruction::CloseRaceMarket,
        ),
        (
            build_extend_race_market_instruction(
                4,
                &creator,
                CLOSING_TIME + 7_200,
                Some(RESOLUTION_TIME + 7_200),
                config,
            )
            .unwrap(),
            Opcode::ExtendRaceMarket,
            DecodedInstruction::ExtendRaceMarket(ExtendMarketArgs {
                new_closing_time: CLOSING_TIME + 7_200,
                new_resolution_time: Some(RESOLUTION_TIME + 7_200),
            }),
        ),
        (
            build_cancel_race_instruction(4, &creator, reason, config).unwrap(),
            Opcode::CancelRace,
            DecodedInstruction::CancelRace(ReasonArgs {
                reason: reason.to_string(),
            }),
        ),
    ]
}

#[test]
fn test_every_builder_round_trips_its_arguments() {
    let config = ProtocolConfig::default();
    let cases = all_cases(&config);

    for (ix, opcode, expected) in &cases {
        assert_eq!(ix.program_id, config.program_id, "{opcode:?}");
        assert_eq!(&ix.data[..8], &opcode.discriminator(), "{opcode:?}");
        let (decoded_opcode, decoded) = decode_instruction_data(&ix.data).unwrap();
        assert_eq!(decoded_opcode, *opcode);
        assert_eq!(&decoded, expected, "{opcode:?}");
    }

    for opcode in Opcode::ALL {
        assert!(
            cases.iter().any(|(_, covered, _)| covered == opcode),
            "no builder case for {opcode:?}"
        );
    }
    assert_eq!(cases.len(), Opcode::ALL.len());
}
