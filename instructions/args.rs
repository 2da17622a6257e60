//! Instruction argument schemas.
//!
//! The borsh derives on these structs are the single declaration of each
//! payload: the builders serialize them and [`decode_instruction_data`]
//! deserializes the same types, so the two directions cannot drift.
//!
//! Encoding (borsh): bool and u8 are one byte, integers little-endian,
//! `Option<T>` is a 1-byte tag followed by `T` only when present, strings and
//! vectors carry a u32 LE length prefix.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    discriminator::Opcode,
    types::{CodecError, CodecResult},
};

/// Arguments of instructions that take none.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoArgs;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateLabMarketArgs {
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub resolution_mode: u8,
    pub oracle_host: Option<Pubkey>,
    pub creator_fee_bps: u16,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatePrivateMarketArgs {
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub resolution_mode: u8,
    pub oracle_host: Option<Pubkey>,
    pub creator_fee_bps: u16,
    pub access_gate: u8,
    pub invite_hash: Option<[u8; 32]>,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateRaceMarketArgs {
    pub question: String,
    pub outcome_labels: Vec<String>,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub resolution_mode: u8,
    pub oracle_host: Option<Pubkey>,
    pub creator_fee_bps: u16,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceBetArgs {
    pub outcome: bool,
    pub amount: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceBetArgs {
    pub outcome_index: u8,
    pub amount: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterAffiliateArgs {
    pub code: String,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleAffiliateArgs {
    pub active: bool,
}

/// Proposed or final outcome of a boolean market.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeArgs {
    pub outcome: bool,
}

/// Proposed or final winner of a race market.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceOutcomeArgs {
    pub winning_outcome: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReasonArgs {
    pub reason: String,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteCouncilArgs {
    pub vote_yes: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceVoteArgs {
    pub outcome_index: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitelistUserArgs {
    pub user: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateCreatorProfileArgs {
    pub display_name: String,
    pub default_fee_bps: u16,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateCreatorProfileArgs {
    pub display_name: Option<String>,
    pub default_fee_bps: Option<u16>,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendMarketArgs {
    pub new_closing_time: i64,
    pub new_resolution_time: Option<i64>,
}

/// An instruction payload identified by its discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedInstruction {
    CreateLabMarketSol(CreateLabMarketArgs),
    CreatePrivateMarketSol(CreatePrivateMarketArgs),
    PlaceBetSol(PlaceBetArgs),
    PlaceBetSolWithAffiliate(PlaceBetArgs),
    ClaimWinningsSol,
    ClaimRefundSol,
    ClaimAffiliateSol,
    RegisterAffiliate(RegisterAffiliateArgs),
    ToggleAffiliate(ToggleAffiliateArgs),
    ProposeResolution(OutcomeArgs),
    ResolveMarket(OutcomeArgs),
    FinalizeResolution,
    FlagDispute(ReasonArgs),
    VoteCouncil(VoteCouncilArgs),
    AddToWhitelist(WhitelistUserArgs),
    RemoveFromWhitelist(WhitelistUserArgs),
    CreateCreatorProfile(CreateCreatorProfileArgs),
    UpdateCreatorProfile(UpdateCreatorProfileArgs),
    ClaimCreatorSol,
    CloseMarket,
    ExtendMarket(ExtendMarketArgs),
    CancelMarket(ReasonArgs),
    CreateRaceMarketSol(CreateRaceMarketArgs),
    BetOnRaceOutcomeSol(RaceBetArgs),
    BetOnRaceOutcomeSolWithAffiliate(RaceBetArgs),
    ClaimRaceWinningsSol,
    ClaimRaceRefundSol,
    ProposeRaceResolution(RaceOutcomeArgs),
    ResolveRace(RaceOutcomeArgs),
    FinalizeRaceResolution,
    FlagRaceDispute(ReasonArgs),
    VoteCouncilRace(RaceVoteArgs),
    AddToRaceWhitelist(WhitelistUserArgs),
    RemoveFromRaceWhitelist(WhitelistUserArgs),
    CloseRaceMarket,
    ExtendRaceMarket(ExtendMarketArgs),
    CancelRace(ReasonArgs),
}

fn args<T: BorshDeserialize>(body: &[u8]) -> CodecResult<T> {
    let mut rest = body;
    let value = T::deserialize(&mut rest).map_err(|e| CodecError::Borsh(e.to_string()))?;
    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes(rest.len()));
    }
    Ok(value)
}

/// Inverse of the builders' data encoding.
pub fn decode_instruction_data(data: &[u8]) -> CodecResult<(Opcode, DecodedInstruction)> {
    if data.len() < 8 {
        return Err(CodecError::InstructionDataTooShort(data.len()));
    }
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&data[..8]);
    let opcode = Opcode::from_discriminator(&discriminator)
        .ok_or(CodecError::UnknownDiscriminator(discriminator))?;
    let body = &data[8..];

    use DecodedInstruction as D;
    let decoded = match opcode {
        Opcode::CreateLabMarketSol => D::CreateLabMarketSol(args(body)?),
        Opcode::CreatePrivateMarketSol => D::CreatePrivateMarketSol(args(body)?),
        Opcode::PlaceBetSol => D::PlaceBetSol(args(body)?),
        Opcode::PlaceBetSolWithAffiliate => D::PlaceBetSolWithAffiliate(args(body)?),
        Opcode::ClaimWinningsSol => args::<NoArgs>(body).map(|_| D::ClaimWinningsSol)?,
        Opcode::ClaimRefundSol => args::<NoArgs>(body).map(|_| D::ClaimRefundSol)?,
        Opcode::ClaimAffiliateSol => args::<NoArgs>(body).map(|_| D::ClaimAffiliateSol)?,
        Opcode::RegisterAffiliate => D::RegisterAffiliate(args(body)?),
        Opcode::ToggleAffiliate => D::ToggleAffiliate(args(body)?),
        Opcode::ProposeResolution => D::ProposeResolution(args(body)?),
        Opcode::ResolveMarket => D::ResolveMarket(args(body)?),
        Opcode::FinalizeResolution => args::<NoArgs>(body).map(|_| D::FinalizeResolution)?,
        Opcode::FlagDispute => D::FlagDispute(args(body)?),
        Opcode::VoteCouncil => D::VoteCouncil(args(body)?),
        Opcode::AddToWhitelist => D::AddToWhitelist(args(body)?),
        Opcode::RemoveFromWhitelist => D::RemoveFromWhitelist(args(body)?),
        Opcode::CreateCreatorProfile => D::CreateCreatorProfile(args(body)?),
        Opcode::UpdateCreatorProfile => D::UpdateCreatorProfile(args(body)?),
        Opcode::ClaimCreatorSol => args::<NoArgs>(body).map(|_| D::ClaimCreatorSol)?,
        Opcode::CloseMarket => args::<NoArgs>(body).map(|_| D::CloseMarket)?,
        Opcode::ExtendMarket => D::ExtendMarket(args(body)?),
        Opcode::CancelMarket => D::CancelMarket(args(body)?),
        Opcode::CreateRaceMarketSol => D::CreateRaceMarketSol(args(body)?),
        Opcode::BetOnRaceOutcomeSol => D::BetOnRaceOutcomeSol(args(body)?),
        Opcode::BetOnRaceOutcomeSolWithAffiliate => {
            D::BetOnRaceOutcomeSolWithAffiliate(args(body)?)
        }
        Opcode::ClaimRaceWinningsSol => args::<NoArgs>(body).map(|_| D::ClaimRaceWinningsSol)?,
        Opcode::ClaimRaceRefundSol => args::<NoArgs>(body).map(|_| D::ClaimRaceRefundSol)?,
        Opcode::ProposeRaceResolution => D::ProposeRaceResolution(args(body)?),
        Opcode::ResolveRace => D::ResolveRace(args(body)?),
        Opcode::FinalizeRaceResolution => {
            args::<NoArgs>(body).map(|_| D::FinalizeRaceResolution)?
        }
        Opcode::FlagRaceDispute => D::FlagRaceDispute(args(body)?),
        Opcode::VoteCouncilRace => D::VoteCouncilRace(args(body)?),
        Opcode::AddToRaceWhitelist => D::AddToRaceWhitelist(args(body)?),
        Opcode::RemoveFromRaceWhitelist => D::RemoveFromRaceWhitelist(args(body)?),
        Opcode::CloseRaceMarket => args::<NoArgs>(body).map(|_| D::CloseRaceMarket)?,
        Opcode::ExtendRaceMarket => D::ExtendRaceMarket(args(body)?),
        Opcode::CancelRace => D::CancelRace(args(body)?),
    };
    Ok((opcode, decoded))
}
