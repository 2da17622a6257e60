//! Instruction builders for every supported program operation.
//!
//! Each builder returns an unsigned [`Instruction`]: the 8-byte discriminator
//! followed by the borsh-encoded arguments, plus the account list in the exact
//! order and with the exact signer/writable flags the program declares.
//! A wrong order or flag is not detectable here; it fails at simulation.
//!
//! Optional account slots are never omitted. When an account is not needed
//! the program's own id takes its place as a read-only placeholder, because
//! the program matches accounts by position.

pub mod affiliate;
pub mod args;
pub mod betting;
pub mod creator;
pub mod market;
pub mod race;
pub mod resolution;
pub mod whitelist;

use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use tracing::debug;

use crate::{
    constants::{
        MAX_OUTCOME_LABEL_LEN, MAX_QUESTION_LEN, MAX_RACE_OUTCOMES, MAX_REASON_LEN,
        MIN_RACE_OUTCOMES,
    },
    discriminator::Opcode,
    types::{CodecError, CodecResult},
};

pub(crate) fn system_program_id() -> Pubkey {
    solana_system_interface::program::ID
}

/// Create an account meta for a signer+writable account.
pub(crate) fn signer_mut(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, true)
}

/// Create an account meta for a read-only signer.
pub(crate) fn signer(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(pubkey, true)
}

/// Create an account meta for a writable account.
pub(crate) fn writable(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, false)
}

/// Create an account meta for a read-only account.
pub(crate) fn readonly(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(pubkey, false)
}

/// Stand-in for an absent optional account: the program id, read-only.
pub fn placeholder(program_id: &Pubkey) -> AccountMeta {
    readonly(*program_id)
}

/// `Some` becomes a writable slot, `None` the placeholder.
pub(crate) fn optional_writable(account: Option<Pubkey>, program_id: &Pubkey) -> AccountMeta {
    account.map_or_else(|| placeholder(program_id), writable)
}

pub(crate) fn optional_readonly(account: Option<Pubkey>, program_id: &Pubkey) -> AccountMeta {
    account.map_or_else(|| placeholder(program_id), readonly)
}

/// Instruction data: discriminator ‖ borsh(args).
pub fn encode_data(opcode: Opcode, args: &impl BorshSerialize) -> CodecResult<Vec<u8>> {
    let mut data = Vec::with_capacity(64);
    data.extend_from_slice(&opcode.discriminator());
    args.serialize(&mut data)
        .map_err(|e| CodecError::Serialization(e.to_string()))?;
    Ok(data)
}

pub(crate) fn build(
    program_id: &Pubkey,
    opcode: Opcode,
    args: &impl BorshSerialize,
    accounts: Vec<AccountMeta>,
) -> CodecResult<Instruction> {
    let data = encode_data(opcode, args)?;
    debug!(
        opcode = opcode.name(),
        accounts = accounts.len(),
        data_len = data.len(),
        "encoded instruction"
    );
    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

pub(crate) fn check_text(field: &str, value: &str, min: usize, max: usize) -> CodecResult<()> {
    let len = value.len();
    if len < min || len > max {
        return Err(CodecError::InvalidArgument(format!(
            "{field} must be {min}-{max} bytes, got {len}"
        )));
    }
    Ok(())
}

pub(crate) fn check_question(question: &str) -> CodecResult<()> {
    if question.trim().is_empty() {
        return Err(CodecError::InvalidArgument("question is empty".to_string()));
    }
    check_text("question", question, 1, MAX_QUESTION_LEN)
}

pub(crate) fn check_reason(reason: &str) -> CodecResult<()> {
    check_text("reason", reason, 1, MAX_REASON_LEN)
}

pub(crate) fn check_schedule(closing_time: i64, resolution_time: i64) -> CodecResult<()> {
    if closing_time >= resolution_time {
        return Err(CodecError::InvalidArgument(format!(
            "closing time {closing_time} must be before resolution time {resolution_time}"
        )));
    }
    Ok(())
}

pub(crate) fn check_outcome_index(outcome_index: u8) -> CodecResult<()> {
    if usize::from(outcome_index) >= MAX_RACE_OUTCOMES {
        return Err(CodecError::InvalidArgument(format!(
            "outcome index {outcome_index} out of range 0..{MAX_RACE_OUTCOMES}"
        )));
    }
    Ok(())
}

pub(crate) fn check_outcome_labels(labels: &[String]) -> CodecResult<()> {
    if labels.len() < MIN_RACE_OUTCOMES || labels.len() > MAX_RACE_OUTCOMES {
        return Err(CodecError::InvalidArgument(format!(
            "race markets need {MIN_RACE_OUTCOMES}-{MAX_RACE_OUTCOMES} outcomes, got {}",
            labels.len()
        )));
    }
    for label in labels {
        check_text("outcome label", label, 1, MAX_OUTCOME_LABEL_LEN)?;
    }
    Ok(())
}

pub(crate) fn check_creator_fee(fee_bps: u16, max_bps: u16) -> CodecResult<()> {
    if fee_bps > max_bps {
        return Err(CodecError::InvalidArgument(format!(
            "creator fee {fee_bps} bps exceeds maximum {max_bps} bps"
        )));
    }
    Ok(())
}
