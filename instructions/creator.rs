//! Creator profile instructions.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use super::{
    args::{CreateCreatorProfileArgs, NoArgs, UpdateCreatorProfileArgs},
    build, check_creator_fee, check_text, readonly, signer, signer_mut, system_program_id,
    writable,
};
use crate::{
    config::ProtocolConfig,
    constants::MAX_DISPLAY_NAME_LEN,
    discriminator::Opcode,
    pda::{config_pda, creator_profile_pda},
    types::{CodecError, CodecResult},
};

fn check_display_name(name: &str) -> CodecResult<()> {
    check_text("display name", name, 1, MAX_DISPLAY_NAME_LEN)
}

/// Build `create_creator_profile`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. creator profile (writable)
/// 2. owner (signer, writable)
/// 3. system program
pub fn build_create_creator_profile_instruction(
    owner: &Pubkey,
    display_name: &str,
    default_fee_bps: u16,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_display_name(display_name)?;
    check_creator_fee(default_fee_bps, config.fees.max_creator_fee_bps)?;
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(creator_profile_pda(owner, program_id)?.0),
        signer_mut(*owner),
        readonly(system_program_id()),
    ];
    build(
        program_id,
        Opcode::CreateCreatorProfile,
        &CreateCreatorProfileArgs {
            display_name: display_name.to_string(),
            default_fee_bps,
        },
        accounts,
    )
}

/// Build `update_creator_profile`. At least one field must change.
///
/// # Accounts
///
/// 0. creator profile (writable)
/// 1. owner (signer)
pub fn build_update_creator_profile_instruction(
    owner: &Pubkey,
    display_name: Option<&str>,
    default_fee_bps: Option<u16>,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    if display_name.is_none() && default_fee_bps.is_none() {
        return Err(CodecError::InvalidArgument(
            "profile update changes nothing".to_string(),
        ));
    }
    if let Some(name) = display_name {
        check_display_name(name)?;
    }
    if let Some(fee) = default_fee_bps {
        check_creator_fee(fee, config.fees.max_creator_fee_bps)?;
    }
    let program_id = &config.program_id;
    let accounts = vec![
        writable(creator_profile_pda(owner, program_id)?.0),
        signer(*owner),
    ];
    build(
        program_id,
        Opcode::UpdateCreatorProfile,
        &UpdateCreatorProfileArgs {
            display_name: display_name.map(str::to_string),
            default_fee_bps,
        },
        accounts,
    )
}

/// Build `claim_creator_sol`: withdraw accrued creator fees.
///
/// # Accounts
///
/// 0. creator profile (writable)
/// 1. owner (signer, writable)
/// 2. system program
pub fn build_claim_creator_instruction(
    owner: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        writable(creator_profile_pda(owner, program_id)?.0),
        signer_mut(*owner),
        readonly(system_program_id()),
    ];
    build(program_id, Opcode::ClaimCreatorSol, &NoArgs, accounts)
}
