//! Affiliate program instructions.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use super::{
    args::{NoArgs, RegisterAffiliateArgs, ToggleAffiliateArgs},
    build, readonly, signer, signer_mut, system_program_id, writable,
};
use crate::{
    config::ProtocolConfig,
    constants::{MAX_AFFILIATE_CODE_LEN, MIN_AFFILIATE_CODE_LEN},
    discriminator::Opcode,
    pda::{affiliate_pda, config_pda},
    types::{CodecError, CodecResult},
};

fn check_affiliate_code(code: &str) -> CodecResult<()> {
    let len = code.len();
    if !(MIN_AFFILIATE_CODE_LEN..=MAX_AFFILIATE_CODE_LEN).contains(&len)
        || !code.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return Err(CodecError::InvalidArgument(format!(
            "affiliate code must be {MIN_AFFILIATE_CODE_LEN}-{MAX_AFFILIATE_CODE_LEN} ASCII letters or digits, got {code:?}"
        )));
    }
    Ok(())
}

/// Build `register_affiliate`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. affiliate (writable)
/// 2. owner (signer, writable)
/// 3. system program
pub fn build_register_affiliate_instruction(
    owner: &Pubkey,
    code: &str,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    check_affiliate_code(code)?;
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(affiliate_pda(owner, program_id)?.0),
        signer_mut(*owner),
        readonly(system_program_id()),
    ];
    build(
        program_id,
        Opcode::RegisterAffiliate,
        &RegisterAffiliateArgs {
            code: code.to_string(),
        },
        accounts,
    )
}

/// Build `toggle_affiliate`.
///
/// # Accounts
///
/// 0. affiliate (writable)
/// 1. owner (signer)
pub fn build_toggle_affiliate_instruction(
    owner: &Pubkey,
    active: bool,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        writable(affiliate_pda(owner, program_id)?.0),
        signer(*owner),
    ];
    build(
        program_id,
        Opcode::ToggleAffiliate,
        &ToggleAffiliateArgs { active },
        accounts,
    )
}

/// Build `claim_affiliate_sol`.
///
/// # Accounts
///
/// 0. config (read-only)
/// 1. affiliate (writable)
/// 2. owner (signer, writable)
/// 3. system program
pub fn build_claim_affiliate_instruction(
    owner: &Pubkey,
    config: &ProtocolConfig,
) -> CodecResult<Instruction> {
    let program_id = &config.program_id;
    let accounts = vec![
        readonly(config_pda(program_id)?.0),
        writable(affiliate_pda(owner, program_id)?.0),
        signer_mut(*owner),
        readonly(system_program_id()),
    ];
    build(program_id, Opcode::ClaimAffiliateSol, &NoArgs, accounts)
}
