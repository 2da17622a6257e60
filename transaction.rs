//! Unsigned transaction assembly.
//!
//! The crate never signs. Transactions are compiled into a legacy message
//! with zeroed signature slots and handed to the user's wallet as base64.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use solana_sdk::{
    hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey,
    transaction::Transaction,
};
use tracing::debug;

use crate::{
    discriminator::Opcode,
    instructions::args::{decode_instruction_data, DecodedInstruction},
    types::{CodecError, CodecResult},
};

/// Compile instructions into an unsigned transaction.
///
/// The fee payer becomes the first signer; every other signer flagged in
/// the account metas gets an empty signature slot after it.
pub fn build_unsigned_transaction(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: Hash,
) -> CodecResult<Transaction> {
    if instructions.is_empty() {
        return Err(CodecError::InvalidArgument(
            "transaction needs at least one instruction".to_string(),
        ));
    }
    let message = Message::new_with_blockhash(instructions, Some(fee_payer), &recent_blockhash);
    debug!(
        instructions = instructions.len(),
        accounts = message.account_keys.len(),
        signers = message.header.num_required_signatures,
        "assembled unsigned transaction"
    );
    Ok(Transaction::new_unsigned(message))
}

/// Wire bytes of a transaction, base64-encoded.
pub fn serialize_unsigned_transaction(transaction: &Transaction) -> CodecResult<String> {
    let bytes =
        bincode::serialize(transaction).map_err(|e| CodecError::Serialization(e.to_string()))?;
    Ok(STANDARD.encode(bytes))
}

/// Inverse of [`serialize_unsigned_transaction`].
pub fn deserialize_transaction(encoded: &str) -> CodecResult<Transaction> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CodecError::InvalidEncoding(e.to_string()))?;
    bincode::deserialize(&bytes).map_err(|e| CodecError::InvalidEncoding(e.to_string()))
}

/// Decode every instruction addressed to `program_id`, in message order.
///
/// Instructions for other programs are skipped.
pub fn inspect_transaction(
    transaction: &Transaction,
    program_id: &Pubkey,
) -> CodecResult<Vec<(Opcode, DecodedInstruction)>> {
    let message = &transaction.message;
    message
        .instructions
        .iter()
        .filter(|ix| message.account_keys.get(usize::from(ix.program_id_index)) == Some(program_id))
        .map(|ix| decode_instruction_data(&ix.data))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDescription {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// JSON-friendly view of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionDescription {
    pub program_id: String,
    pub accounts: Vec<AccountDescription>,
    /// Base64 instruction data.
    pub data: String,
}

pub fn describe_instruction(instruction: &Instruction) -> InstructionDescription {
    InstructionDescription {
        program_id: instruction.program_id.to_string(),
        accounts: instruction
            .accounts
            .iter()
            .map(|meta| AccountDescription {
                pubkey: meta.pubkey.to_string(),
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
            })
            .collect(),
        data: STANDARD.encode(&instruction.data),
    }
}
