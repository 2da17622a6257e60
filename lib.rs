//! # Parimutuel Codec
//!
//! Off-chain codec and validation layer for a Solana parimutuel
//! prediction-market program.
//!
//! ## Problem
//!
//! The on-chain program accepts raw instruction bytes and a positional account
//! list. One wrong byte offset, one missing placeholder, or one mis-ordered
//! account turns a bet into a failed (or worse, misdirected) transaction.
//! Markets with ambiguous or manipulable wording must be caught before they
//! are created, not after people bet on them.
//!
//! ## Solution
//!
//! This crate provides:
//! 1. **Address derivation** for every program account ([`pda`])
//! 2. **Account decoding** from fetched bytes via a declared schema ([`layout`], [`state`])
//! 3. **Instruction encoding** for every boolean and race operation ([`instructions`])
//! 4. **Quotes** using the program's parimutuel payout formula ([`quote`])
//! 5. **Market and bet validation** with versioned rule sets ([`validator`])
//! 6. **Unsigned transaction assembly** for the user's wallet to sign ([`transaction`])
//!
//! The crate never signs and never talks to the network: callers fetch
//! account bytes and a blockhash, and hand the serialized transaction to the
//! wallet.
//!
//! ## Usage
//!
//! ```ignore
//! use parimutuel_codec::{
//!     build_place_bet_instruction, build_unsigned_transaction, read_market_access,
//!     serialize_unsigned_transaction, LayoutVersion, PlaceBetParams, ProtocolConfig, Side,
//! };
//!
//! let config = ProtocolConfig::default();
//! let access = read_market_access(&market_account_bytes, LayoutVersion::V1)?;
//! let ix = build_place_bet_instruction(
//!     &PlaceBetParams {
//!         market_id: access.market_id,
//!         user,
//!         side: Side::Yes,
//!         amount: 1_500_000_000,
//!         whitelist_required: access.whitelist_required,
//!         affiliate: None,
//!     },
//!     &config,
//! )?;
//! let tx = build_unsigned_transaction(&[ix], &user, recent_blockhash)?;
//! let for_wallet = serialize_unsigned_transaction(&tx)?;
//! ```
//!
//! ## Rule Sets
//!
//! Market validation is versioned. `RuleSetVersion::V1` treats a missing data
//! source as a warning; `V2` (the default) requires one. Only Lab markets are
//! blocked by critical findings; Official and Private markets get the same
//! report for display.
//!
//! ## Layout Versions
//!
//! Account layouts carry an explicit [`LayoutVersion`]. There is no version
//! tag in the account bytes, so a program upgrade that changes a layout needs
//! a matching release of this crate.

pub mod config;
pub mod constants;
pub mod discriminator;
pub mod instructions;
pub mod layout;
pub mod pda;
pub mod quote;
pub mod state;
pub mod transaction;
pub mod types;
pub mod validator;

// Re-export main public API
pub use config::{BetLimits, FeeSchedule, ProtocolConfig, RuleConfig, RuleSetVersion};
pub use constants::{program_id, treasury, PROGRAM_ID, TREASURY};
pub use discriminator::{account_discriminator, instruction_discriminator, Opcode};
pub use instructions::{
    affiliate::{
        build_claim_affiliate_instruction, build_register_affiliate_instruction,
        build_toggle_affiliate_instruction,
    },
    args::{decode_instruction_data, DecodedInstruction},
    betting::{
        build_batch_claim_instructions, build_claim_instruction, build_place_bet_instruction,
        ClaimKind, ClaimParams, PlaceBetParams,
    },
    creator::{
        build_claim_creator_instruction, build_create_creator_profile_instruction,
        build_update_creator_profile_instruction,
    },
    market::{
        build_cancel_market_instruction, build_close_market_instruction,
        build_create_lab_market_instruction, build_create_private_market_instruction,
        build_extend_market_instruction, CreateMarketParams, MarketTerms, PrivateAccess,
    },
    race::{
        build_cancel_race_instruction, build_claim_race_refund_instruction,
        build_claim_race_winnings_instruction, build_close_race_market_instruction,
        build_create_race_market_instruction, build_extend_race_market_instruction,
        build_finalize_race_resolution_instruction, build_flag_race_dispute_instruction,
        build_propose_race_resolution_instruction, build_race_bet_instruction,
        build_resolve_race_instruction, build_vote_council_race_instruction,
        CreateRaceMarketParams, RaceBetParams,
    },
    resolution::{
        build_finalize_resolution_instruction, build_flag_dispute_instruction,
        build_propose_resolution_instruction, build_resolve_market_instruction,
        build_vote_council_instruction,
    },
    whitelist::{
        build_add_to_whitelist_instruction, build_remove_from_whitelist_instruction,
        WhitelistTarget,
    },
};
pub use layout::{decode_account_data, AccountEncoding, AccountView, LayoutVersion};
pub use quote::{
    estimate_claim, quote_bet, quote_market_bet, quote_race_bet, BetQuote, ClaimEstimate,
    QuoteRequest, RaceQuote,
};
pub use state::{
    next_market_id, next_race_market_id, read_config, read_market_access,
    read_race_market_access, ConfigInfo, MarketAccessInfo, MarketAccount, RaceMarketAccount,
};
pub use transaction::{
    build_unsigned_transaction, describe_instruction, deserialize_transaction,
    inspect_transaction, serialize_unsigned_transaction, InstructionDescription,
};
pub use types::{
    is_whitelist_required, AccessGate, CodecError, CodecResult, CurrencyType, MarketLayer,
    MarketStatus, ResolutionMode, Side,
};
pub use validator::{
    validate_bet, validate_market, validate_race_bet, BetValidation, MarketKind,
    MarketProposal, MarketValidation, RuleId, RuleViolation, Severity,
};
