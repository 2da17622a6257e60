//! Error type and shared enums for the parimutuel codec.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Error types for the codec.
///
/// Variants fall into three groups: malformed caller input (rejected before
/// anything is encoded), account/instruction decode failures, and the
/// practically unreachable derivation/serialization failures. Business-rule
/// rejections are never errors; they come back inside validation results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid public key for {field}: {value}")]
    InvalidPubkey { field: &'static str, value: String },

    #[error("Invalid amount {amount}: must be between {min} and {max} lamports")]
    InvalidAmount { amount: u64, min: u64, max: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Account data too short: need {needed} bytes, got {len}")]
    AccountDataTooShort { needed: usize, len: usize },

    #[error("Unexpected {account} discriminator: expected {expected:?}, found {found:?}")]
    DiscriminatorMismatch {
        account: &'static str,
        expected: [u8; 8],
        found: [u8; 8],
    },

    #[error("Field {field} is not part of the {account} layout")]
    UnknownField {
        account: &'static str,
        field: String,
    },

    #[error("Field {field} cannot be read as {requested}")]
    FieldKindMismatch {
        field: &'static str,
        requested: &'static str,
    },

    #[error("Invalid {field} byte: {value}")]
    InvalidEnumByte { field: &'static str, value: u8 },

    #[error("Field {0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("Failed to decode account data: {0}")]
    InvalidEncoding(String),

    #[error("Unknown instruction discriminator {0:?}")]
    UnknownDiscriminator([u8; 8]),

    #[error("Instruction data too short: expected at least 8 bytes, got {0}")]
    InstructionDataTooShort(usize),

    #[error("{0} trailing bytes after instruction arguments")]
    TrailingBytes(usize),

    #[error("Borsh decode failed: {0}")]
    Borsh(String),

    #[error("No valid bump found for {0} address")]
    PdaDerivation(&'static str),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl CodecError {
    /// Malformed identifiers, out-of-bounds amounts and bad arguments.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPubkey { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidArgument(_)
                | Self::InvalidTimestamp(_)
                | Self::InvalidConfig(_)
        )
    }

    /// Account or instruction bytes that could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::AccountDataTooShort { .. }
                | Self::DiscriminatorMismatch { .. }
                | Self::UnknownField { .. }
                | Self::FieldKindMismatch { .. }
                | Self::InvalidEnumByte { .. }
                | Self::InvalidUtf8(_)
                | Self::InvalidEncoding(_)
                | Self::UnknownDiscriminator(_)
                | Self::InstructionDataTooShort(_)
                | Self::TrailingBytes(_)
                | Self::Borsh(_)
        )
    }
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Parse a base58 public key supplied by a caller.
pub fn parse_pubkey(field: &'static str, value: &str) -> CodecResult<Pubkey> {
    value.parse().map_err(|_| CodecError::InvalidPubkey {
        field,
        value: value.to_string(),
    })
}

/// Parse an RFC 3339 timestamp (e.g. `2026-02-01T00:00:00Z`) into unix seconds.
pub fn parse_timestamp(value: &str) -> CodecResult<i64> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp())
        .map_err(|e| CodecError::InvalidTimestamp(format!("{value}: {e}")))
}

macro_rules! byte_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal { $($variant:ident = $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub fn as_u8(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = CodecError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(CodecError::InvalidEnumByte { field: $field, value }),
                }
            }
        }
    };
}

byte_enum! {
    /// Lifecycle state stored in the market's status byte.
    MarketStatus, "status" {
        Active = 0,
        Closed = 1,
        Resolved = 2,
        Cancelled = 3,
        Paused = 4,
        ResolvedPending = 5,
        Disputed = 6,
    }
}

byte_enum! {
    CurrencyType, "currency_type" {
        Sol = 0,
        Usdc = 1,
    }
}

byte_enum! {
    /// Governance tier of a market.
    MarketLayer, "layer" {
        Official = 0,
        Lab = 1,
        Private = 2,
    }
}

byte_enum! {
    /// Who may bet on a market.
    AccessGate, "access_gate" {
        Public = 0,
        Whitelist = 1,
        InviteHash = 2,
    }
}

byte_enum! {
    ResolutionMode, "resolution_mode" {
        HostOracle = 0,
        CreatorProposed = 1,
        Council = 2,
    }
}

/// Side of a boolean market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    pub fn as_bool(self) -> bool {
        matches!(self, Side::Yes)
    }

    pub fn from_bool(outcome: bool) -> Self {
        if outcome {
            Side::Yes
        } else {
            Side::No
        }
    }
}

/// Whitelist required ⟺ layer is Private and the gate is Whitelist.
///
/// Lab and Official markets are always public whatever byte is stored.
/// Advisory only: the program enforces this on-chain.
pub fn is_whitelist_required(layer: MarketLayer, access_gate: AccessGate) -> bool {
    layer == MarketLayer::Private && access_gate == AccessGate::Whitelist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist_required_only_for_private_whitelist() {
        let layers = [MarketLayer::Official, MarketLayer::Lab, MarketLayer::Private];
        let gates = [AccessGate::Public, AccessGate::Whitelist, AccessGate::InviteHash];
        for layer in layers {
            for gate in gates {
                let expected = layer == MarketLayer::Private && gate == AccessGate::Whitelist;
                assert_eq!(is_whitelist_required(layer, gate), expected, "{layer:?}/{gate:?}");
            }
        }
        assert!(!is_whitelist_required(MarketLayer::Private, AccessGate::Public));
        assert!(!is_whitelist_required(MarketLayer::Lab, AccessGate::Whitelist));
        assert!(!is_whitelist_required(MarketLayer::Official, AccessGate::Whitelist));
    }

    #[test]
    fn test_enum_bytes() {
        assert_eq!(MarketLayer::try_from(2).unwrap(), MarketLayer::Private);
        assert_eq!(AccessGate::InviteHash.as_u8(), 2);
        assert_eq!(
            MarketStatus::try_from(9),
            Err(CodecError::InvalidEnumByte { field: "status", value: 9 })
        );
    }

    #[test]
    fn test_parse_pubkey() {
        let key = Pubkey::new_unique();
        assert_eq!(parse_pubkey("user", &key.to_string()).unwrap(), key);

        let err = parse_pubkey("user", "not-a-key").unwrap_err();
        assert!(err.is_input_error());
        assert!(!err.is_decode_error());
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2026-02-01T00:00:00Z").unwrap(), 1_769_904_000);
        assert!(matches!(
            parse_timestamp("Feb 1st"),
            Err(CodecError::InvalidTimestamp(_))
        ));
    }
}
