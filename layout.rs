//! Declared account layouts and a cursor-walking field reader.
//!
//! Account data carries no schema, so the layouts below are the contract:
//! field order and widths must mirror the program's struct declarations
//! exactly. A wrong width does not fail to parse, it yields a plausible
//! wrong value for every later field. The borsh structs in
//! [`crate::state`] are checked against these tables in tests.
//!
//! The reader never materializes the whole record. It starts after the
//! 8-byte discriminator and skips each preceding field by its encoded width:
//! fixed kinds by their size, strings by their u32 length prefix, options by
//! their tag (payload skipped only when present), vectors element by element.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    discriminator::{CONFIG_ACCOUNT, MARKET_ACCOUNT, RACE_MARKET_ACCOUNT},
    types::{CodecError, CodecResult},
};

pub const DISCRIMINATOR_LEN: usize = 8;
pub const PUBKEY_LEN: usize = 32;
const LEN_PREFIX: usize = 4;

/// Encoded shape of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    Bool,
    U16,
    U64,
    I64,
    Pubkey,
    /// Fixed-size opaque bytes (`[u8; N]`)
    Bytes(usize),
    /// u32 LE length + UTF-8
    String,
    /// 1-byte tag, payload only when the tag is 1
    Option(&'static FieldKind),
    Array(&'static FieldKind, usize),
    /// u32 LE count + elements
    Vec(&'static FieldKind),
}

impl FieldKind {
    /// Width when it does not depend on the data.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldKind::U8 | FieldKind::Bool => Some(1),
            FieldKind::U16 => Some(2),
            FieldKind::U64 | FieldKind::I64 => Some(8),
            FieldKind::Pubkey => Some(PUBKEY_LEN),
            FieldKind::Bytes(n) => Some(*n),
            FieldKind::Array(inner, n) => inner.fixed_width().map(|w| w * n),
            FieldKind::String | FieldKind::Option(_) | FieldKind::Vec(_) => None,
        }
    }

    /// Smallest possible encoding (empty string, `None`, empty vector).
    pub fn min_width(&self) -> usize {
        match self {
            FieldKind::String | FieldKind::Vec(_) => LEN_PREFIX,
            FieldKind::Option(_) => 1,
            FieldKind::Array(inner, n) => inner.min_width() * n,
            fixed => fixed.fixed_width().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

/// Program version a layout belongs to.
///
/// Account bytes carry no version tag, so the caller picks the layout; a
/// program upgrade that changes a struct needs a new version here, shipped
/// in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutVersion {
    V1,
}

impl LayoutVersion {
    pub const LATEST: LayoutVersion = LayoutVersion::V1;
}

#[derive(Debug, PartialEq, Eq)]
pub struct AccountLayout {
    pub account: &'static str,
    pub version: LayoutVersion,
    pub discriminator: [u8; 8],
    pub fields: &'static [Field],
}

impl AccountLayout {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Length of the shortest valid account, discriminator included.
    pub fn min_len(&self) -> usize {
        DISCRIMINATOR_LEN + self.fields.iter().map(|f| f.kind.min_width()).sum::<usize>()
    }
}

pub static MARKET_LAYOUT_V1: AccountLayout = AccountLayout {
    account: "Market",
    version: LayoutVersion::V1,
    discriminator: MARKET_ACCOUNT,
    fields: &[
        field("market_id", FieldKind::U64),
        field("question", FieldKind::String),
        field("closing_time", FieldKind::I64),
        field("resolution_time", FieldKind::I64),
        field("auto_stop_buffer", FieldKind::I64),
        field("yes_pool", FieldKind::U64),
        field("no_pool", FieldKind::U64),
        field("snapshot_yes_pool", FieldKind::U64),
        field("snapshot_no_pool", FieldKind::U64),
        field("status", FieldKind::U8),
        field("winning_outcome", FieldKind::Option(&FieldKind::Bool)),
        field("currency_type", FieldKind::U8),
        field("reserved_usdc_vault", FieldKind::Bytes(33)),
        field("creator_bond", FieldKind::U64),
        field("total_claimed", FieldKind::U64),
        field("platform_fee_collected", FieldKind::U64),
        field("last_bet_time", FieldKind::I64),
        field("bump", FieldKind::U8),
        field("layer", FieldKind::U8),
        field("resolution_mode", FieldKind::U8),
        field("access_gate", FieldKind::U8),
        field("creator", FieldKind::Pubkey),
        field("oracle_host", FieldKind::Option(&FieldKind::Pubkey)),
        field("council", FieldKind::Array(&FieldKind::Pubkey, 5)),
        field("council_size", FieldKind::U8),
        field("council_votes_yes", FieldKind::U8),
        field("council_votes_no", FieldKind::U8),
        field("council_threshold", FieldKind::U8),
        field("total_affiliate_fees", FieldKind::U64),
        field("invite_hash", FieldKind::Option(&FieldKind::Bytes(32))),
        field("creator_fee_bps", FieldKind::U16),
        field("total_creator_fees", FieldKind::U64),
        field("creator_profile", FieldKind::Option(&FieldKind::Pubkey)),
        field("platform_fee_bps_at_creation", FieldKind::U16),
        field("affiliate_fee_bps_at_creation", FieldKind::U16),
        field("betting_freeze_seconds", FieldKind::I64),
        field("has_bets", FieldKind::Bool),
        field("reserved", FieldKind::Bytes(8)),
    ],
};

pub static RACE_MARKET_LAYOUT_V1: AccountLayout = AccountLayout {
    account: "RaceMarket",
    version: LayoutVersion::V1,
    discriminator: RACE_MARKET_ACCOUNT,
    fields: &[
        field("market_id", FieldKind::U64),
        field("question", FieldKind::String),
        field("outcome_count", FieldKind::U8),
        field("outcome_labels", FieldKind::Vec(&FieldKind::String)),
        field("outcome_pools", FieldKind::Array(&FieldKind::U64, 10)),
        field("total_pool", FieldKind::U64),
        field("snapshot_pools", FieldKind::Array(&FieldKind::U64, 10)),
        field("snapshot_total", FieldKind::U64),
        field("closing_time", FieldKind::I64),
        field("resolution_time", FieldKind::I64),
        field("status", FieldKind::U8),
        field("winning_outcome", FieldKind::Option(&FieldKind::U8)),
        field("currency_type", FieldKind::U8),
        field("creator_bond", FieldKind::U64),
        field("total_claimed", FieldKind::U64),
        field("platform_fee_collected", FieldKind::U64),
        field("last_bet_time", FieldKind::I64),
        field("bump", FieldKind::U8),
        field("layer", FieldKind::U8),
        field("resolution_mode", FieldKind::U8),
        field("access_gate", FieldKind::U8),
        field("creator", FieldKind::Pubkey),
        field("oracle_host", FieldKind::Option(&FieldKind::Pubkey)),
        field("invite_hash", FieldKind::Option(&FieldKind::Bytes(32))),
        field("creator_fee_bps", FieldKind::U16),
        field("has_bets", FieldKind::Bool),
        field("reserved", FieldKind::Bytes(16)),
    ],
};

pub static CONFIG_LAYOUT_V1: AccountLayout = AccountLayout {
    account: "Config",
    version: LayoutVersion::V1,
    discriminator: CONFIG_ACCOUNT,
    fields: &[
        field("admin", FieldKind::Pubkey),
        field("treasury", FieldKind::Pubkey),
        field("guardian", FieldKind::Pubkey),
        field("paused", FieldKind::Bool),
        field("market_count", FieldKind::U64),
        field("race_market_count", FieldKind::U64),
        field("platform_fee_bps", FieldKind::U16),
        field("creation_fee", FieldKind::U64),
        field("bump", FieldKind::U8),
    ],
};

pub fn market_layout(version: LayoutVersion) -> &'static AccountLayout {
    match version {
        LayoutVersion::V1 => &MARKET_LAYOUT_V1,
    }
}

pub fn race_market_layout(version: LayoutVersion) -> &'static AccountLayout {
    match version {
        LayoutVersion::V1 => &RACE_MARKET_LAYOUT_V1,
    }
}

pub fn config_layout(version: LayoutVersion) -> &'static AccountLayout {
    match version {
        LayoutVersion::V1 => &CONFIG_LAYOUT_V1,
    }
}

fn take(data: &[u8], offset: usize, len: usize) -> CodecResult<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or(CodecError::AccountDataTooShort { needed: usize::MAX, len: data.len() })?;
    data.get(offset..end)
        .ok_or(CodecError::AccountDataTooShort { needed: end, len: data.len() })
}

fn read_len_prefix(data: &[u8], offset: usize) -> CodecResult<usize> {
    let bytes = take(data, offset, LEN_PREFIX)?;
    let mut buf = [0u8; LEN_PREFIX];
    buf.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(buf) as usize)
}

/// Encoded width of `kind` starting at `offset`.
fn encoded_width(
    kind: &FieldKind,
    data: &[u8],
    offset: usize,
    field: &'static str,
) -> CodecResult<usize> {
    if let Some(width) = kind.fixed_width() {
        take(data, offset, width)?;
        return Ok(width);
    }
    match kind {
        FieldKind::String => {
            let len = read_len_prefix(data, offset)?;
            take(data, offset + LEN_PREFIX, len)?;
            Ok(LEN_PREFIX + len)
        }
        FieldKind::Option(inner) => match take(data, offset, 1)?[0] {
            0 => Ok(1),
            1 => Ok(1 + encoded_width(inner, data, offset + 1, field)?),
            value => Err(CodecError::InvalidEnumByte { field, value }),
        },
        FieldKind::Array(inner, count) => {
            let mut width = 0;
            for _ in 0..*count {
                width += encoded_width(inner, data, offset + width, field)?;
            }
            Ok(width)
        }
        FieldKind::Vec(inner) => {
            let count = read_len_prefix(data, offset)?;
            let mut width = LEN_PREFIX;
            for _ in 0..count {
                width += encoded_width(inner, data, offset + width, field)?;
            }
            Ok(width)
        }
        _ => unreachable!("fixed-width kinds handled above"),
    }
}

/// Read-only view over raw account bytes for one declared layout.
#[derive(Debug, Clone, Copy)]
pub struct AccountView<'a> {
    layout: &'static AccountLayout,
    data: &'a [u8],
}

impl<'a> AccountView<'a> {
    /// Check length and discriminator; fields are decoded lazily.
    pub fn new(layout: &'static AccountLayout, data: &'a [u8]) -> CodecResult<Self> {
        let head = take(data, 0, DISCRIMINATOR_LEN)?;
        let mut found = [0u8; 8];
        found.copy_from_slice(head);
        if found != layout.discriminator {
            return Err(CodecError::DiscriminatorMismatch {
                account: layout.account,
                expected: layout.discriminator,
                found,
            });
        }
        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> &'static AccountLayout {
        self.layout
    }

    /// Byte offset of `name`, walking every preceding field.
    pub fn offset_of(&self, name: &str) -> CodecResult<usize> {
        self.locate(name).map(|(_, offset)| offset)
    }

    fn locate(&self, name: &str) -> CodecResult<(&'static Field, usize)> {
        let mut offset = DISCRIMINATOR_LEN;
        for field in self.layout.fields {
            if field.name == name {
                return Ok((field, offset));
            }
            offset += encoded_width(&field.kind, self.data, offset, field.name)?;
        }
        Err(CodecError::UnknownField {
            account: self.layout.account,
            field: name.to_string(),
        })
    }

    fn locate_as(
        &self,
        name: &str,
        kind: FieldKind,
        requested: &'static str,
    ) -> CodecResult<(&'static Field, usize)> {
        let (field, offset) = self.locate(name)?;
        if field.kind != kind {
            return Err(CodecError::FieldKindMismatch {
                field: field.name,
                requested,
            });
        }
        Ok((field, offset))
    }

    fn fixed<const N: usize>(
        &self,
        name: &str,
        kind: FieldKind,
        requested: &'static str,
    ) -> CodecResult<[u8; N]> {
        let (_, offset) = self.locate_as(name, kind, requested)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(take(self.data, offset, N)?);
        Ok(buf)
    }

    pub fn read_u8(&self, name: &str) -> CodecResult<u8> {
        self.fixed::<1>(name, FieldKind::U8, "u8").map(|b| b[0])
    }

    pub fn read_bool(&self, name: &str) -> CodecResult<bool> {
        let (field, offset) = self.locate_as(name, FieldKind::Bool, "bool")?;
        decode_bool(take(self.data, offset, 1)?[0], field.name)
    }

    pub fn read_u16(&self, name: &str) -> CodecResult<u16> {
        self.fixed(name, FieldKind::U16, "u16").map(u16::from_le_bytes)
    }

    pub fn read_u64(&self, name: &str) -> CodecResult<u64> {
        self.fixed(name, FieldKind::U64, "u64").map(u64::from_le_bytes)
    }

    pub fn read_i64(&self, name: &str) -> CodecResult<i64> {
        self.fixed(name, FieldKind::I64, "i64").map(i64::from_le_bytes)
    }

    pub fn read_pubkey(&self, name: &str) -> CodecResult<Pubkey> {
        self.fixed::<PUBKEY_LEN>(name, FieldKind::Pubkey, "pubkey")
            .map(Pubkey::new_from_array)
    }

    pub fn read_string(&self, name: &str) -> CodecResult<String> {
        let (field, offset) = self.locate_as(name, FieldKind::String, "string")?;
        let len = read_len_prefix(self.data, offset)?;
        let bytes = take(self.data, offset + LEN_PREFIX, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8(field.name))
    }

    pub fn read_option_bool(&self, name: &str) -> CodecResult<Option<bool>> {
        let (field, offset) =
            self.locate_as(name, FieldKind::Option(&FieldKind::Bool), "Option<bool>")?;
        match self.option_tag(field, offset)? {
            false => Ok(None),
            true => decode_bool(take(self.data, offset + 1, 1)?[0], field.name).map(Some),
        }
    }

    pub fn read_option_u8(&self, name: &str) -> CodecResult<Option<u8>> {
        let (field, offset) =
            self.locate_as(name, FieldKind::Option(&FieldKind::U8), "Option<u8>")?;
        match self.option_tag(field, offset)? {
            false => Ok(None),
            true => Ok(Some(take(self.data, offset + 1, 1)?[0])),
        }
    }

    pub fn read_option_pubkey(&self, name: &str) -> CodecResult<Option<Pubkey>> {
        let (field, offset) =
            self.locate_as(name, FieldKind::Option(&FieldKind::Pubkey), "Option<pubkey>")?;
        if !self.option_tag(field, offset)? {
            return Ok(None);
        }
        let mut buf = [0u8; PUBKEY_LEN];
        buf.copy_from_slice(take(self.data, offset + 1, PUBKEY_LEN)?);
        Ok(Some(Pubkey::new_from_array(buf)))
    }

    pub fn read_u64_array(&self, name: &str) -> CodecResult<Vec<u64>> {
        let (field, offset) = self.locate(name)?;
        let FieldKind::Array(FieldKind::U64, count) = field.kind else {
            return Err(CodecError::FieldKindMismatch {
                field: field.name,
                requested: "[u64; N]",
            });
        };
        let bytes = take(self.data, offset, count * 8)?;
        Ok(bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect())
    }

    fn option_tag(&self, field: &'static Field, offset: usize) -> CodecResult<bool> {
        match take(self.data, offset, 1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(CodecError::InvalidEnumByte {
                field: field.name,
                value,
            }),
        }
    }
}

fn decode_bool(byte: u8, field: &'static str) -> CodecResult<bool> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(CodecError::InvalidEnumByte { field, value }),
    }
}

/// String encoding of account data as handed over by an RPC response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountEncoding {
    Base64,
    Base58,
}

pub fn decode_account_data(encoded: &str, encoding: AccountEncoding) -> CodecResult<Vec<u8>> {
    match encoding {
        AccountEncoding::Base64 => STANDARD
            .decode(encoded.trim())
            .map_err(|e| CodecError::InvalidEncoding(format!("base64: {e}"))),
        AccountEncoding::Base58 => bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| CodecError::InvalidEncoding(format!("base58: {e}"))),
    }
}
