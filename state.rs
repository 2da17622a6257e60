//! Typed views of the program's accounts.
//!
//! Two ways in: the targeted readers (`read_market_access`, `read_config`)
//! walk the declared layout and touch only the fields they need, while
//! [`MarketAccount`] / [`RaceMarketAccount`] decode the full record for quote
//! and bet checks. Tests keep the two in agreement.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::{
    discriminator::{MARKET_ACCOUNT, RACE_MARKET_ACCOUNT},
    layout::{
        config_layout, market_layout, race_market_layout, AccountView, LayoutVersion,
        DISCRIMINATOR_LEN,
    },
    types::{
        is_whitelist_required, AccessGate, CodecError, CodecResult, CurrencyType, MarketLayer,
        MarketStatus, ResolutionMode,
    },
};

/// Boolean market account (layout v1).
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct MarketAccount {
    pub market_id: u64,
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub auto_stop_buffer: i64,
    pub yes_pool: u64,
    pub no_pool: u64,
    pub snapshot_yes_pool: u64,
    pub snapshot_no_pool: u64,
    pub status: u8,
    pub winning_outcome: Option<bool>,
    pub currency_type: u8,
    pub reserved_usdc_vault: [u8; 33],
    pub creator_bond: u64,
    pub total_claimed: u64,
    pub platform_fee_collected: u64,
    pub last_bet_time: i64,
    pub bump: u8,
    pub layer: u8,
    pub resolution_mode: u8,
    pub access_gate: u8,
    pub creator: Pubkey,
    pub oracle_host: Option<Pubkey>,
    pub council: [Pubkey; 5],
    pub council_size: u8,
    pub council_votes_yes: u8,
    pub council_votes_no: u8,
    pub council_threshold: u8,
    pub total_affiliate_fees: u64,
    pub invite_hash: Option<[u8; 32]>,
    pub creator_fee_bps: u16,
    pub total_creator_fees: u64,
    pub creator_profile: Option<Pubkey>,
    pub platform_fee_bps_at_creation: u16,
    pub affiliate_fee_bps_at_creation: u16,
    pub betting_freeze_seconds: i64,
    pub has_bets: bool,
    pub reserved: [u8; 8],
}

/// N-outcome race market account (layout v1).
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RaceMarketAccount {
    pub market_id: u64,
    pub question: String,
    pub outcome_count: u8,
    pub outcome_labels: Vec<String>,
    pub outcome_pools: [u64; 10],
    pub total_pool: u64,
    pub snapshot_pools: [u64; 10],
    pub snapshot_total: u64,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub status: u8,
    pub winning_outcome: Option<u8>,
    pub currency_type: u8,
    pub creator_bond: u64,
    pub total_claimed: u64,
    pub platform_fee_collected: u64,
    pub last_bet_time: i64,
    pub bump: u8,
    pub layer: u8,
    pub resolution_mode: u8,
    pub access_gate: u8,
    pub creator: Pubkey,
    pub oracle_host: Option<Pubkey>,
    pub invite_hash: Option<[u8; 32]>,
    pub creator_fee_bps: u16,
    pub has_bets: bool,
    pub reserved: [u8; 16],
}

fn check_discriminator(
    account: &'static str,
    expected: [u8; 8],
    data: &[u8],
) -> CodecResult<()> {
    let head = data.get(..DISCRIMINATOR_LEN).ok_or(CodecError::AccountDataTooShort {
        needed: DISCRIMINATOR_LEN,
        len: data.len(),
    })?;
    let mut found = [0u8; 8];
    found.copy_from_slice(head);
    if found != expected {
        return Err(CodecError::DiscriminatorMismatch {
            account,
            expected,
            found,
        });
    }
    Ok(())
}

/// Deserialize a record that may be followed by zero padding up to the
/// account's allocated size.
fn decode_padded<T: BorshDeserialize>(data: &[u8]) -> CodecResult<T> {
    let mut body = &data[DISCRIMINATOR_LEN..];
    T::deserialize(&mut body).map_err(|e| CodecError::Borsh(e.to_string()))
}

fn encode_with(discriminator: [u8; 8], record: &impl BorshSerialize) -> CodecResult<Vec<u8>> {
    let mut data = discriminator.to_vec();
    record
        .serialize(&mut data)
        .map_err(|e| CodecError::Serialization(e.to_string()))?;
    Ok(data)
}

impl MarketAccount {
    pub fn from_account_data(data: &[u8]) -> CodecResult<Self> {
        check_discriminator("Market", MARKET_ACCOUNT, data)?;
        decode_padded(data)
    }

    /// Discriminator + borsh body, as the program stores it (minus padding).
    pub fn to_account_data(&self) -> CodecResult<Vec<u8>> {
        encode_with(MARKET_ACCOUNT, self)
    }

    pub fn status(&self) -> CodecResult<MarketStatus> {
        MarketStatus::try_from(self.status)
    }

    pub fn layer(&self) -> CodecResult<MarketLayer> {
        MarketLayer::try_from(self.layer)
    }

    pub fn access_gate(&self) -> CodecResult<AccessGate> {
        AccessGate::try_from(self.access_gate)
    }

    pub fn currency_type(&self) -> CodecResult<CurrencyType> {
        CurrencyType::try_from(self.currency_type)
    }

    pub fn resolution_mode(&self) -> CodecResult<ResolutionMode> {
        ResolutionMode::try_from(self.resolution_mode)
    }

    pub fn whitelist_required(&self) -> CodecResult<bool> {
        Ok(is_whitelist_required(self.layer()?, self.access_gate()?))
    }
}

impl RaceMarketAccount {
    pub fn from_account_data(data: &[u8]) -> CodecResult<Self> {
        check_discriminator("RaceMarket", RACE_MARKET_ACCOUNT, data)?;
        decode_padded(data)
    }

    pub fn to_account_data(&self) -> CodecResult<Vec<u8>> {
        encode_with(RACE_MARKET_ACCOUNT, self)
    }

    /// Live pools of the declared outcomes only.
    pub fn active_pools(&self) -> &[u64] {
        let count = usize::from(self.outcome_count).min(self.outcome_pools.len());
        &self.outcome_pools[..count]
    }

    pub fn status(&self) -> CodecResult<MarketStatus> {
        MarketStatus::try_from(self.status)
    }

    pub fn layer(&self) -> CodecResult<MarketLayer> {
        MarketLayer::try_from(self.layer)
    }

    pub fn access_gate(&self) -> CodecResult<AccessGate> {
        AccessGate::try_from(self.access_gate)
    }
}

/// Access-relevant fields of a market, read without a full decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAccessInfo {
    pub market_id: u64,
    pub status: MarketStatus,
    pub layer: MarketLayer,
    /// Gate byte as stored
    pub stored_access_gate: AccessGate,
    /// Gate in force: Lab and Official markets are always public
    pub access_gate: AccessGate,
    pub whitelist_required: bool,
}

fn access_info(view: &AccountView<'_>) -> CodecResult<MarketAccessInfo> {
    let layer = MarketLayer::try_from(view.read_u8("layer")?)?;
    let stored_access_gate = AccessGate::try_from(view.read_u8("access_gate")?)?;
    let access_gate = match layer {
        MarketLayer::Private => stored_access_gate,
        MarketLayer::Official | MarketLayer::Lab => AccessGate::Public,
    };
    Ok(MarketAccessInfo {
        market_id: view.read_u64("market_id")?,
        status: MarketStatus::try_from(view.read_u8("status")?)?,
        layer,
        stored_access_gate,
        access_gate,
        whitelist_required: is_whitelist_required(layer, stored_access_gate),
    })
}

/// Read id, status, layer and gate from raw boolean-market bytes.
pub fn read_market_access(data: &[u8], version: LayoutVersion) -> CodecResult<MarketAccessInfo> {
    access_info(&AccountView::new(market_layout(version), data)?)
}

pub fn read_race_market_access(
    data: &[u8],
    version: LayoutVersion,
) -> CodecResult<MarketAccessInfo> {
    access_info(&AccountView::new(race_market_layout(version), data)?)
}

/// Fields of the global config account the builders need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigInfo {
    pub treasury: Pubkey,
    pub paused: bool,
    pub market_count: u64,
    pub race_market_count: u64,
}

pub fn read_config(data: &[u8], version: LayoutVersion) -> CodecResult<ConfigInfo> {
    let view = AccountView::new(config_layout(version), data)?;
    Ok(ConfigInfo {
        treasury: view.read_pubkey("treasury")?,
        paused: view.read_bool("paused")?,
        market_count: view.read_u64("market_count")?,
        race_market_count: view.read_u64("race_market_count")?,
    })
}

/// Id the next boolean market will be created with.
pub fn next_market_id(config_data: &[u8], version: LayoutVersion) -> CodecResult<u64> {
    read_config(config_data, version).map(|c| c.market_count)
}

pub fn next_race_market_id(config_data: &[u8], version: LayoutVersion) -> CodecResult<u64> {
    read_config(config_data, version).map(|c| c.race_market_count)
}
