//! Immutable protocol and rule-set configuration.
//!
//! Nothing in the crate reads module-level state for these values; callers
//! pass a [`ProtocolConfig`] to the encoder and a [`RuleConfig`] to the
//! validator, so different protocol or rule versions can run side by side.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants,
    types::{parse_pubkey, CodecError, CodecResult, MarketLayer},
};

/// Platform fee per layer, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    pub official_bps: u16,
    pub lab_bps: u16,
    pub private_bps: u16,
    pub affiliate_bps: u16,
    pub max_creator_fee_bps: u16,
}

impl FeeSchedule {
    pub fn fee_bps_for(&self, layer: MarketLayer) -> u16 {
        match layer {
            MarketLayer::Official => self.official_bps,
            MarketLayer::Lab => self.lab_bps,
            MarketLayer::Private => self.private_bps,
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            official_bps: constants::OFFICIAL_FEE_BPS,
            lab_bps: constants::LAB_FEE_BPS,
            private_bps: constants::PRIVATE_FEE_BPS,
            affiliate_bps: constants::AFFILIATE_FEE_BPS,
            max_creator_fee_bps: constants::MAX_CREATOR_FEE_BPS,
        }
    }
}

/// Accepted single-bet range, in lamports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetLimits {
    pub min_lamports: u64,
    pub max_lamports: u64,
}

impl BetLimits {
    pub fn check(&self, amount: u64) -> CodecResult<()> {
        if amount == 0 || amount < self.min_lamports || amount > self.max_lamports {
            return Err(CodecError::InvalidAmount {
                amount,
                min: self.min_lamports,
                max: self.max_lamports,
            });
        }
        Ok(())
    }
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_lamports: constants::MIN_BET_LAMPORTS,
            max_lamports: constants::MAX_BET_LAMPORTS,
        }
    }
}

/// Parameters of one deployed program version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub program_id: Pubkey,
    pub treasury: Pubkey,
    pub fees: FeeSchedule,
    pub bet_limits: BetLimits,
    pub max_batch_claims: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            program_id: constants::program_id(),
            treasury: constants::treasury(),
            fees: FeeSchedule::default(),
            bet_limits: BetLimits::default(),
            max_batch_claims: constants::MAX_BATCH_CLAIMS,
        }
    }
}

/// On-disk form of [`ProtocolConfig`]: keys as base58 strings, every
/// section optional and defaulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolConfigFile {
    pub program_id: Option<String>,
    pub treasury: Option<String>,
    pub fees: Option<FeeSchedule>,
    pub bet_limits: Option<BetLimits>,
    pub max_batch_claims: Option<usize>,
}

impl ProtocolConfig {
    /// Load a config from JSON, falling back to mainnet defaults for
    /// anything not given.
    pub fn from_json(json: &str) -> CodecResult<Self> {
        let file: ProtocolConfigFile =
            serde_json::from_str(json).map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        Self::try_from(file)
    }

    pub fn to_file(&self) -> ProtocolConfigFile {
        ProtocolConfigFile {
            program_id: Some(self.program_id.to_string()),
            treasury: Some(self.treasury.to_string()),
            fees: Some(self.fees),
            bet_limits: Some(self.bet_limits),
            max_batch_claims: Some(self.max_batch_claims),
        }
    }
}

impl TryFrom<ProtocolConfigFile> for ProtocolConfig {
    type Error = CodecError;

    fn try_from(file: ProtocolConfigFile) -> Result<Self, Self::Error> {
        let defaults = ProtocolConfig::default();
        let program_id = match file.program_id.as_deref() {
            Some(value) => parse_pubkey("programId", value)?,
            None => defaults.program_id,
        };
        let treasury = match file.treasury.as_deref() {
            Some(value) => parse_pubkey("treasury", value)?,
            None => defaults.treasury,
        };
        let bet_limits = file.bet_limits.unwrap_or(defaults.bet_limits);
        if bet_limits.min_lamports == 0 || bet_limits.min_lamports > bet_limits.max_lamports {
            return Err(CodecError::InvalidConfig(format!(
                "bet limits {}..={} are empty",
                bet_limits.min_lamports, bet_limits.max_lamports
            )));
        }
        let fees = file.fees.unwrap_or(defaults.fees);
        let max_fee = [fees.official_bps, fees.lab_bps, fees.private_bps]
            .into_iter()
            .max()
            .unwrap_or_default();
        if u64::from(max_fee) > constants::BPS_DENOMINATOR {
            return Err(CodecError::InvalidConfig(format!(
                "fee of {max_fee} bps exceeds 100%"
            )));
        }
        Ok(Self {
            program_id,
            treasury,
            fees,
            bet_limits,
            max_batch_claims: file.max_batch_claims.unwrap_or(defaults.max_batch_claims),
        })
    }
}

/// Content and source rule-set version.
///
/// V1 treats a missing data source as advisory. V2 requires an approved or
/// explicitly annotated source and adds further denylist entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleSetVersion {
    #[serde(rename = "v1")]
    V1,
    #[serde(rename = "v2")]
    V2,
}

impl RuleSetVersion {
    pub fn requires_approved_source(self) -> bool {
        matches!(self, RuleSetVersion::V2)
    }
}

/// Parameters for the market rule validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConfig {
    pub version: RuleSetVersion,
    pub min_event_buffer_hours: f64,
    pub recommended_event_buffer_hours: f64,
    pub approved_sources: Vec<String>,
}

impl RuleConfig {
    pub fn for_version(version: RuleSetVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> CodecResult<Self> {
        let config: RuleConfig =
            serde_json::from_str(json).map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        if config.min_event_buffer_hours < 0.0
            || config.recommended_event_buffer_hours < config.min_event_buffer_hours
        {
            return Err(CodecError::InvalidConfig(
                "recommended event buffer must be at least the minimum".to_string(),
            ));
        }
        Ok(config)
    }

    /// Lowercased approved source matching the text, if any.
    pub fn approved_source_in(&self, lowercase_text: &str) -> Option<&str> {
        self.approved_sources
            .iter()
            .map(String::as_str)
            .find(|source| lowercase_text.contains(&source.to_lowercase()))
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            version: RuleSetVersion::V2,
            min_event_buffer_hours: constants::MIN_EVENT_BUFFER_HOURS,
            recommended_event_buffer_hours: constants::RECOMMENDED_EVENT_BUFFER_HOURS,
            approved_sources: constants::APPROVED_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
