//! Pre-flight checks for a bet against a decoded market account.
//!
//! These mirror the program's own checks so a doomed bet is reported before
//! a transaction is built. The program stays authoritative.

use serde::Serialize;
use tracing::debug;

use crate::{
    config::ProtocolConfig,
    state::{MarketAccount, RaceMarketAccount},
    types::{is_whitelist_required, CodecResult, CurrencyType, MarketStatus},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// First second at which bets are refused.
    pub betting_closes_at: i64,
    pub seconds_until_close: i64,
}

struct BetChecks {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl BetChecks {
    fn run(
        status: MarketStatus,
        currency: CurrencyType,
        betting_closes_at: i64,
        whitelist_required: bool,
        amount: u64,
        now: i64,
        config: &ProtocolConfig,
    ) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if status != MarketStatus::Active {
            errors.push(format!("Market is {status:?}, not accepting bets"));
        }
        if currency != CurrencyType::Sol {
            errors.push(format!("{currency:?} markets are not supported"));
        }
        if now >= betting_closes_at {
            errors.push(format!("Betting closed at {betting_closes_at} (now {now})"));
        }
        if config.bet_limits.check(amount).is_err() {
            errors.push(format!(
                "Bet of {amount} lamports is outside {}..={} lamports",
                config.bet_limits.min_lamports, config.bet_limits.max_lamports
            ));
        }
        if whitelist_required {
            warnings.push(
                "Market is whitelist-gated; the bettor must be on its whitelist".to_string(),
            );
        }
        Self { errors, warnings }
    }

    fn finish(self, betting_closes_at: i64, now: i64) -> BetValidation {
        let valid = self.errors.is_empty();
        debug!(valid, errors = self.errors.len(), "bet checked");
        BetValidation {
            valid,
            errors: self.errors,
            warnings: self.warnings,
            betting_closes_at,
            seconds_until_close: betting_closes_at.saturating_sub(now).max(0),
        }
    }
}

/// Check a boolean bet. Betting stops `betting_freeze_seconds` before close.
///
/// Errors only when the account holds an unknown enum byte.
pub fn validate_bet(
    market: &MarketAccount,
    amount: u64,
    now: i64,
    config: &ProtocolConfig,
) -> CodecResult<BetValidation> {
    let betting_closes_at = market
        .closing_time
        .saturating_sub(market.betting_freeze_seconds.max(0));
    let checks = BetChecks::run(
        market.status()?,
        market.currency_type()?,
        betting_closes_at,
        market.whitelist_required()?,
        amount,
        now,
        config,
    );
    Ok(checks.finish(betting_closes_at, now))
}

/// Check a race bet; race markets have no freeze window.
pub fn validate_race_bet(
    market: &RaceMarketAccount,
    outcome_index: u8,
    amount: u64,
    now: i64,
    config: &ProtocolConfig,
) -> CodecResult<BetValidation> {
    let mut checks = BetChecks::run(
        market.status()?,
        CurrencyType::try_from(market.currency_type)?,
        market.closing_time,
        is_whitelist_required(market.layer()?, market.access_gate()?),
        amount,
        now,
        config,
    );
    if usize::from(outcome_index) >= market.active_pools().len() {
        checks.errors.push(format!(
            "Outcome {outcome_index} does not exist; market has {} outcomes",
            market.outcome_count
        ));
    }
    Ok(checks.finish(market.closing_time, now))
}
