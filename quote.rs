//! Parimutuel quote and payout arithmetic.
//!
//! Winners split the losing pool pro rata and pay the platform fee on the
//! profit only:
//!
//! ```text
//! profit = opposing_pool * stake / winning_pool   (u128, floor)
//! fee    = profit * fee_bps / 10_000              (floor)
//! payout = stake + profit - fee
//! ```
//!
//! For a quote the winning pool is the chosen side *after* adding the bet;
//! for a claim estimate it is the snapshot pool, which already holds the
//! stake.

use serde::Serialize;

use crate::{
    config::FeeSchedule,
    constants::BPS_DENOMINATOR,
    state::MarketAccount,
    types::{CodecError, CodecResult, Side},
};

/// Inputs of a boolean bet quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequest {
    pub side: Side,
    pub amount: u64,
    pub yes_pool: u64,
    pub no_pool: u64,
    pub fee_bps: u16,
}

/// Expected outcome of a bet if it wins and nobody else bets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetQuote {
    pub expected_payout: u64,
    /// Net of fee.
    pub potential_profit: u64,
    pub fee: u64,
    /// Share of the total pool on the chosen side after the bet.
    pub implied_probability: f64,
    pub decimal_odds: f64,
    pub new_yes_pool: u64,
    pub new_no_pool: u64,
}

/// Expected outcome of a race bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceQuote {
    pub expected_payout: u64,
    pub potential_profit: u64,
    pub fee: u64,
    pub implied_probability: f64,
    pub decimal_odds: f64,
    pub new_pools: Vec<u64>,
}

/// Result of applying the payout formula to a settled market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimEstimate {
    pub won: bool,
    pub payout: u64,
    pub profit: u64,
    pub fee: u64,
}

struct Split {
    profit: u64,
    fee: u64,
    payout: u64,
}

fn check_fee_bps(fee_bps: u16) -> CodecResult<()> {
    if u64::from(fee_bps) > BPS_DENOMINATOR {
        return Err(CodecError::InvalidArgument(format!(
            "fee of {fee_bps} bps exceeds {BPS_DENOMINATOR}"
        )));
    }
    Ok(())
}

fn split(stake: u64, winning_pool: u64, losing_pool: u64, fee_bps: u16) -> CodecResult<Split> {
    if winning_pool == 0 {
        return Ok(Split {
            profit: 0,
            fee: 0,
            payout: stake,
        });
    }
    let gross = u128::from(losing_pool) * u128::from(stake) / u128::from(winning_pool);
    let fee = gross * u128::from(fee_bps) / u128::from(BPS_DENOMINATOR);
    let payout = u128::from(stake) + gross - fee;
    let to_u64 = |value: u128| {
        u64::try_from(value)
            .map_err(|_| CodecError::InvalidArgument("payout overflows u64".to_string()))
    };
    Ok(Split {
        profit: to_u64(gross - fee)?,
        fee: to_u64(fee)?,
        payout: to_u64(payout)?,
    })
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Quote a boolean bet against the current pools.
pub fn quote_bet(request: &QuoteRequest) -> CodecResult<BetQuote> {
    if request.amount == 0 {
        return Err(CodecError::InvalidArgument(
            "bet amount must be positive".to_string(),
        ));
    }
    check_fee_bps(request.fee_bps)?;

    let (side_pool, opposing) = match request.side {
        Side::Yes => (request.yes_pool, request.no_pool),
        Side::No => (request.no_pool, request.yes_pool),
    };
    let new_side = side_pool
        .checked_add(request.amount)
        .ok_or_else(|| CodecError::InvalidArgument("pool overflows u64".to_string()))?;
    let split = split(request.amount, new_side, opposing, request.fee_bps)?;

    let (new_yes_pool, new_no_pool) = match request.side {
        Side::Yes => (new_side, request.no_pool),
        Side::No => (request.yes_pool, new_side),
    };
    Ok(BetQuote {
        expected_payout: split.payout,
        potential_profit: split.profit,
        fee: split.fee,
        implied_probability: new_side as f64 / (new_side as f64 + opposing as f64),
        decimal_odds: ratio(split.payout, request.amount),
        new_yes_pool,
        new_no_pool,
    })
}

/// Quote a bet on a decoded boolean market, with the layer's platform fee.
pub fn quote_market_bet(
    market: &MarketAccount,
    side: Side,
    amount: u64,
    fees: &FeeSchedule,
) -> CodecResult<BetQuote> {
    quote_bet(&QuoteRequest {
        side,
        amount,
        yes_pool: market.yes_pool,
        no_pool: market.no_pool,
        fee_bps: fees.fee_bps_for(market.layer()?),
    })
}

/// Quote a race bet; the opposing pool is the sum of every other outcome.
pub fn quote_race_bet(
    outcome_index: u8,
    amount: u64,
    pools: &[u64],
    fee_bps: u16,
) -> CodecResult<RaceQuote> {
    let index = usize::from(outcome_index);
    if index >= pools.len() {
        return Err(CodecError::InvalidArgument(format!(
            "outcome index {outcome_index} out of range 0..{}",
            pools.len()
        )));
    }
    if amount == 0 {
        return Err(CodecError::InvalidArgument(
            "bet amount must be positive".to_string(),
        ));
    }
    check_fee_bps(fee_bps)?;

    let mut new_pools = pools.to_vec();
    new_pools[index] = new_pools[index]
        .checked_add(amount)
        .ok_or_else(|| CodecError::InvalidArgument("pool overflows u64".to_string()))?;
    let opposing = pools
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .try_fold(0u64, |acc, (_, pool)| acc.checked_add(*pool))
        .ok_or_else(|| CodecError::InvalidArgument("pool overflows u64".to_string()))?;
    let split = split(amount, new_pools[index], opposing, fee_bps)?;

    Ok(RaceQuote {
        expected_payout: split.payout,
        potential_profit: split.profit,
        fee: split.fee,
        implied_probability: new_pools[index] as f64
            / (new_pools[index] as f64 + opposing as f64),
        decimal_odds: ratio(split.payout, amount),
        new_pools,
    })
}

/// Estimate the claim for a stake on a resolved boolean market, using the
/// pools snapshotted at close.
pub fn estimate_claim(
    stake: u64,
    side: Side,
    snapshot_yes_pool: u64,
    snapshot_no_pool: u64,
    winning_side: Side,
    fee_bps: u16,
) -> CodecResult<ClaimEstimate> {
    check_fee_bps(fee_bps)?;
    if side != winning_side {
        return Ok(ClaimEstimate {
            won: false,
            payout: 0,
            profit: 0,
            fee: 0,
        });
    }
    let (winning_pool, losing_pool) = match winning_side {
        Side::Yes => (snapshot_yes_pool, snapshot_no_pool),
        Side::No => (snapshot_no_pool, snapshot_yes_pool),
    };
    if stake > winning_pool {
        return Err(CodecError::InvalidArgument(format!(
            "stake {stake} exceeds winning pool {winning_pool}"
        )));
    }
    let split = split(stake, winning_pool, losing_pool, fee_bps)?;
    Ok(ClaimEstimate {
        won: true,
        payout: split.payout,
        profit: split.profit,
        fee: split.fee,
    })
}
