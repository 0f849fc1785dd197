//! Kelly Criterion Stake Sizing
//!
//! Optimal stake for a bet quoted in American odds.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = decimal odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)

use serde::{Deserialize, Serialize};

use super::error::{validate_probability, validate_stake, DomainError};
use super::odds::decimal_odds;

/// Stake sizing recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeSizing {
    pub probability: f64,
    pub american_odds: i32,
    pub decimal_odds: f64,
    pub kelly_fraction: f64, // Full Kelly, negative when the bet has no edge
    pub stake: f64,
}

/// Full Kelly fraction for a single bet
///
/// # Examples
/// ```
/// use sportsedge::core::kelly::kelly_fraction;
/// // +100 at 60%: (1.0 * 0.6 - 0.4) / 1.0
/// let f = kelly_fraction(0.6, 100).unwrap();
/// assert!((f - 0.2).abs() < 1e-9);
/// ```
pub fn kelly_fraction(probability: f64, american_odds: i32) -> Result<f64, DomainError> {
    let p = validate_probability(probability)?;
    let net = decimal_odds(american_odds)? - 1.0;

    Ok((p * net - (1.0 - p)) / net)
}

/// Kelly stake, floored at zero and capped at a share of the bankroll
pub fn kelly_stake(
    probability: f64,
    american_odds: i32,
    bankroll: f64,
    max_fraction: f64,
) -> Result<f64, DomainError> {
    let bankroll = validate_stake(bankroll)?;
    let kelly = kelly_fraction(probability, american_odds)?;

    Ok((kelly * bankroll).min(bankroll * max_fraction).max(0.0))
}

/// Kelly calculator for stake sizing
///
/// Supports:
/// - Full Kelly (default) or fractional Kelly via `kelly_multiplier`
/// - A per-bet cap as a share of bankroll
/// - Several simultaneous bets under a total exposure limit
#[derive(Debug, Clone)]
pub struct KellyCalculator {
    pub bankroll: f64,
    pub kelly_multiplier: f64,
    pub max_stake_pct: f64,
    pub max_total_exposure: f64,
}

impl KellyCalculator {
    pub fn new(
        bankroll: f64,
        kelly_multiplier: f64,
        max_stake_pct: f64,
        max_total_exposure: f64,
    ) -> Self {
        Self {
            bankroll,
            kelly_multiplier,
            max_stake_pct,
            max_total_exposure,
        }
    }

    /// Full Kelly capped at 5% of bankroll per bet
    pub fn with_defaults(bankroll: f64) -> Self {
        Self {
            bankroll,
            kelly_multiplier: 1.0,
            max_stake_pct: 0.05,
            max_total_exposure: 0.30,
        }
    }

    /// Calculate stake sizing for a single bet
    pub fn calculate_single(
        &self,
        probability: f64,
        american_odds: i32,
    ) -> Result<StakeSizing, DomainError> {
        let bankroll = validate_stake(self.bankroll)?;
        let kelly = kelly_fraction(probability, american_odds)?;

        // Apply Kelly multiplier (fractional Kelly), then the per-bet cap
        let stake = (kelly * self.kelly_multiplier * bankroll)
            .min(bankroll * self.max_stake_pct)
            .max(0.0);

        Ok(StakeSizing {
            probability,
            american_odds,
            decimal_odds: decimal_odds(american_odds)?,
            kelly_fraction: kelly,
            stake,
        })
    }

    /// Calculate stake sizing for several simultaneous bets
    ///
    /// Stakes are scaled down proportionally when their total would exceed
    /// `max_total_exposure` of the bankroll.
    pub fn calculate_multiple(
        &self,
        bets: &[(f64, i32)],
    ) -> Result<Vec<StakeSizing>, DomainError> {
        if bets.is_empty() {
            return Ok(Vec::new());
        }

        let mut sizings = bets
            .iter()
            .map(|&(p, odds)| self.calculate_single(p, odds))
            .collect::<Result<Vec<_>, _>>()?;

        let total_stake: f64 = sizings.iter().map(|s| s.stake).sum();
        let max_exposure = self.bankroll * self.max_total_exposure;

        if total_stake > max_exposure {
            let scale_factor = max_exposure / total_stake;
            for sizing in &mut sizings {
                sizing.stake *= scale_factor;
            }
        }

        Ok(sizings)
    }

    /// Update bankroll after a settled bet
    pub fn update_bankroll(&mut self, profit: f64) {
        self.bankroll += profit;
    }
}

impl Default for KellyCalculator {
    fn default() -> Self {
        Self::with_defaults(1_000.0)
    }
}
