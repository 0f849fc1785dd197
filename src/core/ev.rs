//! Expected value of a single bet

use super::error::{validate_probability, DomainError};
use super::odds::{payout, round_to};

/// Probability-weighted profit of a bet, rounded to cents
///
/// `ev = p * winnings - (1 - p) * stake`
///
/// A probability outside [0, 1] is rejected rather than clamped.
///
/// # Examples
/// ```
/// use sportsedge::core::ev::expected_value;
/// assert_eq!(expected_value(150, 0.6, 100.0).unwrap(), 50.0);
/// ```
pub fn expected_value(
    american_odds: i32,
    win_probability: f64,
    stake: f64,
) -> Result<f64, DomainError> {
    let p = validate_probability(win_probability)?;
    let winnings = payout(american_odds, stake)?;

    let ev = p * winnings - (1.0 - p) * stake;
    Ok(round_to(ev, 2))
}

/// EV of a bet priced at its own implied probability
pub fn market_expected_value(american_odds: i32, stake: f64) -> Result<f64, DomainError> {
    let p = super::odds::implied_probability(american_odds)?;
    expected_value(american_odds, p, stake)
}
