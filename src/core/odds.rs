//! American odds conversion
//!
//! American odds state the profit on a 100 unit stake when positive (+150 wins
//! 150 on 100) and the stake needed to profit 100 when negative (-150 risks
//! 150 to win 100).

use super::error::{validate_stake, DomainError};

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Implied (break-even) probability of an American price, rounded to 3 places
///
/// # Examples
/// ```
/// use sportsedge::core::odds::implied_probability;
/// assert_eq!(implied_probability(100).unwrap(), 0.5);
/// assert_eq!(implied_probability(-150).unwrap(), 0.6);
/// ```
pub fn implied_probability(american_odds: i32) -> Result<f64, DomainError> {
    if american_odds == 0 {
        return Err(DomainError::ZeroOdds);
    }

    let odds = american_odds as f64;
    let probability = if american_odds > 0 {
        100.0 / (odds + 100.0)
    } else {
        odds.abs() / (odds.abs() + 100.0)
    };

    Ok(round_to(probability, 3))
}

/// Display string with a leading `+` for positive odds
pub fn format_odds(american_odds: i32) -> String {
    if american_odds > 0 {
        format!("+{}", american_odds)
    } else {
        american_odds.to_string()
    }
}

/// Winnings on a winning bet, not including the returned stake
pub fn payout(american_odds: i32, stake: f64) -> Result<f64, DomainError> {
    if american_odds == 0 {
        return Err(DomainError::ZeroOdds);
    }
    let stake = validate_stake(stake)?;

    let odds = american_odds as f64;
    if american_odds > 0 {
        Ok(stake * odds / 100.0)
    } else {
        Ok(stake * 100.0 / odds.abs())
    }
}

/// Decimal odds (total return per unit staked)
pub fn decimal_odds(american_odds: i32) -> Result<f64, DomainError> {
    Ok(1.0 + payout(american_odds, 1.0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_probability_even_money() {
        assert_eq!(implied_probability(100).unwrap(), 0.5);
        assert_eq!(implied_probability(-100).unwrap(), 0.5);
    }

    #[test]
    fn test_implied_probability_formulas() {
        for odds in [105, 150, 240, 1000] {
            let expected = round_to(100.0 / (odds as f64 + 100.0), 3);
            assert_eq!(implied_probability(odds).unwrap(), expected);
        }
        for odds in [-105, -110, -150, -400] {
            let abs = (odds as f64).abs();
            let expected = round_to(abs / (abs + 100.0), 3);
            assert_eq!(implied_probability(odds).unwrap(), expected);
        }
        assert_eq!(implied_probability(150).unwrap(), 0.4);
        assert_eq!(implied_probability(-110).unwrap(), 0.524);
    }

    #[test]
    fn test_implied_probability_zero_is_error() {
        assert_eq!(implied_probability(0), Err(DomainError::ZeroOdds));
    }

    #[test]
    fn test_format_odds() {
        assert_eq!(format_odds(150), "+150");
        assert_eq!(format_odds(-110), "-110");
        assert_eq!(format_odds(0), "0");
    }

    #[test]
    fn test_payout() {
        assert!((payout(150, 100.0).unwrap() - 150.0).abs() < 1e-9);
        assert!((payout(-200, 100.0).unwrap() - 50.0).abs() < 1e-9);
        assert!((payout(-110, 110.0).unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(payout(0, 100.0), Err(DomainError::ZeroOdds));
        assert!(payout(150, -5.0).is_err());
    }

    #[test]
    fn test_decimal_odds() {
        assert!((decimal_odds(100).unwrap() - 2.0).abs() < 1e-9);
        assert!((decimal_odds(-200).unwrap() - 1.5).abs() < 1e-9);
        assert!((decimal_odds(250).unwrap() - 3.5).abs() < 1e-9);
    }
}
