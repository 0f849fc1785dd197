//! Errors raised by the betting math

use thiserror::Error;

/// A math invariant was violated by the caller.
///
/// Fails a single call only. Scans over many records catch this per record
/// and keep going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("American odds of 0 are undefined")]
    ZeroOdds,

    #[error("Probability must be between 0 and 1, got {0}")]
    ProbabilityOutOfRange(f64),

    #[error("Stake must be a finite non-negative amount, got {0}")]
    InvalidStake(f64),

    #[error("Threshold must be a finite positive number, got {0}")]
    InvalidThreshold(f64),
}

/// A feed record that cannot become a typed quote or listing.
///
/// The offending outcome (or game, for team errors) is skipped and the rest
/// of the batch is kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Missing field `{0}`")]
    MissingField(&'static str),

    #[error("Field `{field}` is not numeric: {value}")]
    NonNumeric { field: &'static str, value: String },

    #[error("Price {0} is not a whole American odds value")]
    FractionalOdds(f64),

    #[error("Price of 0 is not a valid American odds quote")]
    ZeroOdds,

    #[error("Invalid teams: home `{home}`, away `{away}`")]
    InvalidTeams { home: String, away: String },
}

/// Check that a win probability lies in [0, 1]
pub fn validate_probability(probability: f64) -> Result<f64, DomainError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(DomainError::ProbabilityOutOfRange(probability));
    }
    Ok(probability)
}

/// Check that a stake is finite and non-negative
pub fn validate_stake(stake: f64) -> Result<f64, DomainError> {
    if !stake.is_finite() || stake < 0.0 {
        return Err(DomainError::InvalidStake(stake));
    }
    Ok(stake)
}
