//! Core betting math

pub mod arbitrage;
pub mod error;
pub mod ev;
pub mod kelly;
pub mod middle;
pub mod odds;

// Re-export commonly used types
pub use arbitrage::{find_arbitrage, identify_arbitrage};
pub use error::{DomainError, RecordError};
pub use ev::expected_value;
pub use kelly::{kelly_fraction, kelly_stake, KellyCalculator, StakeSizing};
pub use middle::{find_middles, identify_middles, DEFAULT_MIN_MIDDLE};
pub use odds::{decimal_odds, format_odds, implied_probability, payout};
