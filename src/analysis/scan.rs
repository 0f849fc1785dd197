//! Market scan
//!
//! One pass over a batch of listings: arbitrage, middles and value bets.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::value::{MarketImplied, NoVigConsensus, ProbabilityModel, ValueScanner};
use crate::core::arbitrage::identify_arbitrage;
use crate::core::error::{validate_stake, DomainError};
use crate::core::middle::{identify_middles, DEFAULT_MIN_MIDDLE};
use crate::models::{ArbitrageOpportunity, GameListing, MiddleOpportunity, ValueBet};

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Minimum line gap for a middle, in points
    pub min_middle: f64,
    /// Minimum EV in dollars for a value bet
    pub min_ev: f64,
    /// Stake value bets are priced at
    pub stake: f64,
    /// Price value bets against the no-vig consensus instead of the quote itself
    pub no_vig: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_middle: DEFAULT_MIN_MIDDLE,
            min_ev: 5.0,
            stake: 100.0,
            no_vig: false,
        }
    }
}

/// Scan result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub games_scanned: usize,
    pub arbitrage: Vec<ArbitrageOpportunity>,
    pub middles: Vec<MiddleOpportunity>,
    pub value_bets: Vec<ValueBet>,
}

impl ScanReport {
    pub fn opportunity_count(&self) -> usize {
        self.arbitrage.len() + self.middles.len() + self.value_bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opportunity_count() == 0
    }
}

/// Run every detector over `games`
///
/// Only a bad configuration fails the scan; bad records were already
/// dropped when the listings were built.
pub fn scan_listings(games: &[GameListing], config: &ScanConfig) -> Result<ScanReport, DomainError> {
    let stake = validate_stake(config.stake)?;
    let middles = identify_middles(games, config.min_middle)?;
    let arbitrage = identify_arbitrage(games);

    let model: &dyn ProbabilityModel = if config.no_vig {
        &NoVigConsensus
    } else {
        &MarketImplied
    };
    let value_bets = ValueScanner::new(config.min_ev, stake).scan(games, model);

    let report = ScanReport {
        games_scanned: games.len(),
        arbitrage,
        middles,
        value_bets,
    };

    debug!(
        "Scan found {} arbitrage, {} middles, {} value bets",
        report.arbitrage.len(),
        report.middles.len(),
        report.value_bets.len()
    );
    info!(
        "Scanned {} games, {} opportunities",
        report.games_scanned,
        report.opportunity_count()
    );

    Ok(report)
}
