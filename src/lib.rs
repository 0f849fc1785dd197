//! SportsEdge - Sports betting odds analytics
//!
//! This library provides:
//! - American odds conversion, payouts and expected value
//! - Arbitrage and middle detection across bookmakers
//! - Value bet scanning and Kelly criterion stake sizing
//! - Player performance trends for prop betting
//! - Odds feed parsing, snapshots and (with the `fetch` feature) a live client
//!
//! # Example
//!
//! ```no_run
//! use sportsedge::analysis::{scan_listings, ScanConfig};
//! use sportsedge::data::sample_listings;
//!
//! let games = sample_listings("basketball_nba");
//! let report = scan_listings(&games, &ScanConfig::default()).unwrap();
//! println!("{} middles, {} arbitrage", report.middles.len(), report.arbitrage.len());
//! ```

pub mod analysis;
pub mod core;
pub mod data;
pub mod models;

#[cfg(feature = "fetch")]
pub mod fetch;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;

// Re-export commonly used types
pub use analysis::{scan_listings, ScanConfig, ScanReport, ValueScanner};
pub use crate::core::{expected_value, implied_probability, DomainError, KellyCalculator, RecordError};
pub use data::{load_listings, parse_events, sample_listings, FeedEvent};
pub use models::{
    ArbitrageOpportunity, GameListing, MarketKind, MiddleKind, MiddleOpportunity, OddsQuote,
    ValueBet,
};
