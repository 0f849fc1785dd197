//! Analysis built on the core math: value bets, market scans and player form

pub mod performance;
pub mod scan;
pub mod value;

pub use performance::{
    analyze, hit_rate, insights, project_trend, prop_outlook, GameLog, Metric,
    PerformanceSummary, PropSide,
};
pub use scan::{scan_listings, ScanConfig, ScanReport};
pub use value::{MarketImplied, NoVigConsensus, ProbabilityModel, ValueScanner};
