//! Odds feed records, snapshot files and sample data

pub mod feed;
pub mod mock;
pub mod odds_loader;

// Re-export commonly used types
pub use feed::{parse_events, sport_key, to_listings, FeedEvent, SPORTS};
pub use mock::{sample_events, sample_listings};
pub use odds_loader::{
    latest_snapshot, list_snapshots, load_events, load_listings, save_snapshot, LoadError,
    SnapshotFile,
};
