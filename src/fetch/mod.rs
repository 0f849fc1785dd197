//! Live odds from The Odds API
//!
//! # Example
//!
//! ```no_run
//! use sportsedge::fetch::{FeedConfig, OddsApiClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OddsApiClient::new(FeedConfig::from_env())?;
//!
//!     let games = client.fetch_listings("NBA").await?;
//!     println!("Found {} games", games.len());
//!
//!     Ok(())
//! }
//! ```

mod client;

pub use crate::data::feed::{sport_key, SPORTS};
pub use client::{FeedConfig, FetchError, OddsApiClient};
