//! Sample odds slate
//!
//! Deterministic listings served when the live feed is unavailable, so the
//! dashboard surfaces always have something to render. The slate is built to
//! contain one arbitrage, several middles and a spread of prices.

use serde_json::Value;

use super::feed::{to_listings, FeedBookmaker, FeedEvent, FeedMarket, FeedOutcome};
use crate::models::GameListing;

fn outcome(name: &str, price: i32, point: Option<f64>) -> FeedOutcome {
    FeedOutcome {
        name: Some(name.to_string()),
        price: Some(Value::from(price)),
        point: point.map(Value::from),
    }
}

fn market(key: &str, outcomes: Vec<FeedOutcome>) -> FeedMarket {
    FeedMarket {
        key: key.to_string(),
        outcomes,
    }
}

fn bookmaker(key: &str, title: &str, markets: Vec<FeedMarket>) -> FeedBookmaker {
    FeedBookmaker {
        key: key.to_string(),
        title: title.to_string(),
        markets,
    }
}

/// Sample feed events tagged with the given sport key
pub fn sample_events(sport_key: &str) -> Vec<FeedEvent> {
    let (h1, a1) = ("Philadelphia 76ers", "Milwaukee Bucks");
    let (h2, a2) = ("Los Angeles Lakers", "Denver Nuggets");

    vec![
        FeedEvent {
            id: "sample-001".to_string(),
            sport_key: sport_key.to_string(),
            commence_time: "2024-01-15T00:10:00Z".to_string(),
            home_team: h1.to_string(),
            away_team: a1.to_string(),
            bookmakers: vec![
                bookmaker(
                    "draftkings",
                    "DraftKings",
                    vec![
                        market("h2h", vec![outcome(h1, -150, None), outcome(a1, 130, None)]),
                        market(
                            "spreads",
                            vec![outcome(h1, -110, Some(-3.5)), outcome(a1, -110, Some(3.5))],
                        ),
                        market(
                            "totals",
                            vec![
                                outcome("Over", -110, Some(221.5)),
                                outcome("Under", -110, Some(221.5)),
                            ],
                        ),
                    ],
                ),
                bookmaker(
                    "fanduel",
                    "FanDuel",
                    vec![
                        market("h2h", vec![outcome(h1, -140, None), outcome(a1, 125, None)]),
                        market(
                            "spreads",
                            vec![outcome(h1, -105, Some(-2.5)), outcome(a1, -115, Some(2.5))],
                        ),
                        market(
                            "totals",
                            vec![
                                outcome("Over", -108, Some(220.0)),
                                outcome("Under", -112, Some(220.0)),
                            ],
                        ),
                    ],
                ),
            ],
        },
        FeedEvent {
            id: "sample-002".to_string(),
            sport_key: sport_key.to_string(),
            commence_time: "2024-01-15T03:00:00Z".to_string(),
            home_team: h2.to_string(),
            away_team: a2.to_string(),
            bookmakers: vec![
                bookmaker(
                    "betmgm",
                    "BetMGM",
                    vec![
                        market("h2h", vec![outcome(h2, 105, None), outcome(a2, -125, None)]),
                        market(
                            "spreads",
                            vec![outcome(h2, -110, Some(1.5)), outcome(a2, -110, Some(-1.5))],
                        ),
                    ],
                ),
                bookmaker(
                    "caesars",
                    "Caesars",
                    vec![
                        market("h2h", vec![outcome(h2, -115, None), outcome(a2, 108, None)]),
                        market(
                            "spreads",
                            vec![outcome(h2, -110, Some(1.0)), outcome(a2, -110, Some(-1.0))],
                        ),
                    ],
                ),
            ],
        },
    ]
}

/// Validated sample listings
pub fn sample_listings(sport_key: &str) -> Vec<GameListing> {
    to_listings(sample_events(sport_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_listings_are_valid() {
        let listings = sample_listings("basketball_nba");
        assert_eq!(listings.len(), 2);
        for game in &listings {
            assert_eq!(game.sport_key, "basketball_nba");
            assert_eq!(game.bookmakers.len(), 2);
            assert!(game.commence_time.is_some());
        }
    }

    #[test]
    fn test_sample_events_are_deterministic() {
        let a = serde_json::to_string(&sample_events("icehockey_nhl")).unwrap();
        let b = serde_json::to_string(&sample_events("icehockey_nhl")).unwrap();
        assert_eq!(a, b);
    }
}
