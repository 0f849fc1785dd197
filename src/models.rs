use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::RecordError;
use crate::data::feed::FeedEvent;

/// Betting market key as used by the odds feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarketKind {
    H2h,
    Spreads,
    Totals,
    Other(String),
}

impl MarketKind {
    pub fn as_str(&self) -> &str {
        match self {
            MarketKind::H2h => "h2h",
            MarketKind::Spreads => "spreads",
            MarketKind::Totals => "totals",
            MarketKind::Other(key) => key,
        }
    }
}

impl From<&str> for MarketKind {
    fn from(key: &str) -> Self {
        match key {
            "h2h" => MarketKind::H2h,
            "spreads" => MarketKind::Spreads,
            "totals" => MarketKind::Totals,
            other => MarketKind::Other(other.to_string()),
        }
    }
}

impl From<String> for MarketKind {
    fn from(key: String) -> Self {
        MarketKind::from(key.as_str())
    }
}

impl From<MarketKind> for String {
    fn from(kind: MarketKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A single price for one outcome at one bookmaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    pub bookmaker: String,
    pub outcome: String,
    pub price: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,
}

impl OddsQuote {
    /// Build a quote, rejecting zero odds
    pub fn new(
        bookmaker: impl Into<String>,
        outcome: impl Into<String>,
        price: i32,
        point: Option<f64>,
    ) -> Result<Self, RecordError> {
        if price == 0 {
            return Err(RecordError::ZeroOdds);
        }
        Ok(Self {
            bookmaker: bookmaker.into(),
            outcome: outcome.into(),
            price,
            point,
        })
    }
}

/// One bookmaker's market for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub key: MarketKind,
    pub quotes: Vec<OddsQuote>,
}

/// A bookmaker's listing for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmakerListing {
    pub key: String,
    pub title: String,
    pub markets: Vec<Market>,
}

/// One sporting event with every bookmaker's markets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameListing {
    pub id: String,
    pub sport_key: String,
    pub commence_time: Option<DateTime<Utc>>,
    pub home_team: String,
    pub away_team: String,
    pub bookmakers: Vec<BookmakerListing>,
}

impl GameListing {
    /// Build a listing, rejecting empty or identical team names
    pub fn new(
        id: impl Into<String>,
        sport_key: impl Into<String>,
        commence_time: Option<DateTime<Utc>>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        bookmakers: Vec<BookmakerListing>,
    ) -> Result<Self, RecordError> {
        let home_team = home_team.into();
        let away_team = away_team.into();

        if home_team.trim().is_empty() || away_team.trim().is_empty() || home_team == away_team {
            return Err(RecordError::InvalidTeams {
                home: home_team,
                away: away_team,
            });
        }

        Ok(Self {
            id: id.into(),
            sport_key: sport_key.into(),
            commence_time,
            home_team,
            away_team,
            bookmakers,
        })
    }

    /// Display label, e.g. "Boston Celtics vs Miami Heat"
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Iterate over every quote with its bookmaker title and market
    pub fn quotes(&self) -> impl Iterator<Item = (&BookmakerListing, &Market, &OddsQuote)> {
        self.bookmakers.iter().flat_map(|book| {
            book.markets
                .iter()
                .flat_map(move |market| market.quotes.iter().map(move |q| (book, market, q)))
        })
    }
}

/// Riskless two-way price combination across bookmakers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub game: String,
    pub game_id: String,
    pub best_home: i32,
    pub best_away: i32,
    pub profit_pct: f64,
}

/// Market a middle was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiddleKind {
    Spread,
    Total,
}

impl MiddleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MiddleKind::Spread => "spread",
            MiddleKind::Total => "total",
        }
    }

    pub fn market(&self) -> MarketKind {
        match self {
            MiddleKind::Spread => MarketKind::Spreads,
            MiddleKind::Total => MarketKind::Totals,
        }
    }
}

/// Line gap between two (bookmaker, outcome) quotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiddleOpportunity {
    pub game: String,
    pub game_id: String,
    #[serde(rename = "type")]
    pub kind: MiddleKind,
    pub middle_size: f64,
    pub book1: String,
    pub book2: String,
    pub outcome1: String,
    pub outcome2: String,
    pub line1: f64,
    pub line2: f64,
    pub odds1: i32,
    pub odds2: i32,
}

/// Outcome whose expected value clears the scan minimum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub game: String,
    pub bet_type: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,
    pub odds: i32,
    pub bookmaker: String,
    pub implied_prob: f64,
    pub model_prob: f64,
    pub ev: f64,
}

/// Odds conversion request
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub odds: i32,
    #[serde(default = "default_stake")]
    pub stake: f64,
}

/// Odds conversion response
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub odds: i32,
    pub display: String,
    pub implied_probability: f64,
    pub decimal_odds: f64,
    pub stake: f64,
    pub payout: f64,
}

/// Expected value request
#[derive(Debug, Serialize, Deserialize)]
pub struct EvRequest {
    pub odds: i32,
    /// Falls back to the implied probability of `odds`
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default = "default_stake")]
    pub stake: f64,
}

/// Expected value response
#[derive(Debug, Serialize, Deserialize)]
pub struct EvResponse {
    pub odds: i32,
    pub probability: f64,
    pub stake: f64,
    pub expected_value: f64,
    pub is_value_bet: bool,
}

/// Optional scan thresholds; unset fields take the scan defaults
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanParams {
    #[serde(default)]
    pub min_middle: Option<f64>,
    #[serde(default)]
    pub min_ev: Option<f64>,
    #[serde(default)]
    pub stake: Option<f64>,
    #[serde(default)]
    pub no_vig: Option<bool>,
}

/// Market scan request
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanRequest {
    pub games: Vec<FeedEvent>,
    #[serde(flatten)]
    pub params: ScanParams,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub snapshots: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

fn default_stake() -> f64 {
    100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_kind_roundtrip_keys() {
        assert_eq!(MarketKind::from("h2h"), MarketKind::H2h);
        assert_eq!(MarketKind::from("spreads"), MarketKind::Spreads);
        assert_eq!(MarketKind::from("totals"), MarketKind::Totals);
        assert_eq!(
            MarketKind::from("player_points"),
            MarketKind::Other("player_points".to_string())
        );
        assert_eq!(MarketKind::Other("outrights".into()).as_str(), "outrights");
    }

    #[test]
    fn test_market_kind_serializes_as_key() {
        let json = serde_json::to_string(&MarketKind::Spreads).unwrap();
        assert_eq!(json, "\"spreads\"");
        let kind: MarketKind = serde_json::from_str("\"totals\"").unwrap();
        assert_eq!(kind, MarketKind::Totals);
    }

    #[test]
    fn test_quote_rejects_zero_price() {
        assert_eq!(
            OddsQuote::new("fanduel", "Over", 0, Some(220.5)),
            Err(RecordError::ZeroOdds)
        );
        assert!(OddsQuote::new("fanduel", "Over", -110, Some(220.5)).is_ok());
    }

    #[test]
    fn test_listing_team_validation() {
        assert!(GameListing::new("g1", "basketball_nba", None, "", "Heat", vec![]).is_err());
        assert!(GameListing::new("g1", "basketball_nba", None, "Heat", "Heat", vec![]).is_err());

        let game =
            GameListing::new("g1", "basketball_nba", None, "Celtics", "Heat", vec![]).unwrap();
        assert_eq!(game.label(), "Celtics vs Heat");
    }

    #[test]
    fn test_middle_serializes_type_field() {
        let middle = MiddleOpportunity {
            game: "A vs B".to_string(),
            game_id: "g1".to_string(),
            kind: MiddleKind::Total,
            middle_size: 1.5,
            book1: "draftkings".to_string(),
            book2: "fanduel".to_string(),
            outcome1: "Over".to_string(),
            outcome2: "Over".to_string(),
            line1: 221.5,
            line2: 220.0,
            odds1: -110,
            odds2: -110,
        };
        let value = serde_json::to_value(&middle).unwrap();
        assert_eq!(value["type"], "total");
        assert_eq!(value["middle_size"], 1.5);
    }

    #[test]
    fn test_scan_request_flattens_params() {
        let req: ScanRequest =
            serde_json::from_str(r#"{"games": [], "min_ev": 2.5, "no_vig": true}"#).unwrap();
        assert!(req.games.is_empty());
        assert_eq!(req.params.min_ev, Some(2.5));
        assert_eq!(req.params.no_vig, Some(true));
        assert_eq!(req.params.min_middle, None);
    }
}
