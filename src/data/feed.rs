//! Odds feed records (The Odds API v4 event shape)
//!
//! The feed body is decoded into loosely typed DTOs first so that a bad price
//! or point only costs the outcome it belongs to. `into_listing` then
//! validates each record into the typed model.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::error::RecordError;
use crate::models::{BookmakerListing, GameListing, Market, MarketKind, OddsQuote};

/// One event as delivered by the odds feed
///
/// Every field decodes leniently: a value of the wrong type becomes the
/// field's default, and a bad element of a list drops only that element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub sport_key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub commence_time: String,
    #[serde(default, deserialize_with = "lenient")]
    pub home_team: String,
    #[serde(default, deserialize_with = "lenient")]
    pub away_team: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub bookmakers: Vec<FeedBookmaker>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedBookmaker {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub markets: Vec<FeedMarket>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedMarket {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub outcomes: Vec<FeedOutcome>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedOutcome {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<Value>,
}

/// Decode a field, falling back to its default when the JSON type is wrong
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a list element by element, dropping the elements that fail
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("Ignoring non-list feed field: {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Skipping malformed feed entry: {}", e);
                None
            }
        })
        .collect())
}

impl FeedOutcome {
    /// Validate into a quote for the given bookmaker
    pub fn to_quote(&self, bookmaker: &str) -> Result<OddsQuote, RecordError> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(RecordError::MissingField("name"))?;
        let price = self
            .price
            .as_ref()
            .ok_or(RecordError::MissingField("price"))?;
        let price = parse_american_odds(price)?;

        let point = match &self.point {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_number("point", value)?),
        };

        OddsQuote::new(bookmaker, name, price, point)
    }
}

impl FeedEvent {
    /// Validate into a typed listing
    ///
    /// Bad outcomes, markets without a key and bookmakers without a key are
    /// skipped with a warning. Only a team error rejects the whole event.
    pub fn into_listing(self) -> Result<GameListing, RecordError> {
        let commence_time = parse_commence_time(&self.commence_time);
        let label = format!("{} vs {}", self.home_team, self.away_team);

        let mut bookmakers = Vec::with_capacity(self.bookmakers.len());
        for book in self.bookmakers {
            if book.key.is_empty() {
                warn!("Skipping bookmaker without key in {}", label);
                continue;
            }

            let mut markets = Vec::with_capacity(book.markets.len());
            for market in book.markets {
                if market.key.is_empty() {
                    warn!("Skipping market without key from {} in {}", book.key, label);
                    continue;
                }

                let mut quotes = Vec::with_capacity(market.outcomes.len());
                for outcome in &market.outcomes {
                    match outcome.to_quote(&book.key) {
                        Ok(quote) => quotes.push(quote),
                        Err(e) => warn!(
                            "Skipping {} outcome {:?} from {} in {}: {}",
                            market.key, outcome.name, book.key, label, e
                        ),
                    }
                }

                markets.push(Market {
                    key: MarketKind::from(market.key),
                    quotes,
                });
            }

            let title = if book.title.is_empty() {
                book.key.clone()
            } else {
                book.title
            };
            bookmakers.push(BookmakerListing {
                key: book.key,
                title,
                markets,
            });
        }

        GameListing::new(
            self.id,
            self.sport_key,
            commence_time,
            self.home_team,
            self.away_team,
            bookmakers,
        )
    }
}

/// Convert a batch of feed events, skipping events that fail validation
pub fn to_listings(events: Vec<FeedEvent>) -> Vec<GameListing> {
    events
        .into_iter()
        .filter_map(|event| {
            let id = event.id.clone();
            match event.into_listing() {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!("Skipping event {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

/// Decode a JSON array of feed events
///
/// Array elements that are not event objects are skipped individually.
pub fn parse_events(json: &str) -> Result<Vec<FeedEvent>, serde_json::Error> {
    let raw: Vec<Value> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<FeedEvent>(value) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Skipping malformed event at index {}: {}", i, e);
                None
            }
        })
        .collect())
}

/// League names with a known feed key
pub const SPORTS: [&str; 5] = ["NBA", "NFL", "NCAAF", "MLB", "NHL"];

/// Map a sport name to its feed key
///
/// Known league names are matched case-insensitively; anything else is
/// taken to be a feed key already and passed through lower-cased.
pub fn sport_key(sport: &str) -> String {
    match sport.to_ascii_uppercase().as_str() {
        "NBA" => "basketball_nba".to_string(),
        "NFL" => "americanfootball_nfl".to_string(),
        "NCAAF" => "americanfootball_ncaaf".to_string(),
        "MLB" => "baseball_mlb".to_string(),
        "NHL" => "icehockey_nhl".to_string(),
        _ => sport.to_lowercase(),
    }
}

/// Numeric field that may arrive as a JSON number or a numeric string
fn parse_number(field: &'static str, value: &Value) -> Result<f64, RecordError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('+').parse::<f64>().ok(),
        _ => None,
    };

    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| RecordError::NonNumeric {
            field,
            value: value.to_string(),
        })
}

/// American odds must be a non-zero whole number
fn parse_american_odds(value: &Value) -> Result<i32, RecordError> {
    let price = parse_number("price", value)?;

    if price.fract() != 0.0 || price.abs() > i32::MAX as f64 {
        return Err(RecordError::FractionalOdds(price));
    }
    if price == 0.0 {
        return Err(RecordError::ZeroOdds);
    }

    Ok(price as i32)
}

fn parse_commence_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sport_keys() {
        assert_eq!(sport_key("NBA"), "basketball_nba");
        assert_eq!(sport_key("nfl"), "americanfootball_nfl");
        assert_eq!(sport_key("NCAAF"), "americanfootball_ncaaf");
        assert_eq!(sport_key("MLB"), "baseball_mlb");
        assert_eq!(sport_key("Nhl"), "icehockey_nhl");
    }

    #[test]
    fn test_unknown_sport_passes_through() {
        assert_eq!(sport_key("Soccer_EPL"), "soccer_epl");
        assert_eq!(sport_key("basketball_nba"), "basketball_nba");
        for sport in SPORTS {
            assert_ne!(sport_key(sport), sport.to_lowercase());
        }
    }

    fn outcome(name: &str, price: Value, point: Option<Value>) -> FeedOutcome {
        FeedOutcome {
            name: Some(name.to_string()),
            price: Some(price),
            point,
        }
    }

    #[test]
    fn test_outcome_to_quote() {
        let quote = outcome("Over", json!(-110), Some(json!(221.5)))
            .to_quote("draftkings")
            .unwrap();
        assert_eq!(quote.bookmaker, "draftkings");
        assert_eq!(quote.price, -110);
        assert_eq!(quote.point, Some(221.5));
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let quote = outcome("Heat", json!("+145"), None).to_quote("fanduel").unwrap();
        assert_eq!(quote.price, 145);
        let quote = outcome("Heat", json!(-120.0), Some(json!("-3.5")))
            .to_quote("fanduel")
            .unwrap();
        assert_eq!(quote.price, -120);
        assert_eq!(quote.point, Some(-3.5));
    }

    #[test]
    fn test_malformed_outcomes_rejected() {
        let err = outcome("Heat", json!("abc"), None).to_quote("fanduel");
        assert!(matches!(err, Err(RecordError::NonNumeric { field: "price", .. })));

        let err = outcome("Heat", json!(1.85), None).to_quote("fanduel");
        assert_eq!(err, Err(RecordError::FractionalOdds(1.85)));

        let err = outcome("Heat", json!(0), None).to_quote("fanduel");
        assert_eq!(err, Err(RecordError::ZeroOdds));

        let err = outcome("Heat", json!(150), Some(json!({"x": 1}))).to_quote("fanduel");
        assert!(matches!(err, Err(RecordError::NonNumeric { field: "point", .. })));

        let missing = FeedOutcome {
            name: Some("Heat".to_string()),
            price: None,
            point: None,
        };
        assert_eq!(
            missing.to_quote("fanduel"),
            Err(RecordError::MissingField("price"))
        );
    }

    #[test]
    fn test_event_skips_bad_outcome_only() {
        let json = r#"[{
            "id": "evt1",
            "sport_key": "basketball_nba",
            "commence_time": "2024-01-15T00:10:00Z",
            "home_team": "Boston Celtics",
            "away_team": "Miami Heat",
            "bookmakers": [{
                "key": "draftkings",
                "title": "DraftKings",
                "markets": [{
                    "key": "h2h",
                    "outcomes": [
                        {"name": "Boston Celtics", "price": -180},
                        {"name": "Miami Heat", "price": "n/a"}
                    ]
                }]
            }]
        }]"#;

        let listings = to_listings(parse_events(json).unwrap());
        assert_eq!(listings.len(), 1);

        let game = &listings[0];
        assert_eq!(game.label(), "Boston Celtics vs Miami Heat");
        assert!(game.commence_time.is_some());
        assert_eq!(game.bookmakers[0].title, "DraftKings");
        assert_eq!(game.bookmakers[0].markets[0].key, MarketKind::H2h);
        assert_eq!(game.bookmakers[0].markets[0].quotes.len(), 1);
    }

    #[test]
    fn test_wrongly_typed_outcome_costs_only_itself() {
        let mut outcomes: Vec<Value> = (0..9)
            .map(|i| json!({"name": format!("Team {}", i), "price": 100 + i}))
            .collect();
        outcomes.push(json!({"name": 42, "price": 150}));
        outcomes.push(json!(7));

        let json = json!([{
            "id": "evt1",
            "home_team": "A",
            "away_team": "B",
            "bookmakers": [{
                "key": "fanduel",
                "title": "FanDuel",
                "markets": [{"key": "h2h", "outcomes": outcomes}]
            }]
        }])
        .to_string();

        let listings = to_listings(parse_events(&json).unwrap());
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].bookmakers[0].markets[0].quotes.len(), 9);
    }

    #[test]
    fn test_null_bookmaker_fields_keep_the_game() {
        let json = r#"[{
            "id": "evt2",
            "home_team": "A",
            "away_team": "B",
            "bookmakers": [
                {"key": "betmgm", "title": null, "markets": null},
                {"key": 5, "title": "Broken", "markets": []},
                {
                    "key": "draftkings",
                    "title": "DraftKings",
                    "markets": [{
                        "key": "h2h",
                        "outcomes": [
                            {"name": "A", "price": -120},
                            {"name": "B", "price": 100}
                        ]
                    }]
                }
            ]
        }]"#;

        let listings = to_listings(parse_events(json).unwrap());
        assert_eq!(listings.len(), 1);

        let books = &listings[0].bookmakers;
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].key, "betmgm");
        assert_eq!(books[0].title, "betmgm");
        assert!(books[0].markets.is_empty());
        assert_eq!(books[1].title, "DraftKings");
        assert_eq!(books[1].markets[0].quotes.len(), 2);
    }

    #[test]
    fn test_event_with_bad_teams_skipped() {
        let events = vec![
            FeedEvent {
                id: "bad".to_string(),
                home_team: "Heat".to_string(),
                away_team: "Heat".to_string(),
                ..Default::default()
            },
            FeedEvent {
                id: "good".to_string(),
                home_team: "Celtics".to_string(),
                away_team: "Heat".to_string(),
                ..Default::default()
            },
        ];
        let listings = to_listings(events);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "good");
    }

    #[test]
    fn test_parse_events_skips_non_objects() {
        let json = r#"[42, {"id": "e1", "home_team": "A", "away_team": "B"}]"#;
        let events = parse_events(json).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "e1");
    }

    #[test]
    fn test_unparsable_commence_time_kept_as_none() {
        let event = FeedEvent {
            commence_time: "tonight".to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            ..Default::default()
        };
        assert!(event.into_listing().unwrap().commence_time.is_none());
    }
}
