//! Value bet scanning
//!
//! Walks every quote of every market, prices it against a win probability
//! model and keeps the ones whose expected value clears a minimum.

use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::core::ev::expected_value;
use crate::core::odds::{implied_probability, round_to};
use crate::models::{GameListing, Market, OddsQuote, ValueBet};

/// Source of win probabilities for quotes
pub trait ProbabilityModel {
    /// Estimated probability that `quote` wins, or `None` when the model has
    /// no opinion on it
    fn probability(&self, game: &GameListing, market: &Market, quote: &OddsQuote) -> Option<f64>;

    fn name(&self) -> &'static str;
}

/// Takes each price at face value: the quote's own implied probability
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketImplied;

impl ProbabilityModel for MarketImplied {
    fn probability(&self, _game: &GameListing, _market: &Market, quote: &OddsQuote) -> Option<f64> {
        implied_probability(quote.price).ok()
    }

    fn name(&self) -> &'static str {
        "market-implied"
    }
}

/// Margin-free consensus across bookmakers
///
/// Each bookmaker's market is normalized so its implied probabilities sum to
/// one. The fair probability of an outcome is the mean of those normalized
/// values over every bookmaker quoting the same outcome at the same point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVigConsensus;

impl NoVigConsensus {
    fn normalized(market: &Market, quote: &OddsQuote) -> Option<f64> {
        if market.quotes.len() < 2 {
            return None;
        }

        let mut total = 0.0;
        let mut target = None;
        for q in &market.quotes {
            let p = implied_probability(q.price).ok()?;
            total += p;
            if q.outcome == quote.outcome && q.point == quote.point {
                target = Some(p);
            }
        }

        if total <= 0.0 {
            return None;
        }
        target.map(|p| p / total)
    }
}

impl ProbabilityModel for NoVigConsensus {
    fn probability(&self, game: &GameListing, market: &Market, quote: &OddsQuote) -> Option<f64> {
        let fair: Vec<f64> = game
            .bookmakers
            .iter()
            .flat_map(|book| book.markets.iter().filter(|m| m.key == market.key))
            .filter_map(|m| Self::normalized(m, quote))
            .collect();

        if fair.is_empty() {
            return None;
        }
        let mean = fair.iter().sum::<f64>() / fair.len() as f64;
        Some(round_to(mean, 3))
    }

    fn name(&self) -> &'static str {
        "no-vig-consensus"
    }
}

/// Scanner for positive expected value quotes
#[derive(Debug, Clone)]
pub struct ValueScanner {
    /// Minimum EV in dollars, exclusive
    pub min_ev: f64,
    /// Stake each quote is priced at
    pub stake: f64,
}

impl ValueScanner {
    pub fn new(min_ev: f64, stake: f64) -> Self {
        Self { min_ev, stake }
    }

    /// Price one quote; `None` when it is skipped
    fn evaluate(
        &self,
        game: &GameListing,
        bookmaker: &str,
        market: &Market,
        quote: &OddsQuote,
        model: &dyn ProbabilityModel,
    ) -> Option<ValueBet> {
        let implied = match implied_probability(quote.price) {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping {} {} from {}: {}", game.label(), quote.outcome, bookmaker, e);
                return None;
            }
        };
        let model_prob = model.probability(game, market, quote)?;

        let ev = match expected_value(quote.price, model_prob, self.stake) {
            Ok(ev) => ev,
            Err(e) => {
                warn!("Skipping {} {} from {}: {}", game.label(), quote.outcome, bookmaker, e);
                return None;
            }
        };

        Some(ValueBet {
            game: game.label(),
            bet_type: market.key.as_str().to_string(),
            outcome: quote.outcome.clone(),
            point: quote.point,
            odds: quote.price,
            bookmaker: bookmaker.to_string(),
            implied_prob: implied,
            model_prob,
            ev,
        })
    }

    /// Quotes with EV above `min_ev`, highest EV first
    ///
    /// Ties keep feed order.
    pub fn scan(&self, games: &[GameListing], model: &dyn ProbabilityModel) -> Vec<ValueBet> {
        let mut bets: Vec<ValueBet> = games
            .iter()
            .flat_map(|game| {
                game.quotes().filter_map(move |(book, market, quote)| {
                    self.evaluate(game, &book.title, market, quote, model)
                })
            })
            .filter(|bet| bet.ev > self.min_ev)
            .collect();

        bets.sort_by(|a, b| b.ev.partial_cmp(&a.ev).unwrap_or(Ordering::Equal));
        debug!(
            "Value scan ({}) over {} games found {} bets",
            model.name(),
            games.len(),
            bets.len()
        );
        bets
    }
}

impl Default for ValueScanner {
    fn default() -> Self {
        Self::new(5.0, 100.0)
    }
}
