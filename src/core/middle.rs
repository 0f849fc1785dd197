//! Middle detection on spread and total lines
//!
//! Every (bookmaker, outcome) quote in a spreads or totals market is paired
//! with every other one. A pair whose points differ by at least the threshold
//! leaves a range of final scores where bets on both could win.

use crate::core::error::DomainError;
use crate::models::{GameListing, MiddleKind, MiddleOpportunity};

/// Default minimum line gap, in points
pub const DEFAULT_MIN_MIDDLE: f64 = 1.0;

struct LineQuote<'a> {
    bookmaker: &'a str,
    outcome: &'a str,
    point: f64,
    price: i32,
}

/// Quotes with a point for one market kind, keyed by (bookmaker, outcome)
///
/// Keys keep first-seen order; a repeated key takes the later value.
fn collect_lines(game: &GameListing, kind: MiddleKind) -> Vec<LineQuote<'_>> {
    let market_key = kind.market();
    let mut lines: Vec<LineQuote<'_>> = Vec::new();

    for book in &game.bookmakers {
        for market in book.markets.iter().filter(|m| m.key == market_key) {
            for quote in &market.quotes {
                let Some(point) = quote.point else {
                    continue;
                };
                let line = LineQuote {
                    bookmaker: &book.key,
                    outcome: &quote.outcome,
                    point,
                    price: quote.price,
                };

                match lines
                    .iter_mut()
                    .find(|l| l.bookmaker == line.bookmaker && l.outcome == line.outcome)
                {
                    Some(existing) => *existing = line,
                    None => lines.push(line),
                }
            }
        }
    }

    lines
}

/// The gap must be strictly positive, or equal lines would pair both ways
fn validate_threshold(min_middle: f64) -> Result<f64, DomainError> {
    if !min_middle.is_finite() || min_middle <= 0.0 {
        return Err(DomainError::InvalidThreshold(min_middle));
    }
    Ok(min_middle)
}

/// Middles for one game and one market kind
///
/// Pairs are ordered, so a qualifying pair is reported once with `book1` on
/// the higher line and a positive gap.
pub fn find_middles_in(
    game: &GameListing,
    kind: MiddleKind,
    min_middle: f64,
) -> Result<Vec<MiddleOpportunity>, DomainError> {
    let min_middle = validate_threshold(min_middle)?;
    let lines = collect_lines(game, kind);
    let label = game.label();
    let mut middles = Vec::new();

    for (i, a) in lines.iter().enumerate() {
        for (j, b) in lines.iter().enumerate() {
            if i == j {
                continue;
            }

            let middle_size = a.point - b.point;
            if middle_size >= min_middle {
                middles.push(MiddleOpportunity {
                    game: label.clone(),
                    game_id: game.id.clone(),
                    kind,
                    middle_size,
                    book1: a.bookmaker.to_string(),
                    book2: b.bookmaker.to_string(),
                    outcome1: a.outcome.to_string(),
                    outcome2: b.outcome.to_string(),
                    line1: a.point,
                    line2: b.point,
                    odds1: a.price,
                    odds2: b.price,
                });
            }
        }
    }

    Ok(middles)
}

/// Spread middles followed by total middles for one game
pub fn find_middles(
    game: &GameListing,
    min_middle: f64,
) -> Result<Vec<MiddleOpportunity>, DomainError> {
    let mut middles = find_middles_in(game, MiddleKind::Spread, min_middle)?;
    middles.extend(find_middles_in(game, MiddleKind::Total, min_middle)?);
    Ok(middles)
}

/// Scan a batch of games for middles, in input order
pub fn identify_middles(
    games: &[GameListing],
    min_middle: f64,
) -> Result<Vec<MiddleOpportunity>, DomainError> {
    let mut middles = Vec::new();
    for game in games {
        middles.extend(find_middles(game, min_middle)?);
    }
    Ok(middles)
}
