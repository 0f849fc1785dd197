//! Two-way arbitrage detection
//!
//! Takes the best price for each side of a game across bookmakers and checks
//! whether backing both sides at those prices locks in a profit.

use crate::models::{ArbitrageOpportunity, GameListing};

/// Side of a two-way market
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// Map an outcome name to a side of the game, if it names one
pub fn side_of(game: &GameListing, outcome: &str) -> Option<Side> {
    if outcome.eq_ignore_ascii_case(&game.home_team) || outcome.eq_ignore_ascii_case("home") {
        Some(Side::Home)
    } else if outcome.eq_ignore_ascii_case(&game.away_team) || outcome.eq_ignore_ascii_case("away")
    {
        Some(Side::Away)
    } else {
        None
    }
}

/// Best (highest) odds per side from each bookmaker's first market
pub fn best_odds(game: &GameListing) -> (Option<i32>, Option<i32>) {
    let mut best_home: Option<i32> = None;
    let mut best_away: Option<i32> = None;

    for book in &game.bookmakers {
        let Some(market) = book.markets.first() else {
            continue;
        };

        for quote in &market.quotes {
            let best = match side_of(game, &quote.outcome) {
                Some(Side::Home) => &mut best_home,
                Some(Side::Away) => &mut best_away,
                None => continue,
            };
            if best.map_or(true, |b| quote.price > b) {
                *best = Some(quote.price);
            }
        }
    }

    (best_home, best_away)
}

/// Unrounded break-even probability of a positive American price
fn positive_price_probability(odds: i32) -> f64 {
    100.0 / (odds as f64 + 100.0)
}

/// Check one game for a two-way arbitrage
///
/// Only prices where both best sides are positive are evaluated. A game with
/// one positive and one negative best price is never reported, even when it
/// would be profitable.
pub fn find_arbitrage(game: &GameListing) -> Option<ArbitrageOpportunity> {
    if game.bookmakers.len() < 2 {
        return None;
    }

    let (Some(best_home), Some(best_away)) = best_odds(game) else {
        return None;
    };
    if best_home <= 0 || best_away <= 0 {
        return None;
    }

    let prob_sum = positive_price_probability(best_home) + positive_price_probability(best_away);
    if prob_sum >= 1.0 {
        return None;
    }

    Some(ArbitrageOpportunity {
        game: game.label(),
        game_id: game.id.clone(),
        best_home,
        best_away,
        profit_pct: (1.0 - prob_sum) * 100.0,
    })
}

/// Scan a batch of games for arbitrage, in input order
pub fn identify_arbitrage(games: &[GameListing]) -> Vec<ArbitrageOpportunity> {
    games.iter().filter_map(find_arbitrage).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookmakerListing, Market, MarketKind, OddsQuote};

    fn book(key: &str, home: i32, away: i32) -> BookmakerListing {
        BookmakerListing {
            key: key.to_string(),
            title: key.to_string(),
            markets: vec![Market {
                key: MarketKind::H2h,
                quotes: vec![
                    OddsQuote::new(key, "Celtics", home, None).unwrap(),
                    OddsQuote::new(key, "Heat", away, None).unwrap(),
                ],
            }],
        }
    }

    fn game(books: Vec<BookmakerListing>) -> GameListing {
        GameListing::new("g1", "basketball_nba", None, "Celtics", "Heat", books).unwrap()
    }

    #[test]
    fn test_both_positive_prices_are_arbitrage() {
        let g = game(vec![book("draftkings", 120, -140), book("fanduel", -150, 120)]);
        let arb = find_arbitrage(&g).unwrap();

        assert_eq!(arb.best_home, 120);
        assert_eq!(arb.best_away, 120);
        // 1 - 2 * 100/220
        assert!((arb.profit_pct - 9.0909).abs() < 0.001);
        assert!(arb.profit_pct > 0.0);
        assert_eq!(arb.game, "Celtics vs Heat");
    }

    #[test]
    fn test_mixed_sign_prices_not_reported() {
        let g = game(vec![book("draftkings", -150, 130), book("fanduel", -160, 125)]);
        assert!(find_arbitrage(&g).is_none());
    }

    #[test]
    fn test_even_money_is_not_arbitrage() {
        let g = game(vec![book("draftkings", 100, -120), book("fanduel", -120, 100)]);
        assert!(find_arbitrage(&g).is_none());
    }

    #[test]
    fn test_single_bookmaker_never_arbitrage() {
        let g = game(vec![book("draftkings", 150, 150)]);
        assert!(find_arbitrage(&g).is_none());
    }

    #[test]
    fn test_best_odds_uses_first_market_only() {
        let mut dk = book("draftkings", -110, -110);
        dk.markets.push(Market {
            key: MarketKind::Spreads,
            quotes: vec![OddsQuote::new("draftkings", "Celtics", 500, Some(-3.5)).unwrap()],
        });
        let g = game(vec![dk, book("fanduel", -105, -115)]);

        assert_eq!(best_odds(&g), (Some(-105), Some(-110)));
    }

    #[test]
    fn test_side_mapping() {
        let g = game(vec![]);
        assert_eq!(side_of(&g, "celtics"), Some(Side::Home));
        assert_eq!(side_of(&g, "Home"), Some(Side::Home));
        assert_eq!(side_of(&g, "AWAY"), Some(Side::Away));
        assert_eq!(side_of(&g, "Draw"), None);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let games = vec![
            game(vec![book("a", 130, -150), book("b", -140, 125)]),
            game(vec![book("a", -110, -110), book("b", -110, -110)]),
        ];
        let first = identify_arbitrage(&games);
        let second = identify_arbitrage(&games);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }
}
