use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use crate::AppState;
use sportsedge::analysis::{scan_listings, ScanConfig};
use sportsedge::data::{latest_snapshot, load_listings, sample_listings, sport_key, to_listings};
use sportsedge::error::{validate_games_count, validate_stake, AppError};
use sportsedge::models::{GameListing, ScanParams, ScanRequest};

/// Largest batch accepted by `POST /scan`
const MAX_SCAN_GAMES: usize = 500;

fn scan_config(params: &ScanParams) -> Result<ScanConfig, AppError> {
    let defaults = ScanConfig::default();
    Ok(ScanConfig {
        min_middle: params.min_middle.unwrap_or(defaults.min_middle),
        min_ev: params.min_ev.unwrap_or(defaults.min_ev),
        stake: validate_stake(params.stake.unwrap_or(defaults.stake))?,
        no_vig: params.no_vig.unwrap_or(defaults.no_vig),
    })
}

/// Scan posted feed events for arbitrage, middles and value bets
pub async fn scan_games(req: web::Json<ScanRequest>) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    validate_games_count(req.games.len(), MAX_SCAN_GAMES)?;
    let config = scan_config(&req.params)?;

    let games = to_listings(req.games);
    let report = scan_listings(&games, &config)?;

    Ok(HttpResponse::Ok().json(report))
}

/// Live listings when a feed is configured; any feed failure degrades to
/// the sample slate
#[cfg(feature = "fetch")]
async fn live_or_sample(state: &AppState, key: &str) -> Vec<GameListing> {
    match &state.feed {
        Some(feed) => feed.fetch_or_sample(key).await,
        None => sample_listings(key),
    }
}

#[cfg(not(feature = "fetch"))]
async fn live_or_sample(_state: &AppState, key: &str) -> Vec<GameListing> {
    sample_listings(key)
}

/// Scan the latest odds for a sport
///
/// Uses the newest snapshot in the odds directory, then the live feed when
/// configured, then the sample slate.
pub async fn scan_sport(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    query: web::Query<ScanParams>,
) -> Result<HttpResponse, AppError> {
    let key = sport_key(&path.into_inner());
    let config = scan_config(&query)?;

    let games = match latest_snapshot(&state.odds_dir, &key) {
        Some(snapshot) => {
            info!("Scanning snapshot {:?}", snapshot.path);
            load_listings(&snapshot.path)?
        }
        None => live_or_sample(&state, &key).await,
    };

    let report = scan_listings(&games, &config)?;
    Ok(HttpResponse::Ok().json(report))
}
