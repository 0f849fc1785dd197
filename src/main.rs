use actix_web::{middleware, web, App, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod handlers;

use handlers::{health, odds, scan};

#[cfg(feature = "fetch")]
use sportsedge::fetch::{FeedConfig, OddsApiClient};

/// Application state shared across handlers
pub struct AppState {
    pub odds_dir: PathBuf,
    #[cfg(feature = "fetch")]
    pub feed: Option<OddsApiClient>,
}

impl AppState {
    /// State without a live feed
    pub fn new(odds_dir: PathBuf) -> Self {
        Self {
            odds_dir,
            #[cfg(feature = "fetch")]
            feed: None,
        }
    }
}

#[cfg(feature = "fetch")]
fn live_feed() -> Option<OddsApiClient> {
    let config = FeedConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!("THE_ODDS_API_KEY not set, serving snapshots and sample data only");
        return None;
    }

    match OddsApiClient::new(config) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("Failed to create odds client: {}", e);
            None
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    let odds_dir = std::env::var("ODDS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/odds"));
    info!("Reading odds snapshots from {:?}", odds_dir);

    #[allow(unused_mut)]
    let mut state = AppState::new(odds_dir);
    #[cfg(feature = "fetch")]
    {
        state.feed = live_feed();
    }
    let app_state = Arc::new(state);

    info!("Starting SportsEdge API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/odds/convert", web::post().to(odds::convert_odds))
            .route("/ev", web::post().to(odds::calculate_ev))
            .route("/scan", web::post().to(scan::scan_games))
            .route("/scan/{sport}", web::get().to(scan::scan_sport))
    })
    .bind(&addr)?
    .run()
    .await
}
