use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::AppState;
use sportsedge::data::list_snapshots;
use sportsedge::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        snapshots: list_snapshots(&state.odds_dir).len(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use chrono::Utc;
    use sportsedge::data::{sample_events, save_snapshot};

    #[actix_web::test]
    async fn test_health_counts_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        save_snapshot(dir.path(), "basketball_nba", &sample_events("basketball_nba"), Utc::now())
            .unwrap();

        let state = Arc::new(AppState::new(dir.path().to_path_buf()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/health", web::get().to(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.snapshots, 1);
    }
}
