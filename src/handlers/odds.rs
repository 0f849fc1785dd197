use actix_web::{web, HttpResponse};

use sportsedge::core::{decimal_odds, expected_value, format_odds, implied_probability, payout};
use sportsedge::error::{validate_odds, validate_probability, validate_stake, AppError};
use sportsedge::models::{ConvertRequest, ConvertResponse, EvRequest, EvResponse};

/// Convert American odds to probability, decimal odds and payout
pub async fn convert_odds(req: web::Json<ConvertRequest>) -> Result<HttpResponse, AppError> {
    let odds = validate_odds(req.odds)?;
    let stake = validate_stake(req.stake)?;

    let response = ConvertResponse {
        odds,
        display: format_odds(odds),
        implied_probability: implied_probability(odds)?,
        decimal_odds: decimal_odds(odds)?,
        stake,
        payout: payout(odds, stake)?,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Expected value of a bet; without a probability the price is taken at face value
pub async fn calculate_ev(req: web::Json<EvRequest>) -> Result<HttpResponse, AppError> {
    let odds = validate_odds(req.odds)?;
    let stake = validate_stake(req.stake)?;
    let probability = match req.probability {
        Some(p) => validate_probability(p)?,
        None => implied_probability(odds)?,
    };

    let ev = expected_value(odds, probability, stake)?;
    let response = EvResponse {
        odds,
        probability,
        stake,
        expected_value: ev,
        is_value_bet: ev > 0.0,
    };

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn test_convert_positive_odds() {
        let app =
            test::init_service(App::new().route("/odds/convert", web::post().to(convert_odds)))
                .await;

        let req = test::TestRequest::post()
            .uri("/odds/convert")
            .set_json(json!({"odds": 150}))
            .to_request();
        let resp: ConvertResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.display, "+150");
        assert_eq!(resp.implied_probability, 0.4);
        assert_eq!(resp.decimal_odds, 2.5);
        assert_eq!(resp.stake, 100.0);
        assert_eq!(resp.payout, 150.0);
    }

    #[actix_web::test]
    async fn test_convert_zero_odds_is_bad_request() {
        let app =
            test::init_service(App::new().route("/odds/convert", web::post().to(convert_odds)))
                .await;

        let req = test::TestRequest::post()
            .uri("/odds/convert")
            .set_json(json!({"odds": 0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_ev_with_probability() {
        let app = test::init_service(App::new().route("/ev", web::post().to(calculate_ev))).await;

        let req = test::TestRequest::post()
            .uri("/ev")
            .set_json(json!({"odds": 150, "probability": 0.6, "stake": 100.0}))
            .to_request();
        let resp: EvResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.expected_value, 50.0);
        assert!(resp.is_value_bet);
    }

    #[actix_web::test]
    async fn test_ev_defaults_to_implied_probability() {
        let app = test::init_service(App::new().route("/ev", web::post().to(calculate_ev))).await;

        let req = test::TestRequest::post()
            .uri("/ev")
            .set_json(json!({"odds": 100}))
            .to_request();
        let resp: EvResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.probability, 0.5);
        assert_eq!(resp.expected_value, 0.0);
        assert!(!resp.is_value_bet);
    }

    #[actix_web::test]
    async fn test_ev_rejects_bad_probability() {
        let app = test::init_service(App::new().route("/ev", web::post().to(calculate_ev))).await;

        let req = test::TestRequest::post()
            .uri("/ev")
            .set_json(json!({"odds": -110, "probability": 1.5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
