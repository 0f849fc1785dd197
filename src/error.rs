use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::core::error::DomainError;
use crate::models::ErrorResponse;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid request data
    ValidationError(String),
    /// Odds feed failed or returned garbage
    UpstreamError(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::UpstreamError(msg) => ("upstream_error", msg.clone()),
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

#[cfg(feature = "fetch")]
impl From<crate::fetch::FetchError> for AppError {
    fn from(err: crate::fetch::FetchError) -> Self {
        AppError::UpstreamError(err.to_string())
    }
}

impl From<crate::data::LoadError> for AppError {
    fn from(err: crate::data::LoadError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// Validation functions
pub fn validate_odds(odds: i32) -> Result<i32, AppError> {
    if odds == 0 {
        return Err(AppError::ValidationError(
            "American odds must be non-zero".to_string(),
        ));
    }
    Ok(odds)
}

pub fn validate_probability(prob: f64) -> Result<f64, AppError> {
    if !(0.0..=1.0).contains(&prob) {
        return Err(AppError::ValidationError(format!(
            "Probability must be between 0 and 1, got {}",
            prob
        )));
    }
    Ok(prob)
}

pub fn validate_stake(stake: f64) -> Result<f64, AppError> {
    if !stake.is_finite() || stake < 0.0 {
        return Err(AppError::ValidationError(format!(
            "Stake must be a non-negative amount, got {}",
            stake
        )));
    }
    Ok(stake)
}

pub fn validate_games_count(count: usize, max: usize) -> Result<usize, AppError> {
    if count > max {
        return Err(AppError::ValidationError(format!(
            "At most {} games per scan, got {}",
            max, count
        )));
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_odds() {
        assert!(validate_odds(-110).is_ok());
        assert!(validate_odds(150).is_ok());
        assert!(validate_odds(0).is_err());
    }

    #[test]
    fn test_validate_probability_valid() {
        assert!(validate_probability(0.0).is_ok());
        assert!(validate_probability(0.5).is_ok());
        assert!(validate_probability(1.0).is_ok());
    }

    #[test]
    fn test_validate_probability_invalid() {
        assert!(validate_probability(-0.1).is_err());
        assert!(validate_probability(1.1).is_err());
        assert!(validate_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_stake() {
        assert!(validate_stake(0.0).is_ok());
        assert!(validate_stake(100.0).is_ok());
        assert!(validate_stake(-5.0).is_err());
        assert!(validate_stake(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_games_count() {
        assert!(validate_games_count(10, 500).is_ok());
        assert!(validate_games_count(501, 500).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::ValidationError("test error".to_string());
        assert!(err.to_string().contains("Validation error"));
    }

    #[test]
    fn test_domain_error_is_validation() {
        let err: AppError = DomainError::ZeroOdds.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UpstreamError("".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::InternalError("".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
