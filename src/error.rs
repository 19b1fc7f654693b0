use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid {kind} status: {value:?}")]
    InvalidStatus { kind: &'static str, value: String },

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream payload rejected: {0}")]
    UpstreamDataError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    /// Re-labels a snapshot validation failure as bad data from the upstream API.
    pub fn from_upstream(self) -> Self {
        match self {
            AppError::ValidationError(msg) => AppError::UpstreamDataError(msg),
            AppError::InvalidStatus { kind, value } => {
                AppError::UpstreamDataError(format!("unknown {kind} status {value:?}"))
            }
            other => other,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::ValidationError(_) | AppError::InvalidStatus { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamDataError(_)
            | AppError::ExternalApiError(_)
            | AppError::ReqwestError(_)
            | AppError::SerdeJsonError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::InvalidStatus { .. } => {
                log::warn!("{self}");
                ("INVALID_STATUS", self.to_string())
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                ("AUTH_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::UpstreamDataError(msg) => {
                log::error!("Upstream payload rejected: {msg}");
                ("UPSTREAM_DATA_ERROR", msg.clone())
            }
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                ("EXTERNAL_API_ERROR", msg.clone())
            }
            AppError::ReqwestError(err) => {
                log::error!("Upstream request failed: {err}");
                ("EXTERNAL_API_ERROR", "Upstream request failed".to_string())
            }
            AppError::SerdeJsonError(err) => {
                log::error!("Upstream JSON error: {err}");
                ("UPSTREAM_DATA_ERROR", "Malformed upstream response".to_string())
            }
            AppError::ConfigError(msg) => {
                log::error!("Config error: {msg}");
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
