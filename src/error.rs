use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Error decoding response: {0}")]
    DecodeError(String),

    #[error("Error: {0}")]
    BackendError(String),

    #[error("Failed to copy: {0}")]
    ClipboardError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Message without the category prefix, as forwarded to API callers.
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::FetchError(msg)
            | AppError::DecodeError(msg)
            | AppError::BackendError(msg)
            | AppError::ClipboardError(msg)
            | AppError::ConfigError(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::FetchError(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::DecodeError(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::BackendError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::ClipboardError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::DecodeError(err.to_string())
        } else {
            AppError::FetchError(err.to_string())
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ClipboardError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_category_prefix() {
        let err = AppError::BackendError("bad url".to_string());
        assert_eq!(err.to_string(), "Error: bad url");
        assert_eq!(err.message(), "bad url");

        let err = AppError::FetchError("connection refused".to_string());
        assert_eq!(err.to_string(), "Failed to fetch data: connection refused");
    }

    #[test]
    fn fetch_errors_map_to_bad_gateway() {
        let response = AppError::FetchError("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::Validation("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
