use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream authentication failed: {0}")]
    UpstreamAuth(String),

    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),

    #[error("Upstream rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

impl AppError {
    /// Maps a non-2xx upstream response to the matching error variant
    pub fn from_upstream_status(provider: &str, status: reqwest::StatusCode, body: String) -> Self {
        let detail = format!("{} returned status {}: {}", provider, status, body);
        match status.as_u16() {
            401 | 403 => AppError::UpstreamAuth(detail),
            404 => AppError::NotFound(detail),
            408 | 504 => AppError::UpstreamTimeout(detail),
            429 => AppError::RateLimited(detail),
            502 | 503 => AppError::UpstreamUnavailable(detail),
            _ => AppError::ExternalApi(detail),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamAuth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::HttpClient(e) if e.is_timeout() => StatusCode::REQUEST_TIMEOUT,
            AppError::HttpClient(e) if e.is_connect() => StatusCode::SERVICE_UNAVAILABLE,
            AppError::HttpClient(_) | AppError::ExternalApi(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message and optional detail string
    fn message_and_details(&self) -> (String, Option<String>) {
        match self {
            AppError::InvalidInput(msg) => (msg.clone(), None),
            AppError::NotFound(msg) => ("Content not found".to_string(), Some(msg.clone())),
            AppError::UpstreamAuth(msg) => (
                "Upstream API authentication failed".to_string(),
                Some(msg.clone()),
            ),
            AppError::UpstreamTimeout(msg) => {
                ("Upstream API timed out".to_string(), Some(msg.clone()))
            }
            AppError::RateLimited(msg) => (
                "Upstream API rate limit exceeded".to_string(),
                Some(msg.clone()),
            ),
            AppError::UpstreamUnavailable(msg) => {
                ("Upstream API unavailable".to_string(), Some(msg.clone()))
            }
            AppError::HttpClient(e) => ("Upstream request failed".to_string(), Some(e.to_string())),
            AppError::ExternalApi(msg) => ("Upstream API error".to_string(), Some(msg.clone())),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, details) = self.message_and_details();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = match details {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode as UpstreamStatus;

    #[test]
    fn test_upstream_status_mapping() {
        let cases = [
            (UpstreamStatus::UNAUTHORIZED, StatusCode::UNAUTHORIZED),
            (UpstreamStatus::NOT_FOUND, StatusCode::NOT_FOUND),
            (UpstreamStatus::TOO_MANY_REQUESTS, StatusCode::TOO_MANY_REQUESTS),
            (UpstreamStatus::BAD_GATEWAY, StatusCode::SERVICE_UNAVAILABLE),
            (UpstreamStatus::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE),
            (UpstreamStatus::GATEWAY_TIMEOUT, StatusCode::REQUEST_TIMEOUT),
            (UpstreamStatus::INTERNAL_SERVER_ERROR, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (upstream, expected) in cases {
            let error = AppError::from_upstream_status("tmdb", upstream, String::new());
            assert_eq!(error.status_code(), expected, "upstream {}", upstream);
        }
    }

    #[test]
    fn test_local_error_statuses() {
        assert_eq!(
            AppError::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UpstreamTimeout("slow".into()).status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            AppError::UpstreamUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_invalid_input_has_no_details() {
        let (message, details) = AppError::InvalidInput("Query is required".into()).message_and_details();
        assert_eq!(message, "Query is required");
        assert!(details.is_none());
    }
}
