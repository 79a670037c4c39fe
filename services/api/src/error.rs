use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Every failure a handler can report to the client.
///
/// The `Missing*` variants are the missing-field family (400); `Internal`
/// covers anything unexpected (500). None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Please provide name and age")]
    MissingCredentials,
    #[error("No text provided")]
    MissingText,
    #[error("No image data provided")]
    MissingImage,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials | ApiError::MissingText | ApiError::MissingImage => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Login failures keep the `{status, message}` shape the login form reads.
        let body = match &self {
            ApiError::MissingCredentials => {
                json!({ "status": "error", "message": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingCredentials.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::MissingText.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::MissingText.to_string(), "No text provided");
        assert_eq!(ApiError::MissingImage.to_string(), "No image data provided");
        assert_eq!(
            ApiError::MissingCredentials.to_string(),
            "Please provide name and age"
        );
        assert_eq!(
            ApiError::Internal("model offline".into()).to_string(),
            "model offline"
        );
    }
}
