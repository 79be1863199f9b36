use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use site_forge_core::WebsiteError;

/// API error type rendered as a JSON error body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("too many requests")]
    TooManyRequests,

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("bad gateway: {0}")]
    BadGateway(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<WebsiteError> for ApiError {
    fn from(err: WebsiteError) -> Self {
        match err {
            WebsiteError::InvalidIdentifier(_)
            | WebsiteError::InvalidPatch(_)
            | WebsiteError::MissingFields(_) => ApiError::BadRequest(err.to_string()),
            WebsiteError::NotFoundOrUnauthorized => {
                ApiError::NotFound("Website not found or unauthorized".to_string())
            }
            WebsiteError::GenerationFailure(_) => ApiError::BadGateway(err.to_string()),
            WebsiteError::StoreFailure(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "tooManyRequests",
                "Rate limit exceeded".to_string(),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payloadTooLarge",
                "Request body is too large".to_string(),
            ),
            ApiError::BadGateway(msg) => {
                tracing::warn!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "badGateway",
                    "Content generation failed".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
