use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use shareit_core::DomainError;
use shareit_infra::StoreError;

/// Everything a handler can fail with; mapped to status + `{"error": ..}` once.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Body or path the extractor could not decode.
    #[error("{0}")]
    Malformed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        } else {
            tracing::warn!(%status, error = %message, "request rejected");
        }
        json_error(status, message)
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_their_status() {
        assert_eq!(ApiError::from(DomainError::not_found("x")).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(DomainError::validation("x")).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(DomainError::invalid_argument("Unknown state: X")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(DomainError::conflict("x")).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn store_errors_map_to_their_status() {
        assert_eq!(
            ApiError::from(StoreError::Conflict("dup".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Backend("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn message_is_passed_through() {
        let err = ApiError::from(DomainError::invalid_argument("Unknown state: NOPE"));
        assert_eq!(err.to_string(), "Unknown state: NOPE");
    }
}
