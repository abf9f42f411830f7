use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use shareit_core::DomainError;

/// Failures produced by the gateway itself; upstream answers are relayed, not wrapped.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("{0}")]
    Malformed(String),

    #[error("server unavailable: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Invalid(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
            GatewayError::Invalid(DomainError::Conflict(_)) => StatusCode::CONFLICT,
            GatewayError::Invalid(_) => StatusCode::BAD_REQUEST,
            GatewayError::Malformed(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::Malformed(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "forwarding failed");
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
    fn validation_failures_are_bad_requests() {
        assert_eq!(
            GatewayError::from(DomainError::validation("text must not be blank")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(DomainError::invalid_argument("Unknown state: NOPE")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GatewayError::Malformed("bad json".into()).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_state_message_is_kept_verbatim() {
        let err = GatewayError::from(DomainError::invalid_argument("Unknown state: NOPE"));
        assert_eq!(err.to_string(), "Unknown state: NOPE");
    }
}
