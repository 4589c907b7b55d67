use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::DomainError;

/// Message shown for database-level conflicts; details stay in the logs.
const CONSTRAINT_MESSAGE: &str = "This action cannot be completed";

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Constraint(_) | Self::RequestClosed(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Self::Constraint(e) => {
                tracing::warn!(kind = e.kind(), "constraint violation: {}", e);
                CONSTRAINT_MESSAGE.to_string()
            }
            Self::Database(e) => {
                tracing::error!(error = %e, kind = "DATABASE", "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "kind": self.kind(),
            "error": message,
        });
        (status, axum::Json(body)).into_response()
    }
}
