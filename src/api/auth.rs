use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use serde_json::json;

/// Header carrying the authenticated user's id, set by the auth proxy.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// The user on whose behalf the request is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "kind": "UNAUTHENTICATED", "error": "Missing X-User-Id header" })),
            ))?;

        raw.trim()
            .parse::<i32>()
            .map(ActingUser)
            .map_err(|_| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "kind": "UNAUTHENTICATED", "error": "Invalid X-User-Id header" })),
                )
            })
    }
}
