use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use super::auth::ActingUser;
use crate::domain::DomainError;
use crate::models::user::UserDto;
use crate::services::catalog_service;
use crate::services::user_service::{self, NewUser};

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created"),
        (status = 409, description = "Username taken"),
        (status = 422, description = "Blank username")
    )
)]
pub async fn create_user(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<UserDto>), DomainError> {
    let user = user_service::create_user(&db, payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let summary = catalog_service::user_summary(&db, id).await?;
    Ok(Json(json!(summary)))
}

/// Delete the acting user together with everything hanging off the account
pub async fn delete_me(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
) -> Result<StatusCode, DomainError> {
    user_service::delete_user(&db, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
