use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use super::auth::ActingUser;
use crate::domain::DomainError;
use crate::services::group_service::{self, GroupDetail, NewGroup};

pub async fn list_groups(State(db): State<DatabaseConnection>) -> Result<Json<Value>, DomainError> {
    let groups = group_service::list_groups(&db).await?;
    Ok(Json(json!({ "groups": groups })))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = NewGroup,
    responses(
        (status = 201, description = "Group created, creator is admin"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_group(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Json(payload): Json<NewGroup>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let group = group_service::create_group(&db, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "group": group }))))
}

pub async fn get_group(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
) -> Result<Json<GroupDetail>, DomainError> {
    Ok(Json(group_service::group_detail(&db, &slug).await?))
}

pub async fn join_group(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let membership = group_service::join_group(&db, user_id, &slug).await?;
    Ok((StatusCode::CREATED, Json(json!({ "membership": membership }))))
}

pub async fn leave_group(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, DomainError> {
    group_service::leave_group(&db, user_id, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
