use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::auth::ActingUser;
use crate::domain::{Decision, DomainError};
use crate::models::loan_request::LoanRequestDto;
use crate::services::request_service::{self, RequestRole};

#[derive(Deserialize)]
pub struct ListRequestsQuery {
    pub role: Option<RequestRole>,
}

pub async fn list_requests(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Value>, DomainError> {
    let role = query.role.unwrap_or(RequestRole::Owner);
    let buckets = request_service::list_requests(&db, user_id, role).await?;
    Ok(Json(json!(buckets)))
}

pub async fn pending_count(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
) -> Result<Json<Value>, DomainError> {
    let count = request_service::pending_requests_count(&db, user_id).await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn get_request(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i32>,
) -> Result<Json<LoanRequestDto>, DomainError> {
    Ok(Json(request_service::get_request(&db, id, user_id).await?))
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateLoanRequestBody {
    pub owner_id: i32,
    pub book_id: i32,
}

pub async fn create_request(
    State(db): State<DatabaseConnection>,
    ActingUser(requester_id): ActingUser,
    Json(payload): Json<CreateLoanRequestBody>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let result =
        request_service::create_request(&db, requester_id, payload.owner_id, payload.book_id)
            .await?;

    let status = if result.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let request = LoanRequestDto::new(result.into_inner(), None);
    Ok((status, Json(json!({ "request": request }))))
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct DecisionBody {
    pub approve: bool,
    /// One of the fixed reject reasons; required when `approve` is false
    pub reason: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}/decision",
    request_body = DecisionBody,
    params(("id" = i32, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request decided"),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Request already closed"),
        (status = 422, description = "Missing or unknown reject reason")
    )
)]
pub async fn decide_request(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i32>,
    Json(payload): Json<DecisionBody>,
) -> Result<Json<Value>, DomainError> {
    let decision = Decision::parse(payload.approve, payload.reason.as_deref())?;
    let request = request_service::decide_request(&db, id, user_id, decision).await?;
    Ok(Json(json!({ "request": LoanRequestDto::new(request, None) })))
}

pub async fn cancel_request(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let request = request_service::cancel_request(&db, id, user_id).await?;
    Ok(Json(json!({ "request": LoanRequestDto::new(request, None) })))
}
