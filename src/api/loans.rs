use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::auth::ActingUser;
use crate::domain::DomainError;
use crate::services::loan_service::{self, NewLoan};

#[derive(Deserialize)]
pub struct ListLoansQuery {
    #[serde(default)]
    pub open_only: bool,
}

pub async fn list_loans(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Query(query): Query<ListLoansQuery>,
) -> Result<Json<Value>, DomainError> {
    let loans = loan_service::list_loans_for_user(&db, user_id, query.open_only).await?;
    Ok(Json(json!(loans)))
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateLoanRequest {
    pub borrower_id: i32,
    pub book_id: i32,
}

/// The acting user lends one of their books
#[utoipa::path(
    post,
    path = "/api/loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Loan created"),
        (status = 404, description = "Book or user not found"),
        (status = 422, description = "Loan rejected by a consistency rule")
    )
)]
pub async fn create_loan(
    State(db): State<DatabaseConnection>,
    ActingUser(owner_id): ActingUser,
    Json(payload): Json<CreateLoanRequest>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let loan = loan_service::create_loan(
        &db,
        NewLoan {
            owner_id,
            borrower_id: payload.borrower_id,
            book_id: payload.book_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "loan": loan }))))
}

pub async fn return_loan(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let loan = loan_service::return_loan(&db, id, user_id).await?;
    Ok(Json(json!({ "loan": loan })))
}
