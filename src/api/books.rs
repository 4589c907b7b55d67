use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::auth::ActingUser;
use crate::domain::DomainError;
use crate::services::catalog_service;
use crate::services::loan_service::{self, NewLoan};

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "Books owned by at least one user")
    )
)]
pub async fn list_books(State(db): State<DatabaseConnection>) -> Result<Json<Value>, DomainError> {
    let books = catalog_service::list_owned_books(&db).await?;
    Ok(Json(json!({ "books": books })))
}

pub async fn list_wished_books(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Value>, DomainError> {
    let books = catalog_service::list_wished_books(&db).await?;
    Ok(Json(json!({ "books": books })))
}

pub async fn get_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    viewer: Option<ActingUser>,
) -> Result<Json<Value>, DomainError> {
    let detail = catalog_service::book_detail(&db, id, viewer.map(|v| v.0)).await?;
    Ok(Json(json!(detail)))
}

#[derive(Deserialize)]
pub struct LoanCheckQuery {
    pub borrower_id: i32,
}

/// Would the acting user be allowed to lend this book to `borrower_id`?
pub async fn check_loan(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    ActingUser(owner_id): ActingUser,
    Query(query): Query<LoanCheckQuery>,
) -> Result<Json<Value>, DomainError> {
    let violation = loan_service::check_loan(
        &db,
        NewLoan {
            owner_id,
            borrower_id: query.borrower_id,
            book_id: id,
        },
    )
    .await?;

    Ok(Json(match violation {
        None => json!({ "allowed": true }),
        Some(v) => json!({
            "allowed": false,
            "kind": v.kind(),
            "error": v.to_string(),
        }),
    }))
}
