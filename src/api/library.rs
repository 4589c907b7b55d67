use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::auth::ActingUser;
use crate::domain::{DomainError, GetOrCreate, ValidationError};
use crate::models::BookCandidate;
use crate::services::library_service;

/// Either a catalogued book id or provider data for a new one
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LibraryEntryRequest {
    pub book_id: Option<i32>,
    pub book: Option<BookCandidate>,
}

pub async fn add_to_library(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Json(payload): Json<LibraryEntryRequest>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let result = match (payload.book_id, payload.book) {
        (Some(book_id), _) => library_service::add_book_to_library(&db, user_id, book_id).await?,
        (None, Some(candidate)) => {
            library_service::add_candidate_to_library(&db, user_id, candidate).await?
        }
        (None, None) => return Err(ValidationError::IncompleteBook.into()),
    };

    let status = match result {
        GetOrCreate::Created(_) => StatusCode::CREATED,
        GetOrCreate::Existing(_) => StatusCode::OK,
    };
    Ok((status, Json(json!({ "ownership": result.into_inner() }))))
}

pub async fn remove_from_library(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Path(book_id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    library_service::remove_book_from_library(&db, user_id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
