use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use super::auth::ActingUser;
use super::library::LibraryEntryRequest;
use crate::domain::{DomainError, ValidationError, WishOutcome};
use crate::services::wishlist_service;

pub async fn add_to_wishlist(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Json(payload): Json<LibraryEntryRequest>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let (outcome, wish) = match (payload.book_id, payload.book) {
        (Some(book_id), _) => wishlist_service::add_to_wishlist(&db, user_id, book_id).await?,
        (None, Some(candidate)) => {
            wishlist_service::add_candidate_to_wishlist(&db, user_id, candidate).await?
        }
        (None, None) => return Err(ValidationError::IncompleteBook.into()),
    };

    let status = match outcome {
        WishOutcome::AlreadyActive => StatusCode::OK,
        WishOutcome::Created | WishOutcome::Revived => StatusCode::CREATED,
    };
    Ok((status, Json(json!({ "outcome": outcome, "wish": wish }))))
}

pub async fn remove_from_wishlist(
    State(db): State<DatabaseConnection>,
    ActingUser(user_id): ActingUser,
    Path(book_id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    wishlist_service::remove_from_wishlist(&db, user_id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
