//! Validation engine
//!
//! Side-effect free checks of a proposed loan or wishlist mutation
//! against the current store state. The mutating services call these
//! again inside their own transaction; callers may also use them for
//! pre-flight checks.

use sea_orm::ConnectionTrait;

use super::store;
use crate::domain::{DomainError, ValidationError};

/// Outcome of a check: `Ok(None)` when the mutation is legal,
/// `Ok(Some(v))` for a rule violation, `Err` when the store failed.
pub type Verdict = Result<Option<ValidationError>, DomainError>;

pub async fn check_loan_creation<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    borrower_id: i32,
    book_id: i32,
) -> Verdict {
    if !store::owns_book(db, owner_id, book_id).await? {
        return Ok(Some(ValidationError::OwnershipMismatch));
    }

    if owner_id == borrower_id {
        return Ok(Some(ValidationError::SelfLoan));
    }

    if store::open_loan_for_book(db, book_id).await?.is_some() {
        return Ok(Some(ValidationError::BookAlreadyOnLoan));
    }

    Ok(None)
}

pub async fn validate_loan_creation<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    borrower_id: i32,
    book_id: i32,
) -> Result<(), DomainError> {
    match check_loan_creation(db, owner_id, borrower_id, book_id).await? {
        Some(violation) => Err(violation.into()),
        None => Ok(()),
    }
}

/// Row uniqueness per (user, book) is left to the storage layer.
pub async fn check_wishlist_creation<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    book_id: i32,
) -> Verdict {
    if store::owns_book(db, user_id, book_id).await? {
        return Ok(Some(ValidationError::AlreadyOwned));
    }

    if store::has_open_loan_as_borrower(db, user_id, book_id).await? {
        return Ok(Some(ValidationError::AlreadyBorrowed));
    }

    Ok(None)
}

pub async fn validate_wishlist_creation<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    book_id: i32,
) -> Result<(), DomainError> {
    match check_wishlist_creation(db, user_id, book_id).await? {
        Some(violation) => Err(violation.into()),
        None => Ok(()),
    }
}
