//! Shared lookups over the entity store.
//!
//! Everything here is generic over [`ConnectionTrait`] so it can run
//! either on a plain connection or inside an open transaction.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::domain::{DomainError, Resource};
use crate::models::book::{self, Entity as Book};
use crate::models::loan::{self, Entity as Loan};
use crate::models::ownership::{self, Entity as Ownership};
use crate::models::user::{self, Entity as User};
use crate::models::wishlist::{self, Entity as Wishlist};

/// Current time as stored in timestamp columns
pub fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub async fn require_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, DomainError> {
    User::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound(Resource::User))
}

pub async fn require_book<C: ConnectionTrait>(db: &C, id: i32) -> Result<book::Model, DomainError> {
    Book::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound(Resource::Book))
}

pub async fn find_ownership<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    book_id: i32,
) -> Result<Option<ownership::Model>, DomainError> {
    Ok(Ownership::find()
        .filter(ownership::Column::UserId.eq(user_id))
        .filter(ownership::Column::BookId.eq(book_id))
        .one(db)
        .await?)
}

pub async fn owns_book<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    book_id: i32,
) -> Result<bool, DomainError> {
    Ok(find_ownership(db, user_id, book_id).await?.is_some())
}

/// The open loan for a book, if any. At most one exists.
pub async fn open_loan_for_book<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
) -> Result<Option<loan::Model>, DomainError> {
    Ok(Loan::find()
        .filter(loan::Column::BookId.eq(book_id))
        .filter(loan::Column::ReturnedAt.is_null())
        .one(db)
        .await?)
}

pub async fn has_open_loan_as_borrower<C: ConnectionTrait>(
    db: &C,
    borrower_id: i32,
    book_id: i32,
) -> Result<bool, DomainError> {
    let count = Loan::find()
        .filter(loan::Column::BorrowerId.eq(borrower_id))
        .filter(loan::Column::BookId.eq(book_id))
        .filter(loan::Column::ReturnedAt.is_null())
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn has_open_loan_as_owner<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    book_id: i32,
) -> Result<bool, DomainError> {
    let count = Loan::find()
        .filter(loan::Column::OwnerId.eq(owner_id))
        .filter(loan::Column::BookId.eq(book_id))
        .filter(loan::Column::ReturnedAt.is_null())
        .count(db)
        .await?;
    Ok(count > 0)
}

/// The single wishlist row for (user, book), active or not.
pub async fn find_wish<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    book_id: i32,
) -> Result<Option<wishlist::Model>, DomainError> {
    Ok(Wishlist::find()
        .filter(wishlist::Column::UserId.eq(user_id))
        .filter(wishlist::Column::BookId.eq(book_id))
        .one(db)
        .await?)
}
