//! Reaction engine
//!
//! Wishlist entries are retired when the wish comes true: the wisher
//! borrows the book or comes to own it. Both triggers are plain calls
//! made by the service that performs the triggering write, on the same
//! transaction, so a failed reaction rolls the trigger back too.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use super::store;
use crate::models::wishlist::{self, Entity as Wishlist};
use crate::models::{loan, ownership};

/// Close the borrower's open wish for the borrowed book.
/// Returns the number of wishes closed (0 or 1).
pub async fn on_loan_created<C: ConnectionTrait>(db: &C, loan: &loan::Model) -> Result<u64, DbErr> {
    let closed = close_open_wish(db, loan.borrower_id, loan.book_id).await?;
    if closed > 0 {
        tracing::info!(
            "Closed wish of user {} for book {} after loan {}",
            loan.borrower_id,
            loan.book_id,
            loan.id
        );
    }
    Ok(closed)
}

/// Close the new owner's open wish for the acquired book.
pub async fn on_ownership_created<C: ConnectionTrait>(
    db: &C,
    ownership: &ownership::Model,
) -> Result<u64, DbErr> {
    let closed = close_open_wish(db, ownership.user_id, ownership.book_id).await?;
    if closed > 0 {
        tracing::info!(
            "Closed wish of user {} for book {} after acquiring it",
            ownership.user_id,
            ownership.book_id
        );
    }
    Ok(closed)
}

async fn close_open_wish<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    book_id: i32,
) -> Result<u64, DbErr> {
    let result = Wishlist::update_many()
        .col_expr(wishlist::Column::RemovedAt, Expr::value(store::now()))
        .filter(wishlist::Column::UserId.eq(user_id))
        .filter(wishlist::Column::BookId.eq(book_id))
        .filter(wishlist::Column::RemovedAt.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
