//! Wishlist Service

use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};

use super::{library_service, store, validation};
use crate::domain::{
    ConstraintViolation, DomainError, Resource, WishOutcome, errors::map_unique_violation,
};
use crate::models::BookCandidate;
use crate::models::wishlist;

/// Add an existing book to the user's wishlist.
///
/// The (user, book) row is unique for the life of the pair: an active
/// row is returned untouched, a previously removed row is revived.
pub async fn add_to_wishlist(
    db: &DatabaseConnection,
    user_id: i32,
    book_id: i32,
) -> Result<(WishOutcome, wishlist::Model), DomainError> {
    let txn = db.begin().await?;
    let result = wish_on(&txn, user_id, book_id).await?;
    txn.commit().await?;
    Ok(result)
}

/// Upsert a book from provider data, then wish for it in one transaction.
pub async fn add_candidate_to_wishlist(
    db: &DatabaseConnection,
    user_id: i32,
    candidate: BookCandidate,
) -> Result<(WishOutcome, wishlist::Model), DomainError> {
    let txn = db.begin().await?;
    store::require_user(&txn, user_id).await?;
    let book = library_service::upsert_book(&txn, candidate).await?.into_inner();
    let result = wish_on(&txn, user_id, book.id).await?;
    txn.commit().await?;
    Ok(result)
}

async fn wish_on(
    txn: &sea_orm::DatabaseTransaction,
    user_id: i32,
    book_id: i32,
) -> Result<(WishOutcome, wishlist::Model), DomainError> {
    store::require_user(txn, user_id).await?;
    store::require_book(txn, book_id).await?;

    if let Err(e) = validation::validate_wishlist_creation(txn, user_id, book_id).await {
        tracing::warn!("Rejected wish of user {} for book {}: {}", user_id, book_id, e);
        return Err(e);
    }

    match store::find_wish(txn, user_id, book_id).await? {
        Some(existing) if existing.is_active() => {
            tracing::debug!("Book {} already on wishlist of user {}", book_id, user_id);
            Ok((WishOutcome::AlreadyActive, existing))
        }
        Some(removed) => {
            let mut active: wishlist::ActiveModel = removed.into();
            active.wished_at = Set(store::now());
            active.removed_at = Set(None);
            let revived = active.update(txn).await?;
            tracing::info!("User {} wishes for book {} again", user_id, book_id);
            Ok((WishOutcome::Revived, revived))
        }
        None => {
            let new_wish = wishlist::ActiveModel {
                user_id: Set(user_id),
                book_id: Set(book_id),
                wished_at: Set(store::now()),
                removed_at: Set(None),
                ..Default::default()
            };
            let saved = new_wish
                .insert(txn)
                .await
                .map_err(|e| map_unique_violation(e, ConstraintViolation::DuplicateWishlistRow))?;
            tracing::info!("User {} added book {} to wishlist", user_id, book_id);
            Ok((WishOutcome::Created, saved))
        }
    }
}

/// Withdraw an active wish. The row is kept with `removed_at` set.
pub async fn remove_from_wishlist(
    db: &DatabaseConnection,
    user_id: i32,
    book_id: i32,
) -> Result<wishlist::Model, DomainError> {
    let txn = db.begin().await?;
    store::require_book(&txn, book_id).await?;

    let wish = store::find_wish(&txn, user_id, book_id)
        .await?
        .filter(|w| w.is_active())
        .ok_or(DomainError::NotFound(Resource::Wishlist))?;

    let mut active: wishlist::ActiveModel = wish.into();
    active.removed_at = Set(Some(store::now()));
    let removed = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!("User {} removed book {} from wishlist", user_id, book_id);
    Ok(removed)
}
