//! Library Service - books and who owns them

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};

use super::{reactions, store};
use crate::domain::{
    ConstraintViolation, DomainError, GetOrCreate, Resource, ValidationError,
    errors::map_unique_violation,
};
use crate::models::BookCandidate;
use crate::models::book::{self, Entity as Book};
use crate::models::ownership::{self, Entity as Ownership};

/// Provider placeholders that mean "no value"
const PLACEHOLDERS: [&str; 2] = ["N/A", "n/a"];

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !PLACEHOLDERS.contains(&v.as_str()))
}

/// Create the book keyed by its external id if it is not known yet.
/// An existing row is returned as-is, never overwritten.
pub async fn upsert_book<C: ConnectionTrait>(
    db: &C,
    candidate: BookCandidate,
) -> Result<GetOrCreate<book::Model>, DomainError> {
    let google_book_id = candidate.google_book_id.trim().to_string();
    let title = candidate.title.trim().to_string();
    if google_book_id.is_empty() || title.is_empty() {
        return Err(ValidationError::IncompleteBook.into());
    }

    if let Some(existing) = Book::find()
        .filter(book::Column::GoogleBookId.eq(&google_book_id))
        .one(db)
        .await?
    {
        tracing::debug!("Book {} already catalogued as {}", google_book_id, existing.id);
        return Ok(GetOrCreate::Existing(existing));
    }

    let now = store::now();
    let categories = candidate
        .categories
        .filter(|c| !c.is_empty())
        .map(|c| serde_json::to_string(&c).unwrap_or_default());

    let new_book = book::ActiveModel {
        google_book_id: Set(google_book_id),
        isbn_13: Set(clean(candidate.isbn_13)),
        isbn_10: Set(clean(candidate.isbn_10)),
        other_identifier: Set(clean(candidate.other_identifier)),
        title: Set(title),
        authors: Set(clean(candidate.authors).unwrap_or_default()),
        thumbnail: Set(clean(candidate.thumbnail)),
        description: Set(clean(candidate.description).unwrap_or_default()),
        page_count: Set(candidate.page_count.filter(|p| *p > 0)),
        published_date: Set(clean(candidate.published_date)),
        language: Set(clean(candidate.language)),
        categories: Set(categories),
        publisher: Set(clean(candidate.publisher)),
        average_rating: Set(candidate.average_rating),
        info_link: Set(clean(candidate.info_link)),
        preview_link: Set(clean(candidate.preview_link)),
        maturity_rating: Set(clean(candidate.maturity_rating)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_book
        .insert(db)
        .await
        .map_err(|e| map_unique_violation(e, ConstraintViolation::DuplicateBookIdentifier))?;

    tracing::info!("Catalogued book {} ({})", saved.id, saved.title);
    Ok(GetOrCreate::Created(saved))
}

/// Record that the user owns an already catalogued book.
pub async fn add_book_to_library(
    db: &DatabaseConnection,
    user_id: i32,
    book_id: i32,
) -> Result<GetOrCreate<ownership::Model>, DomainError> {
    let txn = db.begin().await?;
    let result = assign_ownership(&txn, user_id, book_id).await?;
    txn.commit().await?;
    Ok(result)
}

/// Upsert a book from provider data and add it to the user's library.
pub async fn add_candidate_to_library(
    db: &DatabaseConnection,
    user_id: i32,
    candidate: BookCandidate,
) -> Result<GetOrCreate<ownership::Model>, DomainError> {
    let txn = db.begin().await?;
    store::require_user(&txn, user_id).await?;
    let book = upsert_book(&txn, candidate).await?.into_inner();
    let result = assign_ownership(&txn, user_id, book.id).await?;
    txn.commit().await?;
    Ok(result)
}

async fn assign_ownership(
    txn: &DatabaseTransaction,
    user_id: i32,
    book_id: i32,
) -> Result<GetOrCreate<ownership::Model>, DomainError> {
    store::require_user(txn, user_id).await?;
    store::require_book(txn, book_id).await?;

    if let Some(existing) = store::find_ownership(txn, user_id, book_id).await? {
        tracing::debug!("User {} already owns book {}", user_id, book_id);
        return Ok(GetOrCreate::Existing(existing));
    }

    let saved = ownership::ActiveModel {
        user_id: Set(user_id),
        book_id: Set(book_id),
        created_at: Set(store::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    reactions::on_ownership_created(txn, &saved).await?;

    tracing::info!("User {} added book {} to library", user_id, book_id);
    Ok(GetOrCreate::Created(saved))
}

/// Remove a book from the user's library. Blocked while the user has the
/// book out on loan.
pub async fn remove_book_from_library(
    db: &DatabaseConnection,
    user_id: i32,
    book_id: i32,
) -> Result<(), DomainError> {
    let txn = db.begin().await?;

    let book = store::require_book(&txn, book_id).await?;

    let ownership = store::find_ownership(&txn, user_id, book_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User {} attempted to remove book {} they don't own", user_id, book_id);
            DomainError::NotFound(Resource::Ownership)
        })?;

    if store::has_open_loan_as_owner(&txn, user_id, book_id).await? {
        tracing::warn!(
            "User {} attempted to remove book {} with an active loan",
            user_id,
            book_id
        );
        return Err(ValidationError::ActiveLoanExists.into());
    }

    Ownership::delete_by_id(ownership.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        "User {} removed book '{}' (ID: {}) from their library",
        user_id,
        book.title,
        book_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::clean;

    #[test]
    fn placeholders_become_null() {
        assert_eq!(clean(Some("N/A".to_string())), None);
        assert_eq!(clean(Some("   ".to_string())), None);
        assert_eq!(clean(None), None);
        assert_eq!(
            clean(Some(" 9780441172719 ".to_string())),
            Some("9780441172719".to_string())
        );
    }
}
