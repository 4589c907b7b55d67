//! Loan Service - Pure business logic without HTTP layer

use sea_orm::*;
use serde::Serialize;

use super::{reactions, store, validation};
use crate::domain::{DomainError, Resource, ValidationError, errors::map_unique_violation};
use crate::models::book::Entity as Book;
use crate::models::loan::{self, Entity as Loan};

/// A proposed borrowing event
#[derive(Debug, Clone, Copy)]
pub struct NewLoan {
    pub owner_id: i32,
    pub borrower_id: i32,
    pub book_id: i32,
}

/// Enriched loan with related data
#[derive(Debug, Clone, Serialize)]
pub struct LoanWithDetails {
    pub id: i32,
    pub owner_id: i32,
    pub borrower_id: i32,
    pub book_id: i32,
    pub borrowed_at: String,
    pub returned_at: Option<String>,
    pub book_title: String,
}

/// Filter parameters for listing loans
#[derive(Debug, Default, Clone)]
pub struct LoanFilter {
    pub owner_id: Option<i32>,
    pub borrower_id: Option<i32>,
    pub book_id: Option<i32>,
    pub open_only: bool,
}

/// List loans with their book titles, newest first
pub async fn list_loans(
    db: &DatabaseConnection,
    filter: LoanFilter,
) -> Result<Vec<LoanWithDetails>, DomainError> {
    let mut condition = Condition::all();

    if let Some(owner_id) = filter.owner_id {
        condition = condition.add(loan::Column::OwnerId.eq(owner_id));
    }

    if let Some(borrower_id) = filter.borrower_id {
        condition = condition.add(loan::Column::BorrowerId.eq(borrower_id));
    }

    if let Some(book_id) = filter.book_id {
        condition = condition.add(loan::Column::BookId.eq(book_id));
    }

    if filter.open_only {
        condition = condition.add(loan::Column::ReturnedAt.is_null());
    }

    let loans_with_books = Loan::find()
        .filter(condition)
        .order_by_desc(loan::Column::BorrowedAt)
        .find_also_related(Book)
        .all(db)
        .await?;

    let result = loans_with_books
        .into_iter()
        .map(|(loan, book)| LoanWithDetails {
            id: loan.id,
            owner_id: loan.owner_id,
            borrower_id: loan.borrower_id,
            book_id: loan.book_id,
            borrowed_at: loan.borrowed_at,
            returned_at: loan.returned_at,
            book_title: book
                .map(|b| b.title)
                .unwrap_or_else(|| "Unknown".to_string()),
        })
        .collect();

    Ok(result)
}

/// Both sides of a user's lending history
#[derive(Debug, Clone, Serialize)]
pub struct UserLoans {
    pub lent: Vec<LoanWithDetails>,
    pub borrowed: Vec<LoanWithDetails>,
}

/// Loans where the user is either the owner or the borrower
pub async fn list_loans_for_user(
    db: &DatabaseConnection,
    user_id: i32,
    open_only: bool,
) -> Result<UserLoans, DomainError> {
    let lent = list_loans(
        db,
        LoanFilter {
            owner_id: Some(user_id),
            open_only,
            ..Default::default()
        },
    )
    .await?;
    let borrowed = list_loans(
        db,
        LoanFilter {
            borrower_id: Some(user_id),
            open_only,
            ..Default::default()
        },
    )
    .await?;

    Ok(UserLoans { lent, borrowed })
}

/// Pre-flight check for a loan; never writes
pub async fn check_loan(
    db: &DatabaseConnection,
    input: NewLoan,
) -> Result<Option<ValidationError>, DomainError> {
    store::require_book(db, input.book_id).await?;
    validation::check_loan_creation(db, input.owner_id, input.borrower_id, input.book_id).await
}

/// Create a new loan and retire the borrower's matching wish
pub async fn create_loan(db: &DatabaseConnection, input: NewLoan) -> Result<loan::Model, DomainError> {
    let txn = db.begin().await?;

    // 1. Referenced rows must exist
    store::require_book(&txn, input.book_id).await?;
    store::require_user(&txn, input.owner_id).await?;
    store::require_user(&txn, input.borrower_id).await?;

    // 2. Consistency rules
    if let Err(e) =
        validation::validate_loan_creation(&txn, input.owner_id, input.borrower_id, input.book_id)
            .await
    {
        tracing::warn!(
            "Rejected loan of book {} from {} to {}: {}",
            input.book_id,
            input.owner_id,
            input.borrower_id,
            e
        );
        return Err(e);
    }

    // 3. Create Loan. The partial unique index catches a concurrent winner.
    let new_loan = loan::ActiveModel {
        owner_id: Set(input.owner_id),
        borrower_id: Set(input.borrower_id),
        book_id: Set(input.book_id),
        borrowed_at: Set(store::now()),
        returned_at: Set(None),
        ..Default::default()
    };

    let saved_loan = new_loan
        .insert(&txn)
        .await
        .map_err(|e| map_unique_violation(e, ValidationError::BookAlreadyOnLoan))?;

    // 4. Wishlist reaction, same unit of work
    reactions::on_loan_created(&txn, &saved_loan).await?;

    txn.commit().await?;

    tracing::info!(
        "Loan {} created: book {} from user {} to user {}",
        saved_loan.id,
        saved_loan.book_id,
        saved_loan.owner_id,
        saved_loan.borrower_id
    );

    Ok(saved_loan)
}

/// Return a loan. Only the owner may close it, and only once.
///
/// Closing a loan cannot break the creation rules: ownership removal is
/// refused while the loan is open, so they are not re-checked here.
pub async fn return_loan(
    db: &DatabaseConnection,
    id: i32,
    acting_user_id: i32,
) -> Result<loan::Model, DomainError> {
    let txn = db.begin().await?;

    // 1. Find Loan
    let loan = Loan::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound(Resource::Loan))?;

    if loan.owner_id != acting_user_id {
        return Err(DomainError::forbidden("only the owner can mark a loan returned"));
    }

    if !loan.is_open() {
        return Err(ValidationError::LoanAlreadyReturned.into());
    }

    // 2. Update Loan
    let mut loan_active: loan::ActiveModel = loan.into();
    loan_active.returned_at = Set(Some(store::now()));
    let updated_loan = loan_active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!("Loan {} returned", updated_loan.id);

    Ok(updated_loan)
}
