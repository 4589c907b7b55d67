//! Loan request workflow
//!
//! Requests are addressed by their row id. A requester may cancel a
//! pending request; the owner may approve or reject it. Decisions do
//! not create loans by themselves.

use sea_orm::*;
use serde::Serialize;

use super::store;
use crate::domain::{Decision, DomainError, GetOrCreate, RequestState, Resource, ValidationError};
use crate::models::book::Entity as Book;
use crate::models::loan_request::{self, Entity as LoanRequest, LoanRequestDto};

/// Which side of a request the listing is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestRole {
    /// Requests addressed to the user as owner of the book
    Owner,
    /// Requests the user made
    Requester,
}

/// Requests grouped by state, newest first within each group
#[derive(Debug, Default, Clone, Serialize)]
pub struct RequestBuckets {
    pub open: Vec<LoanRequestDto>,
    pub approved: Vec<LoanRequestDto>,
    pub rejected: Vec<LoanRequestDto>,
    pub cancelled: Vec<LoanRequestDto>,
}

/// Ask `owner_id` to lend `book_id` to `requester_id`.
///
/// An already pending request for the same triple is returned instead of
/// creating a duplicate.
pub async fn create_request(
    db: &DatabaseConnection,
    requester_id: i32,
    owner_id: i32,
    book_id: i32,
) -> Result<GetOrCreate<loan_request::Model>, DomainError> {
    let txn = db.begin().await?;

    store::require_user(&txn, requester_id).await?;
    store::require_user(&txn, owner_id).await?;
    store::require_book(&txn, book_id).await?;

    if requester_id == owner_id {
        return Err(ValidationError::SelfRequest.into());
    }

    if !store::owns_book(&txn, owner_id, book_id).await? {
        return Err(ValidationError::OwnershipMismatch.into());
    }

    if let Some(pending) = LoanRequest::find()
        .filter(loan_request::Column::OwnerId.eq(owner_id))
        .filter(loan_request::Column::RequesterId.eq(requester_id))
        .filter(loan_request::Column::BookId.eq(book_id))
        .filter(loan_request::Column::Decision.is_null())
        .filter(loan_request::Column::CancelledAt.is_null())
        .one(&txn)
        .await?
    {
        tracing::debug!("Request {} already pending", pending.id);
        return Ok(GetOrCreate::Existing(pending));
    }

    let saved = loan_request::ActiveModel {
        owner_id: Set(owner_id),
        requester_id: Set(requester_id),
        book_id: Set(book_id),
        requested_at: Set(store::now()),
        decision: Set(None),
        decision_at: Set(None),
        cancelled_at: Set(None),
        reject_reason: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        "User {} requested book {} from user {} (request {})",
        requester_id,
        book_id,
        owner_id,
        saved.id
    );
    Ok(GetOrCreate::Created(saved))
}

async fn find_request<C: ConnectionTrait>(
    db: &C,
    request_id: i32,
) -> Result<loan_request::Model, DomainError> {
    LoanRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound(Resource::Request))
}

/// Owner approves or rejects a pending request.
pub async fn decide_request(
    db: &DatabaseConnection,
    request_id: i32,
    acting_user_id: i32,
    decision: Decision,
) -> Result<loan_request::Model, DomainError> {
    let txn = db.begin().await?;
    let request = find_request(&txn, request_id).await?;

    if request.owner_id != acting_user_id {
        tracing::warn!(
            "User {} attempted to decide request {} owned by {}",
            acting_user_id,
            request_id,
            request.owner_id
        );
        return Err(DomainError::forbidden("only the owner can decide on this request"));
    }

    request.state().ensure_pending()?;

    let mut active: loan_request::ActiveModel = request.into();
    active.decision = Set(Some(decision.approved()));
    active.decision_at = Set(Some(store::now()));
    active.reject_reason = Set(decision.reason().map(|r| r.as_str().to_string()));
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        "Request {} {}",
        updated.id,
        decision.resulting_state().past_tense()
    );
    Ok(updated)
}

/// Requester withdraws a pending request.
pub async fn cancel_request(
    db: &DatabaseConnection,
    request_id: i32,
    acting_user_id: i32,
) -> Result<loan_request::Model, DomainError> {
    let txn = db.begin().await?;
    let request = find_request(&txn, request_id).await?;

    if request.requester_id != acting_user_id {
        tracing::warn!(
            "User {} attempted to cancel request {} belonging to {}",
            acting_user_id,
            request_id,
            request.requester_id
        );
        return Err(DomainError::forbidden("you can only cancel your own requests"));
    }

    request.state().ensure_pending()?;

    let mut active: loan_request::ActiveModel = request.into();
    active.cancelled_at = Set(Some(store::now()));
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!("User {} cancelled request {}", acting_user_id, request_id);
    Ok(updated)
}

pub async fn get_request(
    db: &DatabaseConnection,
    request_id: i32,
    viewer_id: i32,
) -> Result<LoanRequestDto, DomainError> {
    let (request, book) = LoanRequest::find_by_id(request_id)
        .find_also_related(Book)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound(Resource::Request))?;

    if request.owner_id != viewer_id && request.requester_id != viewer_id {
        return Err(DomainError::forbidden("not a party to this request"));
    }

    Ok(LoanRequestDto::new(request, book.map(|b| b.title)))
}

/// All requests where the user plays `role`, grouped by state.
pub async fn list_requests(
    db: &DatabaseConnection,
    user_id: i32,
    role: RequestRole,
) -> Result<RequestBuckets, DomainError> {
    let column = match role {
        RequestRole::Owner => loan_request::Column::OwnerId,
        RequestRole::Requester => loan_request::Column::RequesterId,
    };

    let rows = LoanRequest::find()
        .filter(column.eq(user_id))
        .order_by_desc(loan_request::Column::RequestedAt)
        .find_also_related(Book)
        .all(db)
        .await?;

    let mut buckets = RequestBuckets::default();
    for (request, book) in rows {
        let dto = LoanRequestDto::new(request, book.map(|b| b.title));
        match dto.state {
            RequestState::Pending => buckets.open.push(dto),
            RequestState::Approved => buckets.approved.push(dto),
            RequestState::Rejected => buckets.rejected.push(dto),
            RequestState::Cancelled => buckets.cancelled.push(dto),
        }
    }

    Ok(buckets)
}

/// Number of pending requests waiting on the owner's decision
pub async fn pending_requests_count(db: &DatabaseConnection, owner_id: i32) -> Result<u64, DomainError> {
    let count = LoanRequest::find()
        .filter(loan_request::Column::OwnerId.eq(owner_id))
        .filter(loan_request::Column::Decision.is_null())
        .filter(loan_request::Column::CancelledAt.is_null())
        .count(db)
        .await?;
    Ok(count)
}

/// Owners the requester currently has pending requests with, per book
pub async fn pending_owner_ids<C: ConnectionTrait>(
    db: &C,
    requester_id: i32,
    book_id: i32,
) -> Result<Vec<i32>, DomainError> {
    let rows = LoanRequest::find()
        .filter(loan_request::Column::RequesterId.eq(requester_id))
        .filter(loan_request::Column::BookId.eq(book_id))
        .filter(loan_request::Column::Decision.is_null())
        .filter(loan_request::Column::CancelledAt.is_null())
        .all(db)
        .await?;

    let mut owners: Vec<i32> = rows.into_iter().map(|r| r.owner_id).collect();
    owners.sort_unstable();
    owners.dedup();
    Ok(owners)
}
