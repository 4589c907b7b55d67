//! Read-only views over the catalog: what is owned, what is wanted,
//! and per-book / per-user summaries.

use sea_orm::*;
use serde::Serialize;
use std::collections::HashMap;

use super::{group_service, request_service, store};
use crate::domain::DomainError;
use crate::models::book::{self, BookDto, Entity as Book};
use crate::models::group;
use crate::models::loan_request::{self, Entity as LoanRequest};
use crate::models::ownership::{self, Entity as Ownership};
use crate::models::user::{Entity as User, UserDto};
use crate::models::wishlist::{self, Entity as Wishlist};

#[derive(Debug, Clone, Serialize)]
pub struct WishedBook {
    pub book: BookDto,
    pub wishers_count: usize,
    pub owners_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub book: BookDto,
    pub owners: Vec<UserDto>,
    pub wishers: Vec<UserDto>,
    pub on_loan: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerContext>,
}

/// How the book relates to the user looking at it
#[derive(Debug, Clone, Serialize)]
pub struct ViewerContext {
    pub is_owner: bool,
    pub is_wished: bool,
    /// Owners the viewer has a pending request with for this book
    pub requested_owner_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWish {
    pub book: BookDto,
    pub wished_at: String,
    /// Other users who own the book and could lend it
    pub owners_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub user: UserDto,
    pub books: Vec<BookDto>,
    pub wishes: Vec<UserWish>,
    pub groups: Vec<group::Model>,
    pub open_requests_made: u64,
    pub open_requests_received: u64,
}

async fn owner_counts<C: ConnectionTrait>(
    db: &C,
    book_ids: Vec<i32>,
    excluding_user: Option<i32>,
) -> Result<HashMap<i32, usize>, DomainError> {
    let mut counts = HashMap::new();
    if book_ids.is_empty() {
        return Ok(counts);
    }

    let mut query = Ownership::find().filter(ownership::Column::BookId.is_in(book_ids));
    if let Some(user_id) = excluding_user {
        query = query.filter(ownership::Column::UserId.ne(user_id));
    }

    for row in query.all(db).await? {
        *counts.entry(row.book_id).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Books with at least one owner, by title
pub async fn list_owned_books(db: &DatabaseConnection) -> Result<Vec<BookDto>, DomainError> {
    let mut book_ids: Vec<i32> = Ownership::find()
        .all(db)
        .await?
        .into_iter()
        .map(|o| o.book_id)
        .collect();
    book_ids.sort_unstable();
    book_ids.dedup();

    if book_ids.is_empty() {
        return Ok(Vec::new());
    }

    let books = Book::find()
        .filter(book::Column::Id.is_in(book_ids))
        .order_by_asc(book::Column::Title)
        .all(db)
        .await?;

    Ok(books.into_iter().map(BookDto::from).collect())
}

/// Books someone is still wishing for, with wisher and owner counts
pub async fn list_wished_books(db: &DatabaseConnection) -> Result<Vec<WishedBook>, DomainError> {
    let mut wishers: HashMap<i32, usize> = HashMap::new();
    for wish in Wishlist::find()
        .filter(wishlist::Column::RemovedAt.is_null())
        .all(db)
        .await?
    {
        *wishers.entry(wish.book_id).or_insert(0) += 1;
    }

    if wishers.is_empty() {
        return Ok(Vec::new());
    }

    let book_ids: Vec<i32> = wishers.keys().copied().collect();
    let owners = owner_counts(db, book_ids.clone(), None).await?;

    let books = Book::find()
        .filter(book::Column::Id.is_in(book_ids))
        .order_by_asc(book::Column::Title)
        .all(db)
        .await?;

    Ok(books
        .into_iter()
        .map(|b| WishedBook {
            wishers_count: wishers.get(&b.id).copied().unwrap_or(0),
            owners_count: owners.get(&b.id).copied().unwrap_or(0),
            book: b.into(),
        })
        .collect())
}

pub async fn book_detail(
    db: &DatabaseConnection,
    book_id: i32,
    viewer_id: Option<i32>,
) -> Result<BookDetail, DomainError> {
    let book = store::require_book(db, book_id).await?;

    let owners: Vec<UserDto> = Ownership::find()
        .filter(ownership::Column::BookId.eq(book_id))
        .find_also_related(User)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(_, u)| u.map(UserDto::from))
        .collect();

    let wishers: Vec<UserDto> = Wishlist::find()
        .filter(wishlist::Column::BookId.eq(book_id))
        .filter(wishlist::Column::RemovedAt.is_null())
        .order_by_asc(wishlist::Column::WishedAt)
        .find_also_related(User)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(_, u)| u.map(UserDto::from))
        .collect();

    let on_loan = store::open_loan_for_book(db, book_id).await?.is_some();

    let viewer = match viewer_id {
        Some(viewer_id) => Some(ViewerContext {
            is_owner: owners.iter().any(|o| o.id == viewer_id),
            is_wished: wishers.iter().any(|w| w.id == viewer_id),
            requested_owner_ids: request_service::pending_owner_ids(db, viewer_id, book_id)
                .await?,
        }),
        None => None,
    };

    Ok(BookDetail {
        book: book.into(),
        owners,
        wishers,
        on_loan,
        viewer,
    })
}

pub async fn user_summary(db: &DatabaseConnection, user_id: i32) -> Result<UserSummary, DomainError> {
    let user = store::require_user(db, user_id).await?;

    let mut books: Vec<BookDto> = Ownership::find()
        .filter(ownership::Column::UserId.eq(user_id))
        .find_also_related(Book)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(_, b)| b)
        .map(BookDto::from)
        .collect();
    books.sort_by(|a, b| a.title.cmp(&b.title));

    let active_wishes = Wishlist::find()
        .filter(wishlist::Column::UserId.eq(user_id))
        .filter(wishlist::Column::RemovedAt.is_null())
        .order_by_asc(wishlist::Column::WishedAt)
        .find_also_related(Book)
        .all(db)
        .await?;
    let wished_ids: Vec<i32> = active_wishes.iter().map(|(w, _)| w.book_id).collect();
    let other_owners = owner_counts(db, wished_ids, Some(user_id)).await?;

    let wishes = active_wishes
        .into_iter()
        .filter_map(|(wish, book)| {
            book.map(|b| UserWish {
                owners_count: other_owners.get(&b.id).copied().unwrap_or(0),
                wished_at: wish.wished_at,
                book: b.into(),
            })
        })
        .collect();

    let groups = group_service::groups_of_user(db, user_id).await?;

    let open_requests_made = LoanRequest::find()
        .filter(loan_request::Column::RequesterId.eq(user_id))
        .filter(loan_request::Column::Decision.is_null())
        .filter(loan_request::Column::CancelledAt.is_null())
        .count(db)
        .await?;
    let open_requests_received = request_service::pending_requests_count(db, user_id).await?;

    Ok(UserSummary {
        user: user.into(),
        books,
        wishes,
        groups,
        open_requests_made,
        open_requests_received,
    })
}
