use crate::domain::{Decision, DomainError, RejectReason};
use crate::models::{BookCandidate, user};
use crate::services::{
    group_service::{self, NewGroup},
    library_service,
    loan_service::{self, NewLoan},
    request_service,
    user_service::{self, NewUser},
    wishlist_service,
};
use sea_orm::*;

fn candidate(google_book_id: &str, title: &str, authors: &str, isbn_13: &str) -> BookCandidate {
    BookCandidate {
        google_book_id: google_book_id.to_owned(),
        title: title.to_owned(),
        authors: Some(authors.to_owned()),
        isbn_13: Some(isbn_13.to_owned()),
        language: Some("en".to_owned()),
        ..Default::default()
    }
}

/// Populate an empty database with a few readers and books.
/// Does nothing when users already exist.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    if user::Entity::find().count(db).await? > 0 {
        tracing::info!("Database already has users, skipping demo data");
        return Ok(());
    }

    // 1. Users
    let alice = user_service::create_user(
        db,
        NewUser {
            username: "alice".to_owned(),
            location: Some("Lyon".to_owned()),
        },
    )
    .await?;
    let bob = user_service::create_user(
        db,
        NewUser {
            username: "bob".to_owned(),
            location: Some("Nantes".to_owned()),
        },
    )
    .await?;
    let carol = user_service::create_user(
        db,
        NewUser {
            username: "carol".to_owned(),
            location: None,
        },
    )
    .await?;

    // 2. Libraries
    let dune = library_service::add_candidate_to_library(
        db,
        alice.id,
        candidate("B1yqDwAAQBAJ", "Dune", "Frank Herbert", "9780441172719"),
    )
    .await?
    .into_inner();
    let foundation = library_service::add_candidate_to_library(
        db,
        alice.id,
        candidate("IwywDY4P6gsC", "Foundation", "Isaac Asimov", "9780553293357"),
    )
    .await?
    .into_inner();
    library_service::add_candidate_to_library(
        db,
        bob.id,
        candidate("yl4dILkcqm4C", "The Hobbit", "J.R.R. Tolkien", "9780547928227"),
    )
    .await?;

    // 3. Wishes, one of which is closed by the loan below
    wishlist_service::add_to_wishlist(db, bob.id, dune.book_id).await?;
    wishlist_service::add_to_wishlist(db, carol.id, foundation.book_id).await?;

    // 4. Requests and a loan
    let request = request_service::create_request(db, bob.id, alice.id, dune.book_id)
        .await?
        .into_inner();
    request_service::decide_request(db, request.id, alice.id, Decision::Approve).await?;
    loan_service::create_loan(
        db,
        NewLoan {
            owner_id: alice.id,
            borrower_id: bob.id,
            book_id: dune.book_id,
        },
    )
    .await?;

    let request = request_service::create_request(db, carol.id, alice.id, foundation.book_id)
        .await?
        .into_inner();
    request_service::decide_request(
        db,
        request.id,
        alice.id,
        Decision::Reject(RejectReason::Unavailable),
    )
    .await?;

    // 5. A group
    group_service::create_group(
        db,
        alice.id,
        NewGroup {
            name: "Sci-Fi Readers".to_owned(),
            description: "Spice, robots and starships".to_owned(),
            is_private: false,
        },
    )
    .await?;
    group_service::join_group(db, bob.id, "sci-fi-readers").await?;

    Ok(())
}
