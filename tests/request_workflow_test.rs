use bookswap::db;
use bookswap::domain::{
    Decision, DomainError, GetOrCreate, RejectReason, RequestState, ValidationError,
};
use bookswap::models::{BookCandidate, loan, loan_request};
use bookswap::services::request_service::{self, RequestRole};
use bookswap::services::{library_service, user_service};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_user(db: &DatabaseConnection, username: &str) -> i32 {
    user_service::create_user(
        db,
        user_service::NewUser {
            username: username.to_string(),
            location: None,
        },
    )
    .await
    .expect("Failed to create user")
    .id
}

/// alice owns "Dune"; returns (alice, bob, book)
async fn setup_owner_and_requester(db: &DatabaseConnection) -> (i32, i32, i32) {
    let alice = create_test_user(db, "alice").await;
    let bob = create_test_user(db, "bob").await;
    let ownership = library_service::add_candidate_to_library(
        db,
        alice,
        BookCandidate {
            google_book_id: "dune".to_string(),
            title: "Dune".to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to add book");
    (alice, bob, ownership.get().book_id)
}

#[tokio::test]
async fn test_duplicate_pending_request_is_reused() {
    let db = setup_test_db().await;
    let (alice, bob, book) = setup_owner_and_requester(&db).await;

    let first = request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap();
    assert!(first.is_created());

    let second = request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap();
    assert!(matches!(second, GetOrCreate::Existing(_)));
    assert_eq!(second.get().id, first.get().id);

    assert_eq!(loan_request::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(
        request_service::pending_requests_count(&db, alice)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_request_validation() {
    let db = setup_test_db().await;
    let (alice, bob, book) = setup_owner_and_requester(&db).await;

    let err = request_service::create_request(&db, alice, alice, book)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationError::SelfRequest)));

    // bob does not own the book
    let err = request_service::create_request(&db, alice, bob, book)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::OwnershipMismatch)
    ));
}

#[tokio::test]
async fn test_cancel_twice() {
    let db = setup_test_db().await;
    let (alice, bob, book) = setup_owner_and_requester(&db).await;
    let request = request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap()
        .into_inner();

    let cancelled = request_service::cancel_request(&db, request.id, bob)
        .await
        .unwrap();
    assert_eq!(cancelled.state(), RequestState::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    let err = request_service::cancel_request(&db, request.id, bob)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "REQUEST_ALREADY_CANCELLED");
    assert_eq!(err.to_string(), "This request has already been cancelled");

    let err = request_service::decide_request(&db, request.id, alice, Decision::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::RequestClosed(RequestState::Cancelled)));
}

#[tokio::test]
async fn test_only_parties_may_act() {
    let db = setup_test_db().await;
    let (alice, bob, book) = setup_owner_and_requester(&db).await;
    let carol = create_test_user(&db, "carol").await;
    let request = request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap()
        .into_inner();

    let err = request_service::decide_request(&db, request.id, bob, Decision::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = request_service::cancel_request(&db, request.id, alice)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = request_service::get_request(&db, request.id, carol)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let seen = request_service::get_request(&db, request.id, alice)
        .await
        .unwrap();
    assert_eq!(seen.book_title.as_deref(), Some("Dune"));
    assert_eq!(seen.state, RequestState::Pending);
}

#[tokio::test]
async fn test_reject_needs_reason() {
    assert_eq!(
        Decision::parse(false, None),
        Err(ValidationError::MissingRejectReason)
    );
    assert_eq!(
        Decision::parse(false, Some("Too busy")),
        Err(ValidationError::UnknownRejectReason)
    );

    let db = setup_test_db().await;
    let (alice, bob, book) = setup_owner_and_requester(&db).await;
    let request = request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap()
        .into_inner();

    let decision = Decision::parse(false, Some("Book already loaned")).unwrap();
    let rejected = request_service::decide_request(&db, request.id, alice, decision)
        .await
        .unwrap();

    assert_eq!(rejected.state(), RequestState::Rejected);
    assert_eq!(
        rejected.reject_reason.as_deref(),
        Some(RejectReason::AlreadyLoaned.as_str())
    );

    let err = request_service::decide_request(&db, request.id, alice, Decision::Approve)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "REQUEST_ALREADY_DECIDED");
}

#[tokio::test]
async fn test_approval_does_not_create_loan() {
    let db = setup_test_db().await;
    let (alice, bob, book) = setup_owner_and_requester(&db).await;
    let request = request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap()
        .into_inner();

    let approved = request_service::decide_request(&db, request.id, alice, Decision::Approve)
        .await
        .unwrap();
    assert_eq!(approved.state(), RequestState::Approved);
    assert!(approved.reject_reason.is_none());
    assert_eq!(loan::Entity::find().count(&db).await.unwrap(), 0);

    // a closed request no longer blocks a fresh one
    let again = request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap();
    assert!(again.is_created());
}

#[tokio::test]
async fn test_list_requests_by_role() {
    let db = setup_test_db().await;
    let (alice, bob, book) = setup_owner_and_requester(&db).await;
    let first = request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap()
        .into_inner();
    request_service::cancel_request(&db, first.id, bob)
        .await
        .unwrap();
    request_service::create_request(&db, bob, alice, book)
        .await
        .unwrap();

    let as_owner = request_service::list_requests(&db, alice, RequestRole::Owner)
        .await
        .unwrap();
    assert_eq!(as_owner.open.len(), 1);
    assert_eq!(as_owner.cancelled.len(), 1);
    assert!(as_owner.approved.is_empty());
    assert_eq!(as_owner.open[0].book_title.as_deref(), Some("Dune"));

    let as_requester = request_service::list_requests(&db, alice, RequestRole::Requester)
        .await
        .unwrap();
    assert!(as_requester.open.is_empty());

    let owners = request_service::pending_owner_ids(&db, bob, book)
        .await
        .unwrap();
    assert_eq!(owners, vec![alice]);
}
