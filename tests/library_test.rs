use bookswap::db;
use bookswap::domain::{ConstraintViolation, DomainError, Resource, ValidationError};
use bookswap::models::{BookCandidate, book, loan, ownership, wishlist};
use bookswap::services::loan_service::{self, NewLoan};
use bookswap::services::{catalog_service, library_service, user_service, wishlist_service};
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
            location: Some("Lyon".to_string()),
        },
    )
    .await
    .expect("Failed to create user")
    .id
}

fn candidate(google_book_id: &str, title: &str) -> BookCandidate {
    BookCandidate {
        google_book_id: google_book_id.to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_upsert_book_is_idempotent() {
    let db = setup_test_db().await;

    let mut first = candidate("dune", "Dune");
    first.isbn_13 = Some("9780441172719".to_string());
    first.categories = Some(vec!["Fiction".to_string(), "Science Fiction".to_string()]);
    let created = library_service::upsert_book(&db, first).await.unwrap();
    assert!(created.is_created());

    // A second candidate with other details never overwrites the row
    let existing = library_service::upsert_book(&db, candidate("dune", "Dune Messiah"))
        .await
        .unwrap();
    assert!(!existing.is_created());
    assert_eq!(existing.get().id, created.get().id);
    assert_eq!(existing.get().title, "Dune");

    let dto = book::BookDto::from(existing.into_inner());
    assert_eq!(dto.categories, vec!["Fiction", "Science Fiction"]);
    assert_eq!(book::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_placeholder_identifiers_do_not_collide() {
    let db = setup_test_db().await;

    for (gid, title) in [("a", "First"), ("b", "Second")] {
        let mut c = candidate(gid, title);
        c.isbn_13 = Some("N/A".to_string());
        c.isbn_10 = Some("".to_string());
        let saved = library_service::upsert_book(&db, c).await.unwrap().into_inner();
        assert!(saved.isbn_13.is_none());
        assert!(saved.isbn_10.is_none());
    }

    assert_eq!(book::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_duplicate_isbn_is_a_constraint_violation() {
    let db = setup_test_db().await;

    let mut a = candidate("a", "First");
    a.isbn_13 = Some("9780441172719".to_string());
    library_service::upsert_book(&db, a).await.unwrap();

    let mut b = candidate("b", "Second");
    b.isbn_13 = Some("9780441172719".to_string());
    let err = library_service::upsert_book(&db, b).await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::Constraint(ConstraintViolation::DuplicateBookIdentifier)
    ));
}

#[tokio::test]
async fn test_incomplete_book_rejected() {
    let db = setup_test_db().await;
    let err = library_service::upsert_book(&db, candidate("dune", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationError::IncompleteBook)));
}

#[tokio::test]
async fn test_add_to_library_twice_is_existing() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;

    let first = library_service::add_candidate_to_library(&db, alice, candidate("dune", "Dune"))
        .await
        .unwrap();
    assert!(first.is_created());

    let second = library_service::add_book_to_library(&db, alice, first.get().book_id)
        .await
        .unwrap();
    assert!(!second.is_created());
    assert_eq!(ownership::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_remove_from_library_blocked_by_open_loan() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    let book_id = library_service::add_candidate_to_library(&db, alice, candidate("dune", "Dune"))
        .await
        .unwrap()
        .into_inner()
        .book_id;

    let loan = loan_service::create_loan(
        &db,
        NewLoan {
            owner_id: alice,
            borrower_id: bob,
            book_id,
        },
    )
    .await
    .unwrap();

    let err = library_service::remove_book_from_library(&db, alice, book_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::ActiveLoanExists)
    ));

    loan_service::return_loan(&db, loan.id, alice).await.unwrap();
    library_service::remove_book_from_library(&db, alice, book_id)
        .await
        .unwrap();
    assert_eq!(ownership::Entity::find().count(&db).await.unwrap(), 0);

    let err = library_service::remove_book_from_library(&db, alice, book_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(Resource::Ownership)));

    let err = library_service::remove_book_from_library(&db, alice, 999)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(Resource::Book)));
}

#[tokio::test]
async fn test_usernames_are_unique() {
    let db = setup_test_db().await;
    create_test_user(&db, "alice").await;

    let err = user_service::create_user(
        &db,
        user_service::NewUser {
            username: "alice".to_string(),
            location: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Constraint(ConstraintViolation::DuplicateUsername)
    ));

    let err = user_service::create_user(
        &db,
        user_service::NewUser {
            username: " ".to_string(),
            location: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationError::InvalidName)));
}

#[tokio::test]
async fn test_deleting_user_cascades() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    let book_id = library_service::add_candidate_to_library(&db, alice, candidate("dune", "Dune"))
        .await
        .unwrap()
        .into_inner()
        .book_id;
    let other = library_service::upsert_book(&db, candidate("hobbit", "The Hobbit"))
        .await
        .unwrap()
        .into_inner();
    wishlist_service::add_to_wishlist(&db, bob, other.id)
        .await
        .unwrap();
    loan_service::create_loan(
        &db,
        NewLoan {
            owner_id: alice,
            borrower_id: bob,
            book_id,
        },
    )
    .await
    .unwrap();

    user_service::delete_user(&db, bob).await.unwrap();

    assert_eq!(loan::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(wishlist::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(ownership::Entity::find().count(&db).await.unwrap(), 1);
    // Books stay in the catalog
    assert_eq!(book::Entity::find().count(&db).await.unwrap(), 2);

    let err = user_service::delete_user(&db, bob).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(Resource::User)));
}

#[tokio::test]
async fn test_catalog_views() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    let carol = create_test_user(&db, "carol").await;

    let dune = library_service::add_candidate_to_library(&db, alice, candidate("dune", "Dune"))
        .await
        .unwrap()
        .into_inner()
        .book_id;
    library_service::add_book_to_library(&db, carol, dune)
        .await
        .unwrap();
    let hobbit = library_service::upsert_book(&db, candidate("hobbit", "The Hobbit"))
        .await
        .unwrap()
        .into_inner()
        .id;

    wishlist_service::add_to_wishlist(&db, bob, dune).await.unwrap();
    wishlist_service::add_to_wishlist(&db, bob, hobbit).await.unwrap();
    wishlist_service::add_to_wishlist(&db, alice, hobbit).await.unwrap();

    let owned = catalog_service::list_owned_books(&db).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].title, "Dune");

    let wished = catalog_service::list_wished_books(&db).await.unwrap();
    assert_eq!(wished.len(), 2);
    assert_eq!(wished[0].book.title, "Dune");
    assert_eq!(wished[0].wishers_count, 1);
    assert_eq!(wished[0].owners_count, 2);
    assert_eq!(wished[1].book.title, "The Hobbit");
    assert_eq!(wished[1].wishers_count, 2);
    assert_eq!(wished[1].owners_count, 0);

    let detail = catalog_service::book_detail(&db, dune, Some(bob))
        .await
        .unwrap();
    assert_eq!(detail.owners.len(), 2);
    assert_eq!(detail.wishers.len(), 1);
    assert!(!detail.on_loan);
    let viewer = detail.viewer.unwrap();
    assert!(!viewer.is_owner);
    assert!(viewer.is_wished);
    assert!(viewer.requested_owner_ids.is_empty());

    let anonymous = catalog_service::book_detail(&db, dune, None).await.unwrap();
    assert!(anonymous.viewer.is_none());

    let summary = catalog_service::user_summary(&db, bob).await.unwrap();
    assert_eq!(summary.user.username, "bob");
    assert!(summary.books.is_empty());
    assert_eq!(summary.wishes.len(), 2);
    let dune_wish = summary.wishes.iter().find(|w| w.book.id == dune).unwrap();
    assert_eq!(dune_wish.owners_count, 2);
}
