use bookswap::db;
use bookswap::domain::{ConstraintViolation, DomainError, Resource, ValidationError};
use bookswap::services::group_service::{self, NewGroup};
use bookswap::services::{catalog_service, user_service};
use sea_orm::DatabaseConnection;

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

fn new_group(name: &str) -> NewGroup {
    NewGroup {
        name: name.to_string(),
        description: String::new(),
        is_private: false,
    }
}

#[tokio::test]
async fn test_creator_becomes_admin() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;

    let group = group_service::create_group(&db, alice, new_group("Sci-Fi  Readers"))
        .await
        .unwrap();
    assert_eq!(group.slug, "sci-fi-readers");

    let detail = group_service::group_detail(&db, "sci-fi-readers")
        .await
        .unwrap();
    assert_eq!(detail.members.len(), 1);
    assert_eq!(detail.members[0].user.id, alice);
    assert!(detail.members[0].is_admin);
}

#[tokio::test]
async fn test_group_names_are_unique_by_slug() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;

    group_service::create_group(&db, alice, new_group("Sci Fi"))
        .await
        .unwrap();

    let err = group_service::create_group(&db, alice, new_group("sci-fi"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Constraint(ConstraintViolation::DuplicateGroup)
    ));

    let err = group_service::create_group(&db, alice, new_group("???"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationError::InvalidName)));

    assert_eq!(group_service::list_groups(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_join_and_leave() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    group_service::create_group(&db, alice, new_group("Book Club"))
        .await
        .unwrap();

    let membership = group_service::join_group(&db, bob, "book-club").await.unwrap();
    assert!(!membership.is_admin);

    let err = group_service::join_group(&db, bob, "book-club")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Constraint(ConstraintViolation::DuplicateMembership)
    ));

    let summary = catalog_service::user_summary(&db, bob).await.unwrap();
    assert_eq!(summary.groups.len(), 1);
    assert_eq!(summary.groups[0].name, "Book Club");

    group_service::leave_group(&db, bob, "book-club").await.unwrap();
    let err = group_service::leave_group(&db, bob, "book-club")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(Resource::Membership)));

    let err = group_service::join_group(&db, bob, "no-such-group")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(Resource::Group)));
}
