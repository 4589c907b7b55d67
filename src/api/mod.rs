pub mod auth;
pub mod books;
pub mod error;
pub mod groups;
pub mod health;
pub mod library;
pub mod loans;
pub mod requests;
pub mod users;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Users
        .route("/users", post(users::create_user))
        .route("/users/me", delete(users::delete_me))
        .route("/users/:id", get(users::get_user))
        // Books
        .route("/books", get(books::list_books))
        .route("/books/wished", get(books::list_wished_books))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id/loan-check", get(books::check_loan))
        // Library (ownership)
        .route("/library", post(library::add_to_library))
        .route("/library/:book_id", delete(library::remove_from_library))
        // Wishlist
        .route("/wishlist", post(wishlist::add_to_wishlist))
        .route("/wishlist/:book_id", delete(wishlist::remove_from_wishlist))
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::create_loan))
        .route("/loans/:id/return", put(loans::return_loan))
        // Loan requests
        .route(
            "/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/requests/pending-count", get(requests::pending_count))
        .route("/requests/:id", get(requests::get_request))
        .route("/requests/:id/decision", put(requests::decide_request))
        .route("/requests/:id/cancel", put(requests::cancel_request))
        // Groups
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route("/groups/:slug", get(groups::get_group))
        .route("/groups/:slug/join", post(groups::join_group))
        .route("/groups/:slug/membership", delete(groups::leave_group))
        .with_state(db)
}
