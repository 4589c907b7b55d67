//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Every failure is scoped to one operation; the store is left unchanged.

use std::fmt;

use sea_orm::{DbErr, SqlErr};

use super::RequestState;

/// A proposed loan or wishlist mutation that breaks a consistency rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The selected book is not owned by the specified owner")]
    OwnershipMismatch,
    #[error("Owner and borrower cannot be the same person")]
    SelfLoan,
    #[error("The selected book is already borrowed and has not been returned")]
    BookAlreadyOnLoan,
    #[error("The selected book is already owned by the wisher")]
    AlreadyOwned,
    #[error("The selected book is already borrowed by the wisher")]
    AlreadyBorrowed,
    #[error("The book has an active loan; wait until it is returned")]
    ActiveLoanExists,
    #[error("The loan has already been returned")]
    LoanAlreadyReturned,
    #[error("You cannot request a book from yourself")]
    SelfRequest,
    #[error("A reason is required to reject a request")]
    MissingRejectReason,
    #[error("Unknown reject reason")]
    UnknownRejectReason,
    #[error("A book needs an external id and a title")]
    IncompleteBook,
    #[error("Name cannot be blank")]
    InvalidName,
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OwnershipMismatch => "OWNERSHIP_MISMATCH",
            Self::SelfLoan => "SELF_LOAN",
            Self::BookAlreadyOnLoan => "BOOK_ALREADY_ON_LOAN",
            Self::AlreadyOwned => "ALREADY_OWNED",
            Self::AlreadyBorrowed => "ALREADY_BORROWED",
            Self::ActiveLoanExists => "ACTIVE_LOAN_EXISTS",
            Self::LoanAlreadyReturned => "LOAN_ALREADY_RETURNED",
            Self::SelfRequest => "SELF_REQUEST",
            Self::MissingRejectReason => "MISSING_REJECT_REASON",
            Self::UnknownRejectReason => "UNKNOWN_REJECT_REASON",
            Self::IncompleteBook => "INCOMPLETE_BOOK",
            Self::InvalidName => "INVALID_NAME",
        }
    }
}

/// A storage-level uniqueness rule was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("a wishlist row already exists for this user and book")]
    DuplicateWishlistRow,
    #[error("another book already uses this identifier")]
    DuplicateBookIdentifier,
    #[error("username is already taken")]
    DuplicateUsername,
    #[error("a group with this name already exists")]
    DuplicateGroup,
    #[error("user is already a member of this group")]
    DuplicateMembership,
}

impl ConstraintViolation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateWishlistRow => "DUPLICATE_WISHLIST_ROW",
            Self::DuplicateBookIdentifier => "DUPLICATE_BOOK_IDENTIFIER",
            Self::DuplicateUsername => "DUPLICATE_USERNAME",
            Self::DuplicateGroup => "DUPLICATE_GROUP",
            Self::DuplicateMembership => "DUPLICATE_MEMBERSHIP",
        }
    }
}

/// Kind of record an operation referenced but could not find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Book,
    Ownership,
    Loan,
    Wishlist,
    Request,
    Group,
    Membership,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::User => "User",
            Resource::Book => "Book",
            Resource::Ownership => "Ownership",
            Resource::Loan => "Loan",
            Resource::Wishlist => "Wishlist entry",
            Resource::Request => "Request",
            Resource::Group => "Group",
            Resource::Membership => "Membership",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),
    #[error("{0} not found")]
    NotFound(Resource),
    #[error("Not permitted: {0}")]
    Forbidden(String),
    #[error("This request has already been {}", .0.past_tense())]
    RequestClosed(RequestState),
    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.kind(),
            Self::Constraint(e) => e.kind(),
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::RequestClosed(RequestState::Cancelled) => "REQUEST_ALREADY_CANCELLED",
            Self::RequestClosed(_) => "REQUEST_ALREADY_DECIDED",
            Self::Database(_) => "DATABASE",
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// Translate a unique-constraint failure into `on_unique`, keep anything
/// else as a database error.
pub fn map_unique_violation(e: DbErr, on_unique: impl Into<DomainError>) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => on_unique.into(),
        _ => e.into(),
    }
}
