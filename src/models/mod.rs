pub mod book;
pub mod group;
pub mod group_member;
pub mod loan;
pub mod loan_request;
pub mod ownership;
pub mod user;
pub mod wishlist;

pub use book::{BookCandidate, BookDto};
