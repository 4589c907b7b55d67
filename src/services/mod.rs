//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Every mutation runs in its own transaction: validation, the write and
//! any wishlist reaction commit together or not at all.

pub mod catalog_service;
pub mod group_service;
pub mod library_service;
pub mod loan_service;
pub mod reactions;
pub mod request_service;
pub mod store;
pub mod user_service;
pub mod validation;
pub mod wishlist_service;
