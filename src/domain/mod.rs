//! Domain layer - Pure business abstractions
//!
//! This layer contains NO web framework dependencies (no Axum).
//! Only domain error types, state machines and operation outcomes.

pub mod errors;
pub mod outcome;
pub mod request_state;

pub use errors::{ConstraintViolation, DomainError, Resource, ValidationError};
pub use outcome::{GetOrCreate, WishOutcome};
pub use request_state::{Decision, RejectReason, RequestState};
