// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod location;
pub mod request;
pub mod resource;
pub mod user;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use location::{distance, Coordinate, EARTH_RADIUS_KM};

pub use request::{validate_request, Request, RequestProgress, RequestStatus, RequestType};

pub use resource::{validate_resource, Resource, ResourceType};

pub use user::{validate_user, User, UserRole};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Input outside a closed set (role, type, status) or out of range
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
