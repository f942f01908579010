// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - NO cross-repository calls (the reservation store owns its own
//   two-table transaction)
// - Explicit SQL only

pub mod request_repository;
pub mod reservation_repository;
pub mod resource_repository;
pub mod user_repository;

mod row_support;

pub use request_repository::{RequestRepository, SqliteRequestRepository};
pub use reservation_repository::{
    ReservationOutcome, ReservationStore, SqliteReservationRepository,
};
pub use resource_repository::{ResourceRepository, SqliteResourceRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
