// src/application/mod.rs
//
// Application Layer
//
// - `AppState` wires the foundation and exposes the operations callers use
// - `ErrorResponse` is the stable error shape for an outer transport
// - Nothing here holds business rules

pub mod error_handling;
pub mod state;

pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
