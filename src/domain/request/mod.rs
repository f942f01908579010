pub mod entity;
pub mod invariants;

pub use entity::{Request, RequestProgress, RequestStatus, RequestType};
pub use invariants::validate_request;
