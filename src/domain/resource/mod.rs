pub mod entity;
pub mod invariants;

pub use entity::{Resource, ResourceType};
pub use invariants::validate_resource;
