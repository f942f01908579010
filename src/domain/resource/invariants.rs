use super::entity::Resource;
use crate::domain::{DomainError, DomainResult};

/// Validates all Resource invariants
pub fn validate_resource(resource: &Resource) -> DomainResult<()> {
    if !resource.location.is_valid() {
        return Err(DomainError::InvalidValue(format!(
            "Resource location out of range: {}",
            resource.location
        )));
    }
    Ok(())
}
